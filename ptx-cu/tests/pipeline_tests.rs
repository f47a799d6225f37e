//! Integration tests for the contact upload pipeline
//!
//! A throwaway axum server on 127.0.0.1:0 stands in for the pre-signed
//! storage endpoint and records every body it receives.

use std::io::{Read, Write};
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::put, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use serde_json::Value;

use ptx_cu::{ParseOptions, StorageClient, StorageTarget, UploadError, UploadPipeline, UploadState};

#[derive(Clone)]
struct StubStorage {
    status: StatusCode,
    received: Arc<Mutex<Vec<String>>>,
}

async fn store(State(stub): State<StubStorage>, body: String) -> StatusCode {
    stub.received.lock().unwrap().push(body);
    stub.status
}

/// Test helper: start a storage stub answering every PUT with `status`
async fn spawn_storage(status: StatusCode) -> (StorageTarget, Arc<Mutex<Vec<String>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/bucket/:key", put(store))
        .with_state(StubStorage {
            status,
            received: received.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let target = StorageTarget {
        put_url: format!("http://{}/bucket/contacts-42?signature=xyz", addr),
        object_key: "contacts-42".to_string(),
    };
    (target, received)
}

fn pipeline() -> UploadPipeline {
    UploadPipeline::new(ParseOptions::default(), StorageClient::new(None).unwrap())
}

/// Test helper: base64 → gunzip → JSON
fn decode_payload(payload: &str) -> Value {
    let gzipped = STANDARD.decode(payload).expect("payload is base64");
    let mut json = String::new();
    GzDecoder::new(&gzipped[..])
        .read_to_string(&mut json)
        .expect("payload is gzip");
    serde_json::from_str(&json).expect("payload is JSON")
}

const CONTACTS_CSV: &str = "first_name,LastName,cell,zip,team\n\
Ada,Lovelace,2025550101,98101,blue\n\
Alan,Turing,2025550102,,red\n\
Grace,Hopper,2025550103,02139-4307,blue\n\
Ada,Duplicate,202-555-0101,98101,blue\n\
Bad,Number,555,98101,red\n";

#[tokio::test]
async fn test_upload_success_returns_key_and_stores_payload() {
    let (target, received) = spawn_storage(StatusCode::OK).await;
    let mut pipeline = pipeline();

    let key = pipeline
        .upload(Some("contacts.csv"), CONTACTS_CSV.as_bytes(), &target)
        .await
        .unwrap();

    assert_eq!(key, "contacts-42");
    let stats = pipeline.state().validation_stats().copied().unwrap();
    assert_eq!(stats.dupe_count, 1);
    assert_eq!(stats.invalid_cell_count, 1);
    assert_eq!(stats.missing_cell_count, 0);
    assert_eq!(
        pipeline.state().contact_summary(),
        vec!["3 contacts", "1 custom fields", "team"]
    );

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let collection = decode_payload(&bodies[0]);
    assert_eq!(collection["name"], "contacts.csv");
    assert_eq!(collection["contactsCount"], 3);
    assert_eq!(collection["customFields"], serde_json::json!(["team"]));
    assert_eq!(collection["contacts"][0]["firstName"], "Ada");
    assert_eq!(collection["contacts"][0]["lastName"], "Lovelace");
    assert_eq!(collection["contacts"][0]["cell"], "+12025550101");
    assert_eq!(collection["contacts"][1]["zip"], Value::Null);
    assert_eq!(collection["contacts"][2]["zip"], "02139");
}

#[tokio::test]
async fn test_zero_contacts_is_error_and_nothing_is_sent() {
    let (target, received) = spawn_storage(StatusCode::OK).await;
    let mut pipeline = pipeline();

    let result = pipeline
        .upload(Some("empty.csv"), b"firstName,lastName,cell\n", &target)
        .await;

    assert!(matches!(result, Err(UploadError::NoContacts)));
    assert_eq!(
        pipeline.state(),
        &UploadState::Error {
            message: "Upload at least one contact".to_string()
        }
    );
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_all_rows_invalid_is_zero_contacts() {
    let (target, _received) = spawn_storage(StatusCode::OK).await;
    let mut pipeline = pipeline();

    let result = pipeline
        .upload(None, b"firstName,lastName,cell\nA,B,12\nC,D,\n", &target)
        .await;

    assert!(matches!(result, Err(UploadError::NoContacts)));
    assert!(pipeline.state().validation_stats().is_none());
}

#[tokio::test]
async fn test_parse_error_surfaces_message() {
    let (target, received) = spawn_storage(StatusCode::OK).await;
    let mut pipeline = pipeline();

    let result = pipeline
        .upload(Some("bad.csv"), b"name,phone\nAda,2025550101\n", &target)
        .await;

    assert!(matches!(result, Err(UploadError::Parse(_))));
    assert_eq!(
        pipeline.state().error_message(),
        Some("Missing fields: firstName, lastName, cell")
    );
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_put_is_transfer_failure() {
    let (target, received) = spawn_storage(StatusCode::FORBIDDEN).await;
    let mut pipeline = pipeline();

    let result = pipeline
        .upload(Some("contacts.csv"), CONTACTS_CSV.as_bytes(), &target)
        .await;

    assert!(matches!(result, Err(UploadError::Transfer(_))));
    assert_eq!(received.lock().unwrap().len(), 1);
    let message = pipeline.state().error_message().unwrap();
    assert!(message.starts_with("Upload transfer failed"), "{}", message);
    assert!(message.contains("403"), "{}", message);
}

#[tokio::test]
async fn test_unreachable_storage_is_transfer_failure() {
    // Bind then drop a listener so the port is closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let target = StorageTarget {
        put_url: format!("http://{}/bucket/contacts", addr),
        object_key: "contacts".to_string(),
    };
    let mut pipeline = pipeline();

    let result = pipeline.upload(None, CONTACTS_CSV.as_bytes(), &target).await;

    assert!(matches!(result, Err(UploadError::Transfer(_))));
    assert_eq!(pipeline.state().name(), "error");
}

#[tokio::test]
async fn test_upload_file_uses_file_name() {
    let (target, received) = spawn_storage(StatusCode::OK).await;
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(CONTACTS_CSV.as_bytes()).unwrap();

    let mut pipeline = pipeline();
    pipeline.upload_file(file.path(), &target).await.unwrap();

    let expected_name = file.path().file_name().unwrap().to_string_lossy().into_owned();
    let collection = decode_payload(&received.lock().unwrap()[0]);
    assert_eq!(collection["name"], expected_name.as_str());
}

#[tokio::test]
async fn test_pipeline_can_run_again_after_error() {
    let (target, _received) = spawn_storage(StatusCode::OK).await;
    let mut pipeline = pipeline();

    let _ = pipeline.upload(None, b"firstName,lastName,cell\n", &target).await;
    assert_eq!(pipeline.state().name(), "error");

    pipeline.upload(None, CONTACTS_CSV.as_bytes(), &target).await.unwrap();
    assert_eq!(pipeline.state().name(), "success");
}
