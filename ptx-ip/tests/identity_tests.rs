//! Auth0 client against a local stub of the Management API
//!
//! The stub serves `/oauth/token` and `/api/v2/users` on 127.0.0.1:0 and
//! records what it receives.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use ptx_ip::identity::{AccountCreation, IdentityError, ACCOUNT_CONNECTION};
use ptx_ip::{Auth0Client, IdentityProvider};

#[derive(Clone)]
struct StubAuth0 {
    token_status: StatusCode,
    token_body: Value,
    users_status: StatusCode,
    users_body: String,
    token_requests: Arc<Mutex<Vec<Value>>>,
    user_requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl StubAuth0 {
    fn accepting() -> Self {
        Self {
            token_status: StatusCode::OK,
            token_body: json!({"access_token": "mgmt-token", "token_type": "Bearer"}),
            users_status: StatusCode::CREATED,
            users_body: json!({"user_id": "email|64f0c2", "email": "ada@example.com"}).to_string(),
            token_requests: Arc::default(),
            user_requests: Arc::default(),
        }
    }
}

async fn token(State(stub): State<StubAuth0>, Json(body): Json<Value>) -> Response {
    stub.token_requests.lock().unwrap().push(body);
    (stub.token_status, Json(stub.token_body.clone())).into_response()
}

async fn users(State(stub): State<StubAuth0>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.user_requests.lock().unwrap().push((auth, body));
    (stub.users_status, stub.users_body.clone()).into_response()
}

/// Test helper: start the stub and return a client pointed at it
async fn spawn_stub(stub: StubAuth0) -> Auth0Client {
    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/api/v2/users", post(users))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Auth0Client::with_base_url(
        format!("http://{}", addr),
        "client-id".to_string(),
        "client-secret".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_create_account_fetches_token_then_creates() {
    let stub = StubAuth0::accepting();
    let client = spawn_stub(stub.clone()).await;

    let outcome = client.create_account("ada@example.com").await.unwrap();

    assert_eq!(
        outcome,
        AccountCreation::Created {
            user_id: "email|64f0c2".to_string()
        }
    );

    let token_requests = stub.token_requests.lock().unwrap();
    assert_eq!(token_requests.len(), 1);
    assert_eq!(token_requests[0]["grant_type"], "client_credentials");
    assert_eq!(token_requests[0]["client_id"], "client-id");
    assert_eq!(token_requests[0]["client_secret"], "client-secret");
    assert!(token_requests[0]["audience"]
        .as_str()
        .unwrap()
        .ends_with("/api/v2/"));

    let user_requests = stub.user_requests.lock().unwrap();
    assert_eq!(user_requests.len(), 1);
    let (auth, body) = &user_requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer mgmt-token"));
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["connection"], ACCOUNT_CONNECTION);
}

#[tokio::test]
async fn test_token_is_requested_for_every_account() {
    let stub = StubAuth0::accepting();
    let client = spawn_stub(stub.clone()).await;

    client.create_account("ada@example.com").await.unwrap();
    client.create_account("alan@example.com").await.unwrap();

    assert_eq!(stub.token_requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_conflict_is_rejected_with_raw_body() {
    let raw = r#"{"statusCode":409,"error":"Conflict","message":"The user already exists."}"#;
    let stub = StubAuth0 {
        users_status: StatusCode::CONFLICT,
        users_body: raw.to_string(),
        ..StubAuth0::accepting()
    };
    let client = spawn_stub(stub).await;

    let outcome = client.create_account("ada@example.com").await.unwrap();

    assert_eq!(
        outcome,
        AccountCreation::Rejected {
            status: 409,
            body: raw.to_string()
        }
    );
}

#[tokio::test]
async fn test_non_created_success_is_still_rejected() {
    let stub = StubAuth0 {
        users_status: StatusCode::OK,
        ..StubAuth0::accepting()
    };
    let client = spawn_stub(stub).await;

    let outcome = client.create_account("ada@example.com").await.unwrap();
    assert!(matches!(outcome, AccountCreation::Rejected { status: 200, .. }));
}

#[tokio::test]
async fn test_token_rejection_skips_account_creation() {
    let stub = StubAuth0 {
        token_status: StatusCode::UNAUTHORIZED,
        token_body: json!({"error": "access_denied"}),
        ..StubAuth0::accepting()
    };
    let client = spawn_stub(stub.clone()).await;

    let outcome = client.create_account("ada@example.com").await.unwrap();

    match outcome {
        AccountCreation::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("access_denied"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(stub.user_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_token_response_without_access_token() {
    let stub = StubAuth0 {
        token_body: json!({"token_type": "Bearer"}),
        ..StubAuth0::accepting()
    };
    let client = spawn_stub(stub).await;

    let err = client.create_account("ada@example.com").await.unwrap_err();
    assert!(matches!(err, IdentityError::MissingToken));
}

#[tokio::test]
async fn test_unreachable_provider_is_network_error() {
    let client = Auth0Client::with_base_url(
        "http://127.0.0.1:1",
        "client-id".to_string(),
        "client-secret".to_string(),
    )
    .unwrap();

    let err = client.create_account("ada@example.com").await.unwrap_err();
    assert!(matches!(err, IdentityError::Network(_)));
}
