//! Extension descriptor
//!
//! Describes the integration to server administrators: what it does, what
//! needs configuring, and whether it offers front-end contact ingestion
//! (it does not; organizations and users arrive through the endpoints).

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::ENVIRONMENT_VARIABLES;
use crate::AppState;

/// How long the availability answer may be cached
const AVAILABILITY_EXPIRES_SECONDS: u64 = 86_400;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub result: bool,
    pub expires_seconds: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientChoiceData {
    pub data: String,
    pub expires_seconds: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub setup_instructions: String,
    pub environment_variables: Vec<String>,
    pub available: Availability,
    pub client_choice_data: ClientChoiceData,
}

impl Descriptor {
    pub fn for_provider(provider: &str) -> Self {
        let title = title_case(provider);
        Self {
            name: provider.to_string(),
            display_name: format!("{} Project", title),
            description: format!("Load orgs/contacts from {}", title),
            setup_instructions:
                "Set up an Auth0 Management API and set the environment variables specified."
                    .to_string(),
            environment_variables: ENVIRONMENT_VARIABLES.iter().map(|v| v.to_string()).collect(),
            available: Availability {
                result: false,
                expires_seconds: AVAILABILITY_EXPIRES_SECONDS,
            },
            client_choice_data: ClientChoiceData {
                data: String::new(),
                expires_seconds: 0,
            },
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// GET /integration/<provider>
pub async fn get_descriptor(State(state): State<AppState>) -> Json<Descriptor> {
    Json(Descriptor::for_provider(&state.config.provider))
}
