//! Client for the hosted data store (PostgREST-compatible API).
//!
//! The service performs exactly one write: inserting a registration row.
//! Rows are never read back, updated or deleted here; duplicates from
//! repeated submissions are accepted as-is.

use crate::cli::globals::GlobalArgs;
use crate::supabase::{client, endpoint_url, error_message, CollabError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Whether the attendee wants to perform or to watch.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    Participant,
    Watcher,
}

/// One registration row as returned by the store after insertion.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub registration_type: RegistrationType,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for the single insert operation.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct NewRegistration {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub registration_type: RegistrationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Insert one registration row on behalf of an authenticated user.
///
/// The caller's access token rides along so the store can enforce that the
/// row belongs to a live session.
#[instrument(skip(globals, access_token, row), fields(user_id = %row.user_id))]
pub async fn insert_registration(
    globals: &GlobalArgs,
    access_token: &SecretString,
    row: &NewRegistration,
) -> Result<Registration, CollabError> {
    let url = endpoint_url(&globals.service_url, "/rest/v1/registrations")
        .map_err(|e| CollabError::new(e.to_string()))?;

    let response = client()?
        .post(&url)
        .header("apikey", globals.anon_key.expose_secret())
        .bearer_auth(access_token.expose_secret())
        .header("Prefer", "return=representation")
        .json(row)
        .send()
        .await?;

    let status = response.status();

    if !status.is_success() {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        return Err(CollabError::new(error_message(&body, status)));
    }

    debug!("store collaborator replied {status}");

    // PostgREST returns the inserted representation as a one-element array
    let mut rows: Vec<Registration> = response.json().await?;

    rows.pop()
        .ok_or_else(|| CollabError::new("store response contained no inserted row"))
}
