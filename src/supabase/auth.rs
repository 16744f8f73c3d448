//! Client for the hosted auth collaborator (GoTrue-compatible API).
//!
//! Exposes sign-up, sign-in and sign-out; a successful sign-up or sign-in
//! yields an [`AuthSession`] carrying the access token used for data-store
//! writes. Invalid credentials come back as a [`CollabError`] with the
//! backend's message intact.

use crate::cli::globals::GlobalArgs;
use crate::supabase::{client, endpoint_url, error_message, CollabError};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use uuid::Uuid;

/// An authenticated session as issued by the auth collaborator.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: SecretString,
}

/// Create a new account and return its session.
#[instrument(skip(globals, password))]
pub async fn sign_up(
    globals: &GlobalArgs,
    email: &str,
    password: &str,
) -> Result<AuthSession, CollabError> {
    let url = signed_url(globals, "/auth/v1/signup")?;

    let response = client()?
        .post(&url)
        .header("apikey", globals.anon_key.expose_secret())
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    session_from_response(response).await
}

/// Exchange credentials for a session.
#[instrument(skip(globals, password))]
pub async fn sign_in(
    globals: &GlobalArgs,
    email: &str,
    password: &str,
) -> Result<AuthSession, CollabError> {
    let url = signed_url(globals, "/auth/v1/token?grant_type=password")?;

    let response = client()?
        .post(&url)
        .header("apikey", globals.anon_key.expose_secret())
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    session_from_response(response).await
}

/// Revoke the session behind `access_token`.
#[instrument(skip(globals, access_token))]
pub async fn sign_out(globals: &GlobalArgs, access_token: &SecretString) -> Result<(), CollabError> {
    let url = signed_url(globals, "/auth/v1/logout")?;

    let response = client()?
        .post(&url)
        .header("apikey", globals.anon_key.expose_secret())
        .bearer_auth(access_token.expose_secret())
        .send()
        .await?;

    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    Err(CollabError::new(error_message(&body, status)))
}

fn signed_url(globals: &GlobalArgs, path: &str) -> Result<String, CollabError> {
    endpoint_url(&globals.service_url, path).map_err(|e| CollabError::new(e.to_string()))
}

async fn session_from_response(response: reqwest::Response) -> Result<AuthSession, CollabError> {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(CollabError::new(error_message(&body, status)));
    }

    debug!("auth collaborator replied {status}");

    parse_session(&body)
}

fn parse_session(body: &Value) -> Result<AuthSession, CollabError> {
    let access_token = body
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| CollabError::new("auth response is missing access_token"))?;

    let user = body
        .get("user")
        .ok_or_else(|| CollabError::new("auth response is missing user"))?;

    let user_id = user
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| CollabError::new("auth response is missing user id"))?;

    let email = user
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| CollabError::new("auth response is missing user email"))?
        .to_string();

    Ok(AuthSession {
        user_id,
        email,
        access_token: SecretString::from(access_token.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "4f9c2a9e-5b1d-4c63-9a34-0f4f0a6f9f21";

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn globals(uri: &str) -> GlobalArgs {
        GlobalArgs::new(uri.to_string(), SecretString::from("anon-key".to_string()))
    }

    fn session_body() -> Value {
        json!({
            "access_token": "token-123",
            "token_type": "bearer",
            "user": {"id": USER_ID, "email": "a@x.com"}
        })
    }

    #[tokio::test]
    async fn sign_up_returns_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({"email": "a@x.com", "password": "hunter22"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .mount(&server)
            .await;

        let session = sign_up(&globals(&server.uri()), "a@x.com", "hunter22").await?;
        assert_eq!(session.user_id.to_string(), USER_ID);
        assert_eq!(session.email, "a@x.com");
        assert_eq!(session.access_token.expose_secret(), "token-123");
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_surfaces_error_verbatim() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = sign_in(&globals(&server.uri()), "a@x.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid login credentials");
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_rejects_tokenless_response() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        // Confirmation-required deployments answer signup without a session
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"user": {"id": USER_ID, "email": "a@x.com"}})),
            )
            .mount(&server)
            .await;

        let err = sign_in(&globals(&server.uri()), "a@x.com", "hunter22")
            .await
            .unwrap_err();
        assert!(err.message.contains("access_token"));
        Ok(())
    }

    #[tokio::test]
    async fn sign_out_is_accepted() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let token = SecretString::from("token-123".to_string());
        sign_out(&globals(&server.uri()), &token).await?;
        Ok(())
    }
}
