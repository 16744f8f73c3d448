use crate::cli::globals::GlobalArgs;
use crate::supabase;
use crate::venu::handlers::{current_visitor, pages, valid_email};
use crate::venu::session::SessionProvider;
use crate::venu::view::Intent;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Credentials {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body(content = Credentials, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Account created, session established"),
        (status = 400, description = "Invalid payload or sign-up rejected by the auth collaborator"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    headers: HeaderMap,
    globals: Extension<GlobalArgs>,
    provider: Extension<Arc<SessionProvider>>,
    payload: Option<Form<Credentials>>,
) -> impl IntoResponse {
    let (visitor, response_headers) = current_visitor(&headers, &provider).await;

    let Some(Form(credentials)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    // The browser posts from the sign-up screen
    provider.apply_intent(visitor, Intent::SwitchToSignup).await;

    if !valid_email(&credentials.email) {
        return (
            StatusCode::BAD_REQUEST,
            response_headers,
            Html(pages::signup_page(
                Some("Invalid email address"),
                &credentials.email,
            )),
        )
            .into_response();
    }

    match supabase::auth::sign_up(&globals, &credentials.email, &credentials.password).await {
        Ok(session) => {
            provider.session_changed(visitor, Some(session.into())).await;

            (response_headers, Redirect::to("/")).into_response()
        }
        Err(e) => {
            error!("Sign-up failed: {e}");

            (
                StatusCode::BAD_REQUEST,
                response_headers,
                Html(pages::signup_page(Some(&e.message), &credentials.email)),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = Credentials, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Login successful"),
        (status = 401, description = "Unauthorized"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    globals: Extension<GlobalArgs>,
    provider: Extension<Arc<SessionProvider>>,
    payload: Option<Form<Credentials>>,
) -> impl IntoResponse {
    let (visitor, response_headers) = current_visitor(&headers, &provider).await;

    let Some(Form(credentials)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    // The browser posts from the login screen
    provider.apply_intent(visitor, Intent::SwitchToLogin).await;

    if !valid_email(&credentials.email) {
        return (
            StatusCode::BAD_REQUEST,
            response_headers,
            Html(pages::login_page(
                Some("Invalid email address"),
                &credentials.email,
            )),
        )
            .into_response();
    }

    match supabase::auth::sign_in(&globals, &credentials.email, &credentials.password).await {
        Ok(session) => {
            provider.session_changed(visitor, Some(session.into())).await;

            (response_headers, Redirect::to("/")).into_response()
        }
        Err(e) => {
            error!("Login failed: {e}");

            (
                StatusCode::UNAUTHORIZED,
                response_headers,
                Html(pages::login_page(Some(&e.message), &credentials.email)),
            )
                .into_response()
        }
    }
}

// axum handler for sign-out; the local session is cleared even when the
// collaborator call fails
#[instrument(skip_all)]
pub async fn logout(
    headers: HeaderMap,
    globals: Extension<GlobalArgs>,
    provider: Extension<Arc<SessionProvider>>,
) -> impl IntoResponse {
    let (visitor, response_headers) = current_visitor(&headers, &provider).await;

    if let Some(session) = provider.session(visitor).await {
        if let Err(e) = supabase::auth::sign_out(&globals, &session.access_token).await {
            error!("Sign-out failed: {e}");
        }
    }

    provider.session_changed(visitor, None).await;

    (response_headers, Redirect::to("/"))
}
