use crate::cli::globals::GlobalArgs;
use crate::supabase::store::{insert_registration, NewRegistration, RegistrationType};
use crate::venu::handlers::{current_visitor, pages, valid_email};
use crate::venu::session::SessionProvider;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

/// The registration form as posted by the browser.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub registration_type: RegistrationType,
    pub message: Option<String>,
}

impl RegistrationForm {
    /// Empty form with the email field defaulted to the session email.
    pub(crate) fn prefill(email: Option<&str>) -> Self {
        Self {
            full_name: String::new(),
            email: email.unwrap_or_default().to_string(),
            phone: String::new(),
            registration_type: RegistrationType::Watcher,
            message: None,
        }
    }
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegistrationForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Registration row inserted"),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "No authenticated session"),
        (status = 502, description = "The data store rejected the insert"),
    ),
    tag = "register"
)]
#[instrument(skip_all)]
pub async fn submit(
    headers: HeaderMap,
    globals: Extension<GlobalArgs>,
    provider: Extension<Arc<SessionProvider>>,
    payload: Option<Form<RegistrationForm>>,
) -> impl IntoResponse {
    let (visitor, response_headers) = current_visitor(&headers, &provider).await;

    let Some(Form(form)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    // No session, no insert call
    let Some(session) = provider.session(visitor).await else {
        error!("Registration attempted without a session");

        return (
            StatusCode::UNAUTHORIZED,
            response_headers,
            Html(pages::registration_page(
                Some("You must be logged in to register"),
                &form,
            )),
        )
            .into_response();
    };

    if form.full_name.trim().is_empty() || form.phone.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            response_headers,
            Html(pages::registration_page(
                Some("Full name and phone number are required"),
                &form,
            )),
        )
            .into_response();
    }

    if !valid_email(&form.email) {
        return (
            StatusCode::BAD_REQUEST,
            response_headers,
            Html(pages::registration_page(
                Some("Invalid email address"),
                &form,
            )),
        )
            .into_response();
    }

    let row = NewRegistration {
        user_id: session.user_id,
        full_name: form.full_name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        registration_type: form.registration_type,
        message: form
            .message
            .clone()
            .filter(|message| !message.trim().is_empty()),
    };

    // Exactly one insert per submission; duplicates are the user's to make
    match insert_registration(&globals, &session.access_token, &row).await {
        Ok(created) => {
            debug!("registration {} created", created.id);

            provider.complete_submission(visitor).await;

            (response_headers, Redirect::to("/")).into_response()
        }
        Err(e) => {
            error!("Registration insert failed: {e}");

            (
                StatusCode::BAD_GATEWAY,
                response_headers,
                Html(pages::registration_page(Some(&e.message), &form)),
            )
                .into_response()
        }
    }
}
