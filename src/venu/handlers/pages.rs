//! Screen rendering and in-memory navigation.
//!
//! `GET /` renders whichever screen the visitor's view router points at;
//! `POST /intent` applies one navigation intent and redirects back to `/`.
//! Screens never get their own URLs.

use crate::venu::handlers::{current_visitor, register::RegistrationForm};
use crate::venu::session::SessionProvider;
use crate::venu::view::{Intent, Screen};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

// axum handler for the single page
pub async fn index(
    headers: HeaderMap,
    provider: Extension<Arc<SessionProvider>>,
) -> impl IntoResponse {
    let (visitor, response_headers) = current_visitor(&headers, &provider).await;

    let screen = provider.screen(visitor).await.unwrap_or(Screen::Loading);
    let email = provider.session(visitor).await.map(|session| session.email);

    let body = match screen {
        Screen::Loading => loading_page(),
        Screen::Landing => landing_page(email.as_deref()),
        Screen::Signup => signup_page(None, ""),
        Screen::Login => login_page(None, ""),
        Screen::Registration => {
            registration_page(None, &RegistrationForm::prefill(email.as_deref()))
        }
        Screen::Success => success_page(),
    };

    (response_headers, Html(body))
}

#[derive(Deserialize, Debug)]
pub struct IntentForm {
    intent: String,
}

// axum handler for navigation intents
pub async fn intent(
    headers: HeaderMap,
    provider: Extension<Arc<SessionProvider>>,
    payload: Option<Form<IntentForm>>,
) -> impl IntoResponse {
    let (visitor, response_headers) = current_visitor(&headers, &provider).await;

    let Some(Form(form)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let Ok(intent) = form.intent.parse::<Intent>() else {
        return (
            StatusCode::BAD_REQUEST,
            format!("Unknown intent: {}", form.intent),
        )
            .into_response();
    };

    debug!("visitor {visitor} applied {intent:?}");

    provider.apply_intent(visitor, intent).await;

    (response_headers, Redirect::to("/")).into_response()
}

/// Minimal HTML escaping for user-supplied values.
pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} - Hyderabad Flute Festival</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn intent_button(intent: &str, label: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/intent\">\
         <input type=\"hidden\" name=\"intent\" value=\"{intent}\">\
         <button type=\"submit\">{label}</button></form>"
    )
}

fn error_banner(error: Option<&str>) -> String {
    error.map_or_else(String::new, |message| {
        format!("<p role=\"alert\">{}</p>", escape(message))
    })
}

pub(crate) fn loading_page() -> String {
    page("Loading", "<p>Loading...</p>")
}

pub(crate) fn landing_page(email: Option<&str>) -> String {
    let account = match email {
        Some(email) => format!(
            "<p>Signed in as {}</p>\
             <form method=\"post\" action=\"/auth/logout\"><button type=\"submit\">Logout</button></form>\
             {}",
            escape(email),
            intent_button("register", "Participate / Watch")
        ),
        None => format!(
            "{}{}",
            intent_button("signup", "Sign Up to Participate"),
            intent_button("register", "Watch Event")
        ),
    };

    let body = format!(
        "<h1>Hyderabad Flute Festival</h1>\
         <p>Celebrating the Legacy of Late Sri Manda BalaRama Sarma</p>\
         <p>A Musical Tribute by Family &amp; Students</p>\
         <h2>About the Festival</h2>\
         <p>The festival is dedicated to the birth anniversary of the legendary flutist\
         Late Sri Manda BalaRama Sarma Garu, organized by SeshaLatha Manda together with\
         his students, performing Classical Flute Music as one ensemble.</p>\
         <h2>Programme - December 30</h2>\
         <ul>\
         <li>5:30 PM - Welcome Address &amp; Lighting of the Lamp</li>\
         <li>5:40 PM - Flute Solo by Seshalatha Manda</li>\
         <li>5:55 PM - Flute Ensemble by Shesham Ramana &amp; His Students</li>\
         </ul>\
         <h2>Venue</h2>\
         <p>Shilparamam, Hyderabad - open to all visitors</p>\
         {account}"
    );

    page("Welcome", &body)
}

pub(crate) fn signup_page(error: Option<&str>, email: &str) -> String {
    let body = format!(
        "<h1>Create your account</h1>\
         {}\
         <form method=\"post\" action=\"/auth/signup\">\
         <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Sign Up</button></form>\
         {}",
        error_banner(error),
        escape(email),
        intent_button("login", "Already have an account? Login")
    );

    page("Sign Up", &body)
}

pub(crate) fn login_page(error: Option<&str>, email: &str) -> String {
    let body = format!(
        "<h1>Welcome back</h1>\
         {}\
         <form method=\"post\" action=\"/auth/login\">\
         <label>Email <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Login</button></form>\
         {}",
        error_banner(error),
        escape(email),
        intent_button("signup", "Need an account? Sign Up")
    );

    page("Login", &body)
}

pub(crate) fn registration_page(error: Option<&str>, form: &RegistrationForm) -> String {
    let (participant, watcher) = match form.registration_type {
        crate::supabase::store::RegistrationType::Participant => (" checked", ""),
        crate::supabase::store::RegistrationType::Watcher => ("", " checked"),
    };

    let body = format!(
        "<h1>Event Registration</h1>\
         <p>Hyderabad Flute Festival</p>\
         {}\
         <form method=\"post\" action=\"/register\">\
         <label>Full Name <input type=\"text\" name=\"full_name\" value=\"{}\" required></label>\
         <label>Email Address <input type=\"email\" name=\"email\" value=\"{}\" required></label>\
         <label>Phone Number <input type=\"tel\" name=\"phone\" value=\"{}\" required></label>\
         <fieldset><legend>Registration Type</legend>\
         <label><input type=\"radio\" name=\"registration_type\" value=\"participant\"{}> Participant - I want to perform</label>\
         <label><input type=\"radio\" name=\"registration_type\" value=\"watcher\"{}> Watcher - I want to attend</label>\
         </fieldset>\
         <label>Message (Optional) <textarea name=\"message\" rows=\"4\">{}</textarea></label>\
         <button type=\"submit\">Complete Registration</button></form>\
         {}",
        error_banner(error),
        escape(&form.full_name),
        escape(&form.email),
        escape(&form.phone),
        participant,
        watcher,
        escape(form.message.as_deref().unwrap_or("")),
        intent_button("home", "Back to Home")
    );

    page("Registration", &body)
}

pub(crate) fn success_page() -> String {
    let body = format!(
        "<h1>Registration Successful!</h1>\
         <p>Thank you for registering for the Hyderabad Flute Festival.\
         We look forward to seeing you there!</p>\
         <p>You will receive further details about the event via email.</p>\
         {}",
        intent_button("home", "Back to Home")
    );

    page("Success", &body)
}
