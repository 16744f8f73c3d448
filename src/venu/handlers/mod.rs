pub mod health;
pub use self::health::health;

pub mod pages;
pub use self::pages::{index, intent};

pub mod auth;
pub use self::auth::{login, logout, signup};

pub mod register;
pub use self::register::submit;

// common functions for the handlers
use crate::venu::session::SessionProvider;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use regex::Regex;
use ulid::Ulid;

const VISITOR_COOKIE_NAME: &str = "venu_visitor";

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Parse the visitor id out of the request's cookies.
pub(crate) fn visitor_from_headers(headers: &HeaderMap) -> Option<Ulid> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == VISITOR_COOKIE_NAME {
            Ulid::from_string(value).ok()
        } else {
            None
        }
    })
}

/// Build the `HttpOnly` cookie that pins a browser to its visitor state.
pub(crate) fn visitor_cookie(visitor: Ulid) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{VISITOR_COOKIE_NAME}={visitor}; Path=/; HttpOnly; SameSite=Lax"
    ))
}

/// Resolve the visitor behind this request, admitting a new one when the
/// cookie is missing or no longer known (e.g. after a restart).
///
/// Returns the visitor id plus response headers carrying a `Set-Cookie` for
/// newly admitted visitors.
pub(crate) async fn current_visitor(
    headers: &HeaderMap,
    provider: &SessionProvider,
) -> (Ulid, HeaderMap) {
    if let Some(visitor) = visitor_from_headers(headers) {
        if provider.screen(visitor).await.is_none() {
            // View state is in-memory only; a restart forgets everyone
            provider.ensure(visitor).await;
            provider.resolve(visitor, None).await;
        }
        return (visitor, HeaderMap::new());
    }

    let visitor = provider.admit().await;
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = visitor_cookie(visitor) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (visitor, response_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("latha.manda99@gmail.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a b@x.com"));
        assert!(!valid_email("a@x"));
    }

    #[test]
    fn test_visitor_cookie_roundtrip() {
        let visitor = Ulid::new();
        let cookie = visitor_cookie(visitor).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!(
                "theme=dark; {}",
                cookie.to_str().unwrap().split(';').next().unwrap()
            ))
            .unwrap(),
        );

        assert_eq!(visitor_from_headers(&headers), Some(visitor));
    }

    #[test]
    fn test_missing_cookie() {
        let headers = HeaderMap::new();
        assert_eq!(visitor_from_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("venu_visitor=not-a-ulid"));
        assert_eq!(visitor_from_headers(&headers), None);
    }
}
