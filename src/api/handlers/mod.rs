//! API handlers and shared request helpers.

pub mod health;
pub mod root;
pub mod signup;
pub mod types;

use axum::http::{HeaderMap, header::COOKIE};

/// Raw `Cookie` header value, if the request carries one.
pub(crate) fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(COOKIE).and_then(|value| value.to_str().ok())
}
