//! Home page data endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use tracing::error;

use crate::session::SessionStore;

use super::cookie_header;
use super::types::HomePayload;

/// Return the pending toast for the current session.
///
/// Reading the toast consumes it, and the session is re-committed so the
/// cleared state reaches the client. The message is displayed at most once.
pub async fn root(
    headers: HeaderMap,
    store: Extension<Arc<SessionStore>>,
) -> impl IntoResponse {
    let mut session = store.load(cookie_header(&headers));
    let toast = session.take_toast();

    let mut response_headers = HeaderMap::new();
    match store.commit(&session) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        // A response without the cleared cookie would replay the toast once;
        // keep serving rather than failing the page.
        Err(err) => error!("failed to serialize session cookie: {err}"),
    }

    (StatusCode::OK, response_headers, Json(HomePayload { toast })).into_response()
}
