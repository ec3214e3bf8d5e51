//! Signup form action.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Extension, rejection::FormRejection},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::IntoResponse,
};
use tracing::{debug, error};

use crate::api::validate::{normalize_email, validate_email, validate_password};
use crate::provider::{AuthProvider, ProviderError};
use crate::session::{FlashMessage, SessionStore};

use super::cookie_header;
use super::types::{FieldErrors, SignupForm, SignupRejection};

/// Where the browser lands after a successful signup.
const REDIRECT_TARGET: &str = "/";

/// Handle a signup form submission.
///
/// Both validators always run, so every failing field is reported together
/// with a 400. Valid submissions go to the auth backend: a rejection
/// surfaces the provider's message, an outage maps to 502. On success the
/// browser is redirected to `/` with the provider's cookies plus the
/// committed session cookie carrying the one-time toast.
#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Account created; redirecting to the home page"),
        (status = 400, description = "Validation failed or the auth backend rejected the signup", body = SignupRejection),
        (status = 502, description = "Auth backend unavailable", body = String)
    ),
    tag = "signup"
)]
pub async fn signup(
    headers: HeaderMap,
    store: Extension<Arc<SessionStore>>,
    provider: Extension<Arc<AuthProvider>>,
    payload: Result<Form<SignupForm>, FormRejection>,
) -> impl IntoResponse {
    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("signup form rejected: {rejection}");
            return (StatusCode::BAD_REQUEST, "Missing form body".to_string()).into_response();
        }
    };

    let mut session = store.load(cookie_header(&headers));

    let email = normalize_email(&form.email);
    let field_errors = FieldErrors {
        email: validate_email(&email),
        password: validate_password(&form.password),
    };
    if !field_errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(SignupRejection { field_errors })).into_response();
    }

    let receipt = match provider.sign_up(&email, &form.password).await {
        Ok(receipt) => receipt,
        Err(ProviderError::Rejected { status, message }) => {
            debug!(%status, "signup rejected by auth backend");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
        Err(err) => {
            error!("signup call to auth backend failed: {err}");
            return (
                StatusCode::BAD_GATEWAY,
                "Signup is temporarily unavailable".to_string(),
            )
                .into_response();
        }
    };

    session.set_toast(FlashMessage::success(
        "Account created! Check your inbox to confirm your email.",
    ));

    // Provider cookies and our own session cookie travel on the same redirect.
    let mut response_headers = receipt.headers;
    match store.commit(&session) {
        Ok(cookie) => {
            response_headers.append(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("failed to serialize session cookie: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Signup failed".to_string())
                .into_response();
        }
    }
    response_headers.insert(LOCATION, HeaderValue::from_static(REDIRECT_TARGET));

    (StatusCode::SEE_OTHER, response_headers).into_response()
}
