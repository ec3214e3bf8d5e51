//! Request/response types for the signup endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::session::FlashMessage;

/// Form body for `POST /signup`.
///
/// `termsCheckbox` is part of the submitted form but deliberately not
/// enforced; it is parsed so the contract stays explicit.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    #[serde(default, rename = "termsCheckbox")]
    pub terms_checkbox: Option<String>,
}

/// Per-field validation messages; a key is present only when that field
/// failed.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Body of a 400 validation response.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRejection {
    #[serde(rename = "fieldErrors")]
    pub field_errors: FieldErrors,
}

/// Body of `GET /`: the pending toast, consumed by this read.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct HomePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<FlashMessage>,
}
