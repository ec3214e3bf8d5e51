//! # Anteroom (Signup Front Door)
//!
//! `anteroom` sits in front of a hosted authentication backend and owns the
//! signup form action for a web application. It validates the submitted
//! fields, delegates account creation to the external provider, and carries a
//! one-shot "toast" message to the next page through a signed session cookie.
//!
//! ## Sessions
//!
//! There is no server-side session storage. Session state round-trips through
//! the client as a signed cookie (`__session` by default): a base64 JSON
//! payload authenticated with HMAC-SHA256. New cookies are always signed with
//! the first configured secret; any configured secret verifies, so rotating
//! secrets only requires prepending the new one. Tampered or unverifiable
//! cookies are silently replaced with a fresh empty session. They are never
//! trusted and never fail the request.
//!
//! ## Flash messages
//!
//! Flash values live in a dedicated session partition and are read at most
//! once: taking a flash value removes it, and the cleared state is committed
//! back to the client on the next response.
//!
//! ## Delegation
//!
//! Password storage, hashing, and token issuance belong entirely to the
//! external provider. This service forwards validated credentials, branches
//! on the provider's answer, and relays only its `Set-Cookie` headers back to
//! the browser.

pub mod api;
pub mod cli;
pub mod provider;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
