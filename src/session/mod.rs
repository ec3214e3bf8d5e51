//! Cookie-backed sessions with one-shot flash messages.
//!
//! A [`SessionStore`] carries the cookie configuration (name, signing
//! secrets, attributes) and turns incoming `Cookie` headers into [`Session`]
//! values and sessions back into `Set-Cookie` header values. All state lives
//! client-side in the signed cookie; the store itself is immutable and safe
//! to share across requests.

use std::collections::BTreeMap;

use axum::http::{HeaderValue, header::InvalidHeaderValue};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

mod codec;

/// Default session cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "__session";

/// Flash slot read by page renders to show a one-time notification.
pub const TOAST_KEY: &str = "toastMessage";

/// Severity of a flash message, mirrored in the payload as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// A message displayed exactly once by the next page render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    pub message: String,
    #[serde(rename = "type")]
    pub level: FlashLevel,
}

impl FlashMessage {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Success,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Error,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: FlashLevel::Info,
        }
    }
}

/// Per-request session state reconstructed from the cookie.
///
/// Durable values survive until overwritten or the session is destroyed;
/// flash values are write-once-read-once. Both partitions use ordered maps so
/// identical content always serializes to the same signed cookie.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    data: BTreeMap<String, Value>,
    #[serde(default)]
    flash: BTreeMap<String, Value>,
}

impl Session {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Queue a flash value. Writing the same key again before commit
    /// overwrites the pending value.
    pub fn flash(&mut self, key: impl Into<String>, value: Value) {
        self.flash.insert(key.into(), value);
    }

    /// Take a flash value, removing it so it is surfaced at most once.
    pub fn take_flash(&mut self, key: &str) -> Option<Value> {
        self.flash.remove(key)
    }

    /// Queue the toast shown by the next page render.
    pub fn set_toast(&mut self, toast: FlashMessage) {
        // Serialization of FlashMessage cannot fail
        if let Ok(value) = serde_json::to_value(&toast) {
            self.flash(TOAST_KEY, value);
        }
    }

    /// Consume the pending toast, if any.
    pub fn take_toast(&mut self) -> Option<FlashMessage> {
        self.take_flash(TOAST_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.flash.is_empty()
    }
}

/// Cookie `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Session cookie configuration and codec.
///
/// Built once at startup from explicit configuration and shared via request
/// extensions; there is no module-level store state, so tests can run with
/// distinct configurations side by side.
#[derive(Debug)]
pub struct SessionStore {
    cookie_name: String,
    /// Signing secrets: the first entry signs, every entry verifies.
    secrets: Vec<SecretString>,
    same_site: SameSite,
    secure: bool,
    max_age_seconds: Option<i64>,
}

impl SessionStore {
    /// Create a store signing with `secret` and the default cookie settings
    /// (`__session`, `SameSite=Lax`, `HttpOnly`, no `Max-Age`).
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            secrets: vec![secret],
            same_site: SameSite::Lax,
            secure: false,
            max_age_seconds: None,
        }
    }

    /// Append verification-only secrets so cookies signed before a rotation
    /// keep loading.
    #[must_use]
    pub fn with_fallback_secrets(mut self, secrets: Vec<SecretString>) -> Self {
        self.secrets.extend(secrets);
        self
    }

    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Only mark cookies `Secure` when the site is served over HTTPS.
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_max_age_seconds(mut self, seconds: i64) -> Self {
        self.max_age_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Load the session carried by a `Cookie` header.
    ///
    /// A missing cookie, a malformed payload, or a signature that no
    /// configured secret verifies all yield a fresh empty session. Rejections
    /// are logged at debug level and never surface to the client.
    #[must_use]
    pub fn load(&self, cookie_header: Option<&str>) -> Session {
        let Some(header) = cookie_header else {
            return Session::default();
        };
        let Some(value) = find_cookie(header, &self.cookie_name) else {
            return Session::default();
        };

        match codec::verify(value, &self.secrets) {
            Ok(payload) => serde_json::from_slice(&payload).unwrap_or_else(|err| {
                debug!("session payload rejected: {err}");
                Session::default()
            }),
            Err(err) => {
                debug!("session cookie rejected: {err}");
                Session::default()
            }
        }
    }

    /// Serialize and sign the session into a `Set-Cookie` header value.
    ///
    /// The payload encoding is deterministic, so committing identical session
    /// content with the same secrets yields identical cookie values.
    ///
    /// # Errors
    /// Returns an error if the configured cookie name produces an invalid
    /// header value.
    pub fn commit(&self, session: &Session) -> Result<HeaderValue, InvalidHeaderValue> {
        let payload = match serde_json::to_vec(session) {
            Ok(payload) => payload,
            Err(_) => Vec::new(), // Unreachable for a map payload
        };
        let value = codec::sign(&payload, &self.secrets[0]);
        self.render(&value, self.max_age_seconds)
    }

    /// Produce a `Set-Cookie` value that clears the session immediately.
    ///
    /// # Errors
    /// Returns an error if the configured cookie name produces an invalid
    /// header value.
    pub fn destroy(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.render("", Some(0))
    }

    fn render(&self, value: &str, max_age: Option<i64>) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={value}; Path=/; HttpOnly; SameSite={}",
            self.cookie_name,
            self.same_site.as_str()
        );
        if let Some(seconds) = max_age {
            cookie.push_str(&format!("; Max-Age={seconds}"));
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for pair in header.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if key == name {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(SecretString::from("r3m1xr0ck5".to_string()))
    }

    fn cookie_value(header: &HeaderValue) -> &str {
        header
            .to_str()
            .ok()
            .and_then(|cookie| cookie.split(';').next())
            .and_then(|pair| pair.split_once('='))
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    #[test]
    fn missing_cookie_loads_empty_session() {
        let session = store().load(None);
        assert!(session.is_empty());

        let session = store().load(Some("other=value; theme=dark"));
        assert!(session.is_empty());
    }

    #[test]
    fn garbage_cookie_loads_empty_session() {
        let session = store().load(Some("__session=not-a-signed-payload"));
        assert!(session.is_empty());
    }

    #[test]
    fn commit_load_round_trip() {
        let store = store();
        let mut session = Session::default();
        session.set("userId", Value::from("u_123"));
        session.set_toast(FlashMessage::success("Welcome!"));

        let cookie = store.commit(&session).expect("commit should succeed");
        let header = format!("__session={}", cookie_value(&cookie));
        let mut loaded = store.load(Some(&header));

        assert_eq!(loaded.get("userId"), Some(&Value::from("u_123")));
        assert_eq!(loaded.take_toast(), Some(FlashMessage::success("Welcome!")));
    }

    #[test]
    fn commit_is_idempotent_for_identical_content() {
        let store = store();
        let mut session = Session::default();
        session.set_toast(FlashMessage::success("Welcome!"));

        let first = store.commit(&session).expect("commit should succeed");
        let second = store.commit(&session).expect("commit should succeed");
        assert_eq!(first, second);
    }

    #[test]
    fn flash_is_read_once() {
        let mut session = Session::default();
        session.set_toast(FlashMessage::info("one shot"));

        assert_eq!(session.take_toast(), Some(FlashMessage::info("one shot")));
        assert_eq!(session.take_toast(), None);
    }

    #[test]
    fn flash_last_write_wins() {
        let mut session = Session::default();
        session.set_toast(FlashMessage::info("first"));
        session.set_toast(FlashMessage::success("second"));

        assert_eq!(session.take_toast(), Some(FlashMessage::success("second")));
    }

    #[test]
    fn cookie_signed_with_unknown_secret_loads_empty() {
        let other = SessionStore::new(SecretString::from("different-secret".to_string()));
        let mut session = Session::default();
        session.set("userId", Value::from("u_123"));
        let cookie = other.commit(&session).expect("commit should succeed");

        let header = format!("__session={}", cookie_value(&cookie));
        assert!(store().load(Some(&header)).is_empty());
    }

    #[test]
    fn rotated_secret_cookie_still_loads() {
        let old = SessionStore::new(SecretString::from("old-secret".to_string()));
        let mut session = Session::default();
        session.set("userId", Value::from("u_123"));
        let cookie = old.commit(&session).expect("commit should succeed");
        let header = format!("__session={}", cookie_value(&cookie));

        let rotated = SessionStore::new(SecretString::from("new-secret".to_string()))
            .with_fallback_secrets(vec![SecretString::from("old-secret".to_string())]);
        let loaded = rotated.load(Some(&header));
        assert_eq!(loaded.get("userId"), Some(&Value::from("u_123")));
    }

    #[test]
    fn commit_renders_cookie_attributes() {
        let store = store();
        let cookie = store.commit(&Session::default()).expect("commit");
        let rendered = cookie.to_str().expect("ascii cookie");

        assert!(rendered.starts_with("__session="));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(!rendered.contains("Secure"));
        assert!(!rendered.contains("Max-Age"));
    }

    #[test]
    fn secure_and_max_age_attributes_are_configurable() {
        let store = store().with_secure(true).with_max_age_seconds(3600);
        let cookie = store.commit(&Session::default()).expect("commit");
        let rendered = cookie.to_str().expect("ascii cookie");

        assert!(rendered.contains("; Secure"));
        assert!(rendered.contains("Max-Age=3600"));
    }

    #[test]
    fn destroy_expires_the_cookie() {
        let store = store().with_cookie_name("app_session");
        let cookie = store.destroy().expect("destroy");
        let rendered = cookie.to_str().expect("ascii cookie");

        assert!(rendered.starts_with("app_session=;"));
        assert!(rendered.contains("Max-Age=0"));
    }

    #[test]
    fn find_cookie_handles_multiple_pairs() {
        let header = "theme=dark; __session=abc.def; lang=en";
        assert_eq!(find_cookie(header, "__session"), Some("abc.def"));
        assert_eq!(find_cookie(header, "missing"), None);
    }
}
