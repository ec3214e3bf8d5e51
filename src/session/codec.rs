//! Signed cookie payload codec.
//!
//! A session cookie value is `payload.signature`: the payload is URL-safe
//! base64 JSON and the signature is a URL-safe base64 HMAC-SHA256 tag over
//! the encoded payload. Signing always uses the first configured secret;
//! verification accepts any configured secret so old cookies keep working
//! while secrets rotate.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Encode and sign a payload into a cookie value.
pub(crate) fn sign(payload: &[u8], secret: &SecretString) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(payload);

    // new_from_slice accepts any key length for SHA-256
    let mut mac = match HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(), // Unreachable
    };
    mac.update(encoded.as_bytes());
    let tag = mac.finalize().into_bytes();

    format!("{encoded}.{}", URL_SAFE_NO_PAD.encode(tag))
}

/// Verify a cookie value against the configured secrets and return the
/// decoded payload.
///
/// Returns an error if:
/// - The value is not `payload.signature` with valid base64 parts
/// - No configured secret produces a matching signature (tampering, or the
///   cookie was signed with a secret that has been rotated out)
pub(crate) fn verify(value: &str, secrets: &[SecretString]) -> Result<Vec<u8>, CookieError> {
    let (encoded, tag) = value.split_once('.').ok_or(CookieError::InvalidFormat)?;
    let tag = URL_SAFE_NO_PAD
        .decode(tag)
        .map_err(|_| CookieError::InvalidFormat)?;

    for secret in secrets {
        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|_| CookieError::InvalidFormat)?;
        mac.update(encoded.as_bytes());
        // verify_slice compares in constant time
        if mac.verify_slice(&tag).is_ok() {
            return URL_SAFE_NO_PAD
                .decode(encoded)
                .map_err(|_| CookieError::InvalidFormat);
        }
    }

    Err(CookieError::InvalidSignature)
}

/// Errors that can occur while decoding a session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CookieError {
    /// Cookie value is malformed (missing separator or invalid base64).
    InvalidFormat,
    /// No configured secret matches the signature.
    InvalidSignature,
}

impl std::fmt::Display for CookieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CookieError::InvalidFormat => write!(f, "malformed session cookie"),
            CookieError::InvalidSignature => write!(f, "session cookie signature mismatch"),
        }
    }
}

impl std::error::Error for CookieError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn sign_verify_round_trip() {
        let key = secret("s3cr3t");
        let value = sign(b"{\"hello\":\"world\"}", &key);
        let payload = verify(&value, std::slice::from_ref(&key)).expect("verify should succeed");
        assert_eq!(payload, b"{\"hello\":\"world\"}");
    }

    #[test]
    fn sign_is_deterministic() {
        let key = secret("s3cr3t");
        assert_eq!(sign(b"payload", &key), sign(b"payload", &key));
    }

    #[test]
    fn tampered_payload_rejected() {
        let key = secret("s3cr3t");
        let value = sign(b"role=user", &key);
        let forged_payload = URL_SAFE_NO_PAD.encode(b"role=admin");
        let tag = value.split_once('.').map(|(_, tag)| tag).unwrap_or_default();
        let forged = format!("{forged_payload}.{tag}");
        assert_eq!(
            verify(&forged, &[key]),
            Err(CookieError::InvalidSignature),
            "payload swap must not verify"
        );
    }

    #[test]
    fn unknown_secret_rejected() {
        let value = sign(b"payload", &secret("old-and-gone"));
        let result = verify(&value, &[secret("current")]);
        assert_eq!(result, Err(CookieError::InvalidSignature));
    }

    #[test]
    fn rotated_secret_still_verifies() {
        let old = secret("old");
        let new = secret("new");
        let value = sign(b"payload", &old);
        // Rotation keeps the old secret in the verification list.
        let payload = verify(&value, &[new, old]).expect("old cookie should verify");
        assert_eq!(payload, b"payload");
    }

    #[test]
    fn malformed_values_rejected() {
        let key = secret("s3cr3t");
        assert_eq!(
            verify("no-separator", std::slice::from_ref(&key)),
            Err(CookieError::InvalidFormat)
        );
        assert_eq!(
            verify("!!!.!!!", std::slice::from_ref(&key)),
            Err(CookieError::InvalidFormat)
        );
        assert_eq!(verify("", &[key]), Err(CookieError::InvalidFormat));
    }
}
