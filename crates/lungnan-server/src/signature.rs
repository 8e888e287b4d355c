//! LINE webhook signature verification
//!
//! LINE signs every webhook body with HMAC-SHA256 keyed by the channel secret
//! and sends the base64 digest in `X-Line-Signature`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the channel secret
pub const CHANNEL_SECRET_ENV: &str = "LINE_CHANNEL_SECRET";

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Check a signature header against the raw request body
///
/// The digest comparison is constant-time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Base64 HMAC-SHA256 of `body`, as LINE computes it
#[cfg(test)]
pub(crate) fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_round_trip() {
        let body = br#"{"events":[]}"#;
        let signature = sign("channel-secret", body);
        assert!(verify_signature("channel-secret", body, &signature));
    }

    #[test]
    fn test_rejects_tampered_body_and_wrong_secret() {
        let signature = sign("channel-secret", b"original");
        assert!(!verify_signature("channel-secret", b"tampered", &signature));
        assert!(!verify_signature("other-secret", b"original", &signature));
    }

    #[test]
    fn test_rejects_malformed_header() {
        assert!(!verify_signature("channel-secret", b"body", ""));
        assert!(!verify_signature("channel-secret", b"body", "not base64!"));
    }
}
