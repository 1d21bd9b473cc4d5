//! Webhook request authentication.
//!
//! The platform signs each request body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in `X-Line-Signature`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::SignatureError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

fn new_mac(channel_secret: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    Ok(mac)
}

/// Base64 signature the platform would send for `body`
pub fn sign(channel_secret: &str, body: &[u8]) -> Result<String, SignatureError> {
    let mac = new_mac(channel_secret, body)?;
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check `signature` against `body`; the comparison is constant-time
pub fn verify_signature(
    channel_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), SignatureError> {
    let signature = signature.ok_or(SignatureError::MissingHeader)?;
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| SignatureError::BadEncoding)?;
    new_mac(channel_secret, body)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-channel-secret";
    const BODY: &[u8] = br#"{"destination":"U1","events":[]}"#;

    #[test]
    fn test_valid_signature() {
        let signature = sign(SECRET, BODY).unwrap();
        assert_eq!(verify_signature(SECRET, BODY, Some(&signature)), Ok(()));
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign(SECRET, BODY).unwrap();
        assert_eq!(
            verify_signature(SECRET, br#"{"destination":"U2","events":[]}"#, Some(&signature)),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_signature("other-secret", BODY, Some(&signature)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_missing_or_garbled_header() {
        assert_eq!(
            verify_signature(SECRET, BODY, None),
            Err(SignatureError::MissingHeader)
        );
        assert_eq!(
            verify_signature(SECRET, BODY, Some("not base64!!")),
            Err(SignatureError::BadEncoding)
        );
    }
}
