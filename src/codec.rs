//! Expiry extraction from access tokens.
//!
//! The access token is a three-segment dot-separated string whose middle
//! segment is base64url JSON claims. This module reads the `exp` claim
//! **without verifying the signature** — it establishes timing, never
//! authenticity. An undecodable token yields `None`, which callers must
//! treat as "not provably expired": the lookup API's 401 is the ground
//! truth, this is only a hint that saves a doomed round trip.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value as JsonValue;

/// Number of dot-separated segments in a well-formed access token.
const TOKEN_SEGMENTS: usize = 3;

/// Reads the `exp` claim (seconds since epoch) from an access token.
///
/// Returns `None` if the segment count is wrong, the claims segment is not
/// valid base64url JSON, or `exp` is missing or non-numeric.
#[must_use]
pub fn decode_expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != TOKEN_SEGMENTS {
        return None;
    }

    let claims_bytes = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let claims: JsonValue = serde_json::from_slice(&claims_bytes).ok()?;

    claims.get("exp")?.as_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(claims: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn test_decodes_exp_claim() {
        let token = make_token(r#"{"sub":"abc","exp":1700000000}"#);
        assert_eq!(decode_expiry(&token), Some(1_700_000_000));
    }

    #[test]
    fn test_wrong_segment_count() {
        assert_eq!(decode_expiry("just-one-segment"), None);
        assert_eq!(decode_expiry("two.segments"), None);
        assert_eq!(decode_expiry("a.b.c.d"), None);
    }

    #[test]
    fn test_claims_not_base64() {
        assert_eq!(decode_expiry("header.!!not-base64!!.sig"), None);
    }

    #[test]
    fn test_claims_not_json() {
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json at all"));
        assert_eq!(decode_expiry(&token), None);
    }

    #[test]
    fn test_missing_exp() {
        let token = make_token(r#"{"sub":"abc"}"#);
        assert_eq!(decode_expiry(&token), None);
    }

    #[test]
    fn test_non_numeric_exp() {
        let token = make_token(r#"{"exp":"tomorrow"}"#);
        assert_eq!(decode_expiry(&token), None);
    }

    #[test]
    fn test_no_signature_inspection() {
        // The third segment is opaque here; garbage must not affect decoding.
        let claims = URL_SAFE_NO_PAD.encode(r#"{"exp":42}"#);
        let token = format!("h.{claims}.completely-bogus-signature");
        assert_eq!(decode_expiry(&token), Some(42));
    }
}
