//! Bearer tokens and their expiry.
//!
//! Tokens are decoded as JWTs WITHOUT signature verification. The client never
//! holds the signing key; it only needs the `exp` claim to decide when to
//! refresh. Polaris validates the signature on every request, so the decoded
//! claims are never used for an authorization decision on this side.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use polaris_config::constants::TOKEN_EXPIRY_SKEW_SECS;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ClientError;

/// Claims decoded from a JWT payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    pub iat: Option<f64>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    /// Remaining claims, kept for inspection.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(jwt: &str) -> Result<Claims, String> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 segments, found {}", parts.len()));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| format!("base64 decode error: {e}"))?;
    serde_json::from_slice(&payload).map_err(|e| format!("invalid JSON payload: {e}"))
}

/// A bearer credential.
///
/// Tokens are immutable; the transport replaces an expired token instead of
/// updating it.
#[derive(Debug, Clone)]
pub struct Token {
    raw: SecretString,
    claims: Option<Claims>,
    expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Create a token from a raw JWT, decoding its claims.
    ///
    /// A value that cannot be decoded still produces a token, but one without
    /// claims, which is always expired.
    pub fn from_jwt(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let claims = match decode_claims(&raw) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to decode token claims, treating token as expired");
                None
            }
        };
        let expires_at = claims
            .as_ref()
            .and_then(|c| c.exp)
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp.trunc() as i64, 0));

        Self {
            raw: SecretString::new(raw.into()),
            claims,
            expires_at,
        }
    }

    /// Decoded claims, if the raw value was a decodable JWT.
    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// Expiry instant from the `exp` claim.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the token is expired, or expires within the skew window, at `now`.
    ///
    /// Tokens without an expiry claim are always expired.
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + Duration::seconds(TOKEN_EXPIRY_SKEW_SECS),
            None => true,
        }
    }

    /// Check if the token is expired now.
    pub fn is_expired(&self) -> bool {
        self.expired(Utc::now())
    }

    /// Raw bearer value.
    pub fn expose(&self) -> &str {
        self.raw.expose_secret()
    }

    /// Set the `Authorization: Bearer` header on an outgoing request.
    ///
    /// Fails without touching the request when the token is not a valid
    /// header value.
    pub fn apply(&self, request: &mut reqwest::Request) -> Result<(), ClientError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.expose())).map_err(|_| {
            ClientError::InvalidResponse(
                "token contains characters not allowed in a header".to_string(),
            )
        })?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jwt_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.sig")
    }

    fn jwt_expiring_at(exp: i64) -> String {
        jwt_with_payload(&serde_json::json!({"exp": exp, "sub": "user"}))
    }

    #[test]
    fn test_decode_claims() {
        let claims = decode_claims(&jwt_with_payload(&serde_json::json!({
            "exp": 1_700_000_000,
            "iss": "polaris",
            "org": "acme"
        })))
        .unwrap();
        assert_eq!(claims.exp, Some(1_700_000_000.0));
        assert_eq!(claims.iss.as_deref(), Some("polaris"));
        assert_eq!(claims.extra["org"], "acme");
    }

    #[test]
    fn test_decode_claims_rejects_non_jwt() {
        assert!(decode_claims("opaque-token").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
        assert!(decode_claims(&format!("a.{}.c", URL_SAFE_NO_PAD.encode("nope"))).is_err());
    }

    #[test]
    fn test_token_without_claims_is_expired() {
        let token = Token::from_jwt("opaque-token");
        assert!(token.claims().is_none());
        assert!(token.is_expired());
    }

    #[test]
    fn test_token_without_exp_is_expired() {
        let token = Token::from_jwt(jwt_with_payload(&serde_json::json!({"sub": "user"})));
        assert!(token.claims().is_some());
        assert!(token.expires_at().is_none());
        assert!(token.is_expired());
    }

    #[test]
    fn test_token_skew_boundary() {
        let now = Utc::now();
        let exp = now.timestamp() + 3600;
        let token = Token::from_jwt(jwt_expiring_at(exp));
        let now = DateTime::<Utc>::from_timestamp(now.timestamp(), 0).unwrap();

        assert!(!token.expired(now));
        // Exactly one skew window before expiry counts as expired.
        assert!(token.expired(now + Duration::seconds(3600 - TOKEN_EXPIRY_SKEW_SECS)));
        assert!(!token.expired(now + Duration::seconds(3600 - TOKEN_EXPIRY_SKEW_SECS - 1)));
    }

    #[test]
    fn test_apply_sets_bearer_header() {
        let token = Token::from_jwt(jwt_expiring_at(4_000_000_000));
        let mut request = reqwest::Request::new(
            reqwest::Method::POST,
            "https://acme.my.rubrik.com/api/graphql".parse().unwrap(),
        );
        token.apply(&mut request).unwrap();

        let header = request.headers().get(AUTHORIZATION).unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.to_str().unwrap(), format!("Bearer {}", token.expose()));
    }

    #[test]
    fn test_apply_rejects_invalid_header_value() {
        let token = Token::from_jwt("bad\nvalue");
        let mut request = reqwest::Request::new(
            reqwest::Method::POST,
            "https://acme.my.rubrik.com/api/graphql".parse().unwrap(),
        );
        let err = token.apply(&mut request).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_value_not_in_debug() {
        let token = Token::from_jwt("super-secret-bearer");
        let debug_output = format!("{:?}", token);
        assert!(!debug_output.contains("super-secret-bearer"));
    }

    proptest! {
        #[test]
        fn prop_expiry_beyond_skew_is_valid(offset in (TOKEN_EXPIRY_SKEW_SECS + 1)..100_000i64) {
            let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
            let token = Token::from_jwt(jwt_expiring_at(now.timestamp() + offset));
            prop_assert!(!token.expired(now));
        }

        #[test]
        fn prop_expiry_within_skew_is_expired(offset in -100_000i64..=TOKEN_EXPIRY_SKEW_SECS) {
            let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
            let token = Token::from_jwt(jwt_expiring_at(now.timestamp() + offset));
            prop_assert!(token.expired(now));
        }

        #[test]
        fn prop_undecodable_token_is_expired(raw in "[a-zA-Z0-9_-]{0,64}") {
            let token = Token::from_jwt(raw);
            prop_assert!(token.is_expired());
        }
    }
}
