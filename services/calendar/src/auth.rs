//! Bearer credential verification
//!
//! Tokens are HS256 JWTs carrying `{user, exp}`. The algorithm allow-list
//! holds HS256 only, so a token whose header names any other algorithm is
//! rejected before its signature is looked at.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tonic::metadata::MetadataMap;

/// Metadata entry carrying the credential.
pub const AUTHORIZATION_KEY: &str = "authorization";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: String,
    /// Expiry, Unix seconds.
    pub exp: u64,
}

/// Caller identity established by a valid credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization token is not provided")]
    MissingCredential,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unexpected signing method")]
    UnexpectedAlgorithm,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Rejected(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Verifies (and, for tooling, issues) HS256 credentials against a shared
/// secret. Holds no mutable state.
pub struct AuthGate {
    decoding: DecodingKey,
    encoding: EncodingKey,
    validation: Validation,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding: DecodingKey::from_secret(secret),
            encoding: EncodingKey::from_secret(secret),
            validation,
        }
    }

    /// Check a credential and return the caller it names.
    pub fn validate(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::MissingCredential),
        };

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => AuthError::Malformed(e.to_string()),
                _ => AuthError::Rejected(e.to_string()),
            }
        })?;

        Ok(Identity {
            user: data.claims.user,
        })
    }

    /// Issue a token for `user` that expires `ttl` from now.
    pub fn mint(&self, user: &str, ttl: Duration) -> Result<String, AuthError> {
        self.sign(&Claims {
            user: user.to_string(),
            exp: get_current_timestamp().saturating_add(ttl.as_secs()),
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

/// Pull the raw credential out of request metadata.
///
/// Accepts both a bare token and `Bearer <token>`, with the scheme matched
/// case-insensitively. Non-ASCII values are treated as absent.
pub fn credential_from_metadata(metadata: &MetadataMap) -> Option<&str> {
    let raw = metadata.get(AUTHORIZATION_KEY)?.to_str().ok()?.trim();
    match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token.trim_start()),
        _ => Some(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::metadata::MetadataValue;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_round_trip_identity() {
        let gate = AuthGate::new(SECRET);
        let token = gate.mint("test_user", Duration::from_secs(3600)).unwrap();
        let identity = gate.validate(Some(&token)).unwrap();
        assert_eq!(identity.user, "test_user");
    }

    #[test]
    fn test_missing_credential() {
        let gate = AuthGate::new(SECRET);
        assert_eq!(gate.validate(None), Err(AuthError::MissingCredential));
        assert_eq!(gate.validate(Some("  ")), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_expired_token() {
        let gate = AuthGate::new(SECRET);
        let token = gate
            .sign(&Claims {
                user: "test_user".into(),
                exp: get_current_timestamp() - 10,
            })
            .unwrap();
        assert_eq!(gate.validate(Some(&token)), Err(AuthError::Expired));
    }

    #[test]
    fn test_rejects_other_hmac_algorithm() {
        let gate = AuthGate::new(SECRET);
        let claims = Claims {
            user: "test_user".into(),
            exp: get_current_timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(gate.validate(Some(&token)), Err(AuthError::UnexpectedAlgorithm));
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let gate = AuthGate::new(SECRET);
        let other = AuthGate::new(b"another-secret");
        let token = other.mint("test_user", Duration::from_secs(3600)).unwrap();
        assert_eq!(gate.validate(Some(&token)), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_rejects_garbage() {
        let gate = AuthGate::new(SECRET);
        assert!(matches!(
            gate.validate(Some("not-a-jwt")),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let gate = AuthGate::new(SECRET);
        assert!(!format!("{:?}", gate).contains("test-secret"));
    }

    #[test]
    fn test_credential_from_metadata() {
        let mut md = MetadataMap::new();
        assert_eq!(credential_from_metadata(&md), None);

        md.insert(AUTHORIZATION_KEY, MetadataValue::from_static("abc.def.ghi"));
        assert_eq!(credential_from_metadata(&md), Some("abc.def.ghi"));

        md.insert(AUTHORIZATION_KEY, MetadataValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(credential_from_metadata(&md), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let mut md = MetadataMap::new();
        for value in ["bearer abc.def.ghi", "BEARER abc.def.ghi", "Bearer   abc.def.ghi"] {
            md.insert(AUTHORIZATION_KEY, value.parse().unwrap());
            assert_eq!(credential_from_metadata(&md), Some("abc.def.ghi"), "{value}");
        }

        let gate = AuthGate::new(SECRET);
        let token = gate.mint("test_user", Duration::from_secs(3600)).unwrap();
        md.insert(AUTHORIZATION_KEY, format!("bearer {token}").parse().unwrap());
        let identity = gate.validate(credential_from_metadata(&md)).unwrap();
        assert_eq!(identity.user, "test_user");
    }
}
