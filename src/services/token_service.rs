//! Issuing and verifying access tokens.
//!
//! Tokens are HS256 JWTs carrying `{id, type, iat, exp}` with a fixed one hour
//! lifetime. Verification is pure and synchronous: it checks signature and
//! expiry only. Whether the subject still exists is decided by the caller
//! against the live user store.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{Claims, Role};

pub const TOKEN_TTL_SECONDS: i64 = 3600;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("no credential presented")]
    MissingCredential,

    #[error("token is malformed or its signature does not verify")]
    InvalidToken,

    #[error("token has expired")]
    Expired,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Cheap to clone; the key material is shared and never mutated after
/// construction.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    validation: Arc<Validation>,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            validation: Arc::new(validation),
        }
    }

    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expires_at = issued_at + Duration::seconds(TOKEN_TTL_SECONDS);
        let claims = Claims {
            id: user_id.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
    }

    /// Verifies the raw value of an `Authorization` header.
    ///
    /// The `Bearer ` scheme prefix is stripped when present. Failures are
    /// classified into exactly one of `MissingCredential`, `InvalidToken` or
    /// `Expired`; a tampered token that has also expired reports
    /// `InvalidToken` because the signature is checked first.
    pub fn verify(&self, authorization: Option<&str>) -> Result<Claims, TokenError> {
        let raw = authorization.ok_or(TokenError::MissingCredential)?;
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test_secret_key")
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let tokens = service();
        for role in Role::ALL {
            let token = tokens.issue("u1", role).unwrap();
            let claims = tokens.verify(Some(&format!("Bearer {}", token))).unwrap();
            assert_eq!(claims.id, "u1");
            assert_eq!(claims.role, role);
            assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        }
    }

    #[test]
    fn test_token_has_three_segments() {
        let token = service().issue("u1", Role::Admin).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(service().verify(None), Err(TokenError::MissingCredential));
    }

    #[test]
    fn test_empty_bearer_is_invalid() {
        assert_eq!(service().verify(Some("Bearer ")), Err(TokenError::InvalidToken));
        assert_eq!(service().verify(Some("")), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_token_without_scheme_is_accepted() {
        let tokens = service();
        let token = tokens.issue("u1", Role::Employee).unwrap();
        assert_eq!(tokens.verify(Some(&token)).unwrap().id, "u1");
    }

    #[test]
    fn test_expired_token() {
        let tokens = service();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_TTL_SECONDS + 60);
        let token = tokens.issue_at("u1", Role::Admin, issued_at).unwrap();
        assert_eq!(
            tokens.verify(Some(&format!("Bearer {}", token))),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_within_window_is_valid() {
        let tokens = service();
        let issued_at = Utc::now() - Duration::seconds(TOKEN_TTL_SECONDS - 60);
        let token = tokens.issue_at("u1", Role::Admin, issued_at).unwrap();
        assert!(tokens.verify(Some(&format!("Bearer {}", token))).is_ok());
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let token = TokenService::new("other_secret").issue("u1", Role::Admin).unwrap();
        assert_eq!(
            service().verify(Some(&format!("Bearer {}", token))),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(
            service().verify(Some("Bearer not.a.jwt")),
            Err(TokenError::InvalidToken)
        );
    }
}
