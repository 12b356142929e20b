//! HS256 JWT implementation of the token service port.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::Email;
use crate::domain::ports::{Identity, TokenService, TokenServiceError};

const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    iat: i64,
    exp: i64,
}

/// Token service signing and verifying HS256 JWTs with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Build a service over the given signing secret with a 24 hour TTL.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Override the token validity window.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<String, TokenServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.email.to_string(),
            name: identity.display_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenServiceError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenServiceError::expired(),
                _ => TokenServiceError::invalid(err.to_string()),
            }
        })?;

        let email = Email::new(&data.claims.sub)
            .map_err(|err| TokenServiceError::invalid(format!("subject claim: {err}")))?;

        Ok(Identity {
            email,
            display_name: data.claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    fn identity() -> Identity {
        Identity {
            email: Email::new("ada@example.com").expect("valid email"),
            display_name: Some("Ada".to_owned()),
        }
    }

    #[test]
    fn issued_token_verifies_with_the_same_secret() {
        let service = JwtTokenService::new(SECRET);
        let token = service.issue(&identity()).expect("issue succeeds");

        let verified = service.verify(&token).expect("verify succeeds");
        assert_eq!(verified.email.as_ref(), "ada@example.com");
        assert_eq!(verified.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn foreign_secret_is_rejected_as_invalid() {
        let token = JwtTokenService::new(SECRET)
            .issue(&identity())
            .expect("issue succeeds");

        let error = JwtTokenService::new(b"other-secret")
            .verify(&token)
            .expect_err("wrong secret");
        assert!(matches!(error, TokenServiceError::Invalid { .. }));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Two minutes in the past beats the default 60 second leeway.
        let service = JwtTokenService::new(SECRET).with_ttl(Duration::minutes(-2));
        let token = service.issue(&identity()).expect("issue succeeds");

        let error = service.verify(&token).expect_err("past validity");
        assert_eq!(error, TokenServiceError::Expired);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let error = JwtTokenService::new(SECRET)
            .verify("not-a-token")
            .expect_err("malformed");
        assert!(matches!(error, TokenServiceError::Invalid { .. }));
    }
}
