//! Session token codec (HS256 over `jsonwebtoken`).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::claims::{validate_claims, SessionClaims, TokenValidationError};
use crate::{PrincipalId, Role};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(String),

    #[error("token rejected: {0}")]
    Invalid(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Transport-level codec for session tokens.
///
/// The API depends on this trait, not on a concrete signing scheme.
pub trait SessionCodec: Send + Sync {
    fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError>;
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// JWT wire claims (seconds-since-epoch timestamps).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: Uuid,
    name: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
}

/// HS256 session codec.
pub struct Hs256SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256SessionCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl SessionCodec for Hs256SessionCodec {
    fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let wire = WireClaims {
            sub: *claims.sub.as_uuid(),
            name: claims.name.clone(),
            roles: claims
                .roles
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        // Signature check here; the time window is checked against the
        // caller's clock via validate_claims, not jsonwebtoken's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        let claims = SessionClaims {
            sub: PrincipalId::from_uuid(data.claims.sub),
            name: data.claims.name,
            roles: data.claims.roles.into_iter().map(Role::new).collect(),
            issued_at: DateTime::from_timestamp(data.claims.iat, 0)
                .ok_or_else(|| TokenError::Invalid("iat out of range".to_string()))?,
            expires_at: DateTime::from_timestamp(data.claims.exp, 0)
                .ok_or_else(|| TokenError::Invalid("exp out of range".to_string()))?,
        };

        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(now: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            sub: PrincipalId::new(),
            name: "Administrator".to_string(),
            roles: vec![Role::admin()],
            issued_at: now,
            expires_at: now + Duration::hours(24),
        }
    }

    #[test]
    fn token_round_trips() {
        let codec = Hs256SessionCodec::new(b"test-secret");
        let now = Utc::now();
        let issued = claims(now);

        let token = codec.issue(&issued).unwrap();
        let decoded = codec.validate(&token, now + Duration::minutes(1)).unwrap();

        assert_eq!(decoded.sub, issued.sub);
        assert_eq!(decoded.name, "Administrator");
        assert_eq!(decoded.roles, vec![Role::admin()]);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let codec = Hs256SessionCodec::new(b"test-secret");
        let other = Hs256SessionCodec::new(b"other-secret");
        let now = Utc::now();

        let token = codec.issue(&claims(now)).unwrap();
        let err = other.validate(&token, now).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = Hs256SessionCodec::new(b"test-secret");
        let now = Utc::now();

        let token = codec.issue(&claims(now)).unwrap();
        let err = codec.validate(&token, now + Duration::hours(25)).unwrap_err();
        assert!(matches!(
            err,
            TokenError::Claims(TokenValidationError::Expired)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let codec = Hs256SessionCodec::new(b"test-secret");
        let err = codec.validate("not-a-token", Utc::now()).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }
}
