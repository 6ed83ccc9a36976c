use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token subject is not a user id")]
    Subject,
    #[error("token lifetime of {0} minutes is out of range")]
    Lifetime(i64),
}

/// JWT payload. `sub` is the user id rendered as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Subject)
    }
}

/// Signing and verification keys, built once from config at startup.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl_minutes: Option<i64>,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_minutes: config.ttl_minutes,
        }
    }

    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let exp = match self.ttl_minutes {
            Some(minutes) => Some(expiry(now, minutes).ok_or(TokenError::Lifetime(minutes))?),
            None => None,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, issuer, audience and `exp` when present.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        if self.ttl_minutes.is_none() {
            validation.required_spec_claims.remove("exp");
        }
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }

    /// Verifies the token and resolves its subject to a user id.
    pub fn verify_user(&self, token: &str) -> Result<i32, TokenError> {
        self.verify(token)?.user_id()
    }
}

/// `now + minutes` as a unix timestamp, or `None` when it is not a positive, representable instant.
fn expiry(now: OffsetDateTime, minutes: i64) -> Option<usize> {
    if minutes < 1 {
        return None;
    }
    let seconds = minutes.checked_mul(60)?;
    let at = now.checked_add(Duration::seconds(seconds))?;
    usize::try_from(at.unix_timestamp()).ok()
}
