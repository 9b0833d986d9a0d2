//! Bearer token issued by the Kelvin token endpoint
//!
//! The JWT payload is decoded without verifying the signature: the client
//! only needs the expiry to decide when to fetch a new token. Verification is
//! the server's job.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use kelvin_common::SecureString;
use serde::Deserialize;

use crate::errors::{KelvinError, Result};

/// Decoded access token with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: SecureString,
    expiry: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<serde_json::Value>,
}

impl Token {
    pub fn new(value: impl Into<SecureString>, expiry: DateTime<Utc>) -> Self {
        Self { value: value.into(), expiry }
    }

    /// Parse a compact JWT and read its `exp` claim.
    ///
    /// Error messages describe the problem but never include the token.
    pub fn from_jwt(raw: &str) -> Result<Self> {
        let payload = raw
            .split('.')
            .nth(1)
            .ok_or_else(|| KelvinError::InvalidToken("token is not a JWT".into()))?;
        // Some issuers pad the segments even though RFC 7515 says not to.
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| KelvinError::InvalidToken(format!("error decoding payload: {err}")))?;
        let claims: Claims = serde_json::from_slice(&bytes).map_err(|err| {
            KelvinError::InvalidToken(format!("payload is not a JSON object: {err}"))
        })?;
        let exp = claims
            .exp
            .ok_or_else(|| KelvinError::InvalidToken("payload is missing 'exp' entry".into()))?;
        let expiry = exp
            .as_i64()
            .or_else(|| exp.as_f64().filter(|secs| secs.is_finite()).map(|secs| secs as i64))
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| KelvinError::InvalidToken(format!("error parsing expiry date {exp}")))?;
        Ok(Self::new(raw, expiry))
    }

    pub fn value(&self) -> &SecureString {
        &self.value
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && now <= self.expiry
    }
}
