//! Access token acquisition and caching

use kelvin_common::SecureString;
use kelvin_domain::{KelvinError, Result, Token};
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::request::RequestOptions;
use super::response::BodyMode;
use super::transport::{Body, Transport};

/// Caches the bearer token of one session
///
/// The async mutex is held across the exchange so that concurrent callers
/// waiting for a fresh token trigger a single request.
#[derive(Debug)]
pub struct TokenManager {
    username: String,
    password: SecureString,
    token_url: String,
    cached: Mutex<Option<Token>>,
}

impl TokenManager {
    pub fn new(username: impl Into<String>, password: SecureString, token_url: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password,
            token_url: token_url.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Cached token if it is still valid, else a new one from the server.
    pub(crate) async fn get_token(&self, transport: &Transport) -> Result<SecureString> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_valid()) {
            return Ok(token.value().clone());
        }

        info!(
            username = %self.username,
            password = %self.password,
            url = %self.token_url,
            "requesting access token"
        );
        let form = [("username", self.username.as_str()), ("password", self.password.expose())];
        let response = transport
            .execute(
                Method::POST,
                &self.token_url,
                Body::Form(&form),
                None,
                &RequestOptions::default(),
                BodyMode::Json,
            )
            .await?
            .into_json();
        let raw = response
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| KelvinError::InvalidToken("response lacks 'access_token'".into()))?;
        let token = Token::from_jwt(raw)?;
        debug!(expiry = %token.expiry(), "cached new access token");

        let value = token.value().clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Forget the cached token; the next request fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    /// Currently cached token, valid or not.
    pub async fn current(&self) -> Option<Token> {
        self.cached.lock().await.clone()
    }
}
