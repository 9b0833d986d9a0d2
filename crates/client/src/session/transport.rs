//! Connection handling, header injection and concurrency limiting

use std::time::Duration;

use kelvin_common::privacy::mask_pairs;
use kelvin_common::SecureString;
use kelvin_domain::{KelvinError, Result};
use parking_lot::RwLock;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, trace};
use uuid::Uuid;

use super::request::{Payload, RequestOptions};
use super::response::{classify, BodyMode};
use crate::errors::TransportError;
use crate::http::HttpClient;

const JSON: &str = "application/json";

/// Request body variants sent by the session.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Body<'a> {
    Empty,
    Json(&'a Value),
    Form(&'a [(&'a str, &'a str)]),
}

/// Settings applied to every request unless overridden per call.
#[derive(Debug, Clone)]
pub(crate) struct TransportSettings {
    pub timeout: Duration,
    pub language: Option<String>,
    pub request_id: Option<String>,
    pub request_id_header: String,
    pub verify_tls: bool,
}

#[derive(Debug)]
pub(crate) struct Transport {
    client: RwLock<Option<HttpClient>>,
    limiter: Semaphore,
    settings: TransportSettings,
}

impl Transport {
    pub fn new(max_client_tasks: usize, settings: TransportSettings) -> Self {
        Self { client: RwLock::new(None), limiter: Semaphore::new(max_client_tasks), settings }
    }

    /// Create the connection pool unless it already exists.
    pub fn open(&self) -> Result<HttpClient> {
        if let Some(client) = self.client.read().as_ref() {
            return Ok(client.clone());
        }
        let mut slot = self.client.write();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = HttpClient::builder()
            .timeout(self.settings.timeout)
            .accept_invalid_certs(!self.settings.verify_tls)
            .build()?;
        debug!("opened HTTP connection pool");
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drop the connection pool. Returns whether it was open.
    pub fn close(&self) -> bool {
        let was_open = self.client.write().take().is_some();
        if was_open {
            debug!("closed HTTP connection pool");
        }
        was_open
    }

    pub fn is_open(&self) -> bool {
        self.client.read().is_some()
    }

    pub fn client(&self) -> Result<HttpClient> {
        self.client.read().clone().ok_or(KelvinError::SessionClosed)
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    /// Permits not currently held by in-flight requests.
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }

    /// Send one request and classify the response.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Body<'_>,
        bearer: Option<&SecureString>,
        options: &RequestOptions,
        mode: BodyMode,
    ) -> Result<Payload> {
        let client = self.client()?;
        let _permit = self.limiter.acquire().await.map_err(|_| KelvinError::SessionClosed)?;

        let timeout = options.timeout.unwrap_or(self.settings.timeout);
        let mut headers: Vec<(HeaderName, String)> = vec![(ACCEPT, JSON.to_string())];
        if let Some(token) = bearer {
            headers.push((AUTHORIZATION, format!("Bearer {}", token.expose())));
        }
        if matches!(body, Body::Json(_)) || (bearer.is_some() && !matches!(body, Body::Form(_))) {
            headers.push((CONTENT_TYPE, JSON.to_string()));
        }
        let id_header = options.request_id_header.as_deref().unwrap_or(&self.settings.request_id_header);
        let id_value = options
            .request_id
            .clone()
            .or_else(|| self.settings.request_id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        headers.push((header_name(id_header)?, id_value));
        if let Some(language) = options.language.as_ref().or(self.settings.language.as_ref()) {
            headers.push((ACCEPT_LANGUAGE, language.clone()));
        }

        trace!(
            %method,
            url,
            timeout_secs = timeout.as_secs_f64(),
            headers = ?mask_pairs(headers.iter().map(|(name, value)| (name.as_str(), value.as_str()))),
            params = ?options.params,
            "prepared request"
        );

        let mut builder = client.request(method.clone(), url).timeout(timeout);
        for (name, value) in headers {
            builder = builder.header(name, header_value(&value)?);
        }
        if !options.params.is_empty() {
            builder = builder.query(&options.params);
        }
        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(fields) => builder.form(fields),
        };

        let response = client.send(builder).await?;
        classify(&method, url, response, mode).await
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|err| TransportError::from(err).into())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| TransportError::from(err).into())
}
