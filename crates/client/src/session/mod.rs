//! Transport session
//!
//! A [`Session`] owns the HTTP connection pool, the cached access token and
//! the concurrency limit for one Kelvin installation. It is shared by
//! reference counting: resources and records hold an `Arc<Session>`.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kelvin_client::{Session, SessionConfig};
//! use kelvin_domain::{Identity, User};
//!
//! # async fn run() -> kelvin_domain::Result<()> {
//! let config = SessionConfig::builder("kelvin.example.com", "admin", "s3cr3t").build();
//! let session = Arc::new(Session::new(config)?);
//! let user = session
//!     .scoped(|session| async move {
//!         session.resource::<User>().get(&Identity::name("demo_student")).await
//!     })
//!     .await?;
//! println!("{user}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod request;
pub mod response;
pub mod token_manager;
mod transport;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kelvin_common::privacy::mask_json;
use kelvin_domain::constants::{DEFAULT_TIMEOUT_SECS, MIN_CLIENT_TASKS};
use kelvin_domain::{Entity, KelvinError, ResourceUrls, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument, trace, warn};

pub use self::config::{SessionConfig, SessionConfigBuilder};
pub use self::request::{Payload, RequestOptions};
pub use self::response::BodyMode;
pub use self::token_manager::TokenManager;
use self::transport::{Body, Transport, TransportSettings};
use crate::resource::Resource;

/// Authenticated connection context for one Kelvin installation
#[derive(Debug)]
pub struct Session {
    host: String,
    urls: ResourceUrls,
    max_client_tasks: usize,
    transport: Transport,
    tokens: TokenManager,
}

impl Session {
    /// Create a closed session. Call [`Session::open`] or use
    /// [`Session::scoped`] before sending requests.
    ///
    /// A concurrency limit below the minimum is raised with a warning.
    pub fn new(config: SessionConfig) -> Result<Self> {
        if config.host.trim().is_empty() && config.base_url.is_none() {
            return Err(KelvinError::Config("either 'host' or 'base_url' must be set".into()));
        }
        let max_client_tasks = if config.max_client_tasks < MIN_CLIENT_TASKS {
            warn!(
                requested = config.max_client_tasks,
                minimum = MIN_CLIENT_TASKS,
                "Raising value of 'max_client_tasks' to its minimum of {MIN_CLIENT_TASKS}."
            );
            MIN_CLIENT_TASKS
        } else {
            config.max_client_tasks
        };

        let urls = config.urls();
        info!(
            host = %config.host,
            base = %urls.base(),
            username = %config.username,
            password = %config.password,
            max_client_tasks,
            "created Kelvin session"
        );

        let settings = TransportSettings {
            timeout: config.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            language: config.language,
            request_id: config.request_id,
            request_id_header: config.request_id_header,
            verify_tls: config.verify_tls,
        };
        Ok(Self {
            host: config.host,
            tokens: TokenManager::new(config.username, config.password, urls.token()),
            urls,
            max_client_tasks,
            transport: Transport::new(max_client_tasks, settings),
        })
    }

    /// Create and open a session in one step.
    pub fn connect(config: SessionConfig) -> Result<Arc<Self>> {
        let session = Arc::new(Self::new(config)?);
        session.open()?;
        Ok(session)
    }

    /// Open the connection pool. Idempotent.
    pub fn open(&self) -> Result<()> {
        self.transport.open().map(|_| ())
    }

    /// Release the connection pool. Later requests fail with
    /// [`KelvinError::SessionClosed`] until the session is opened again.
    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Underlying HTTP client.
    pub fn client(&self) -> Result<crate::http::HttpClient> {
        self.transport.client()
    }

    /// Open the session, run `f` and close the session on every exit path,
    /// including errors, panics and cancellation of the returned future.
    pub async fn scoped<F, Fut, T>(self: &Arc<Self>, f: F) -> Result<T>
    where
        F: FnOnce(Arc<Session>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.open()?;
        let _guard = CloseGuard(Arc::clone(self));
        f(Arc::clone(self)).await
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        self.tokens.username()
    }

    pub fn urls(&self) -> &ResourceUrls {
        &self.urls
    }

    /// Effective concurrency limit after applying the minimum.
    pub fn max_client_tasks(&self) -> usize {
        self.max_client_tasks
    }

    /// Requests that may start right now without waiting.
    pub fn available_request_slots(&self) -> usize {
        self.transport.available_permits()
    }

    pub fn timeout(&self) -> Duration {
        self.transport.settings().timeout
    }

    pub fn language(&self) -> Option<&str> {
        self.transport.settings().language.as_deref()
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Valid bearer token, fetched from the server when needed.
    pub async fn token(&self) -> Result<kelvin_common::SecureString> {
        self.tokens.get_token(&self.transport).await
    }

    /// Accessor for entities of type `E` bound to this session.
    pub fn resource<E: Entity>(self: &Arc<Self>) -> Resource<E> {
        Resource::new(Arc::clone(self))
    }

    #[instrument(skip(self, options), fields(method = "GET"))]
    pub async fn get(&self, url: &str, options: &RequestOptions) -> Result<Value> {
        self.authed(Method::GET, url, Body::Empty, options, BodyMode::Json).await.map(Payload::into_json)
    }

    /// GET returning the raw response text.
    #[instrument(skip(self, options), fields(method = "GET"))]
    pub async fn get_text(&self, url: &str, options: &RequestOptions) -> Result<String> {
        self.authed(Method::GET, url, Body::Empty, options, BodyMode::Text).await.map(Payload::into_text)
    }

    #[instrument(skip(self, body, options), fields(method = "POST"))]
    pub async fn post(&self, url: &str, body: &Value, options: &RequestOptions) -> Result<Value> {
        trace!(body = %mask_json(body), "request body");
        self.authed(Method::POST, url, Body::Json(body), options, BodyMode::Json)
            .await
            .map(Payload::into_json)
    }

    #[instrument(skip(self, body, options), fields(method = "PUT"))]
    pub async fn put(&self, url: &str, body: &Value, options: &RequestOptions) -> Result<Value> {
        trace!(body = %mask_json(body), "request body");
        self.authed(Method::PUT, url, Body::Json(body), options, BodyMode::Json)
            .await
            .map(Payload::into_json)
    }

    #[instrument(skip(self, options), fields(method = "DELETE"))]
    pub async fn delete(&self, url: &str, options: &RequestOptions) -> Result<()> {
        self.authed(Method::DELETE, url, Body::Empty, options, BodyMode::Text).await.map(|_| ())
    }

    async fn authed(
        &self,
        method: Method,
        url: &str,
        body: Body<'_>,
        options: &RequestOptions,
        mode: BodyMode,
    ) -> Result<Payload> {
        // Fail before touching the token endpoint when closed.
        self.transport.client()?;
        let token = self.token().await?;
        self.transport.execute(method, url, body, Some(&token), options, mode).await
    }
}

struct CloseGuard(Arc<Session>);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}
