//! Session settings

use std::time::Duration;

use kelvin_common::utils::option_duration_secs;
use kelvin_common::SecureString;
use kelvin_domain::constants::{DEFAULT_CLIENT_TASKS, DEFAULT_REQUEST_ID_HEADER};
use kelvin_domain::ResourceUrls;
use serde::{Deserialize, Serialize};

/// Everything needed to open a [`Session`](super::Session)
///
/// Deserializable from the config files read by
/// [`config::load`](crate::config::load). The password deserializes from a
/// plain string and is masked whenever the config is printed or serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub host: String,
    pub username: String,
    pub password: SecureString,
    /// Overrides `https://{host}/ucsschool/kelvin`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_client_tasks")]
    pub max_client_tasks: usize,
    /// Default request timeout in seconds.
    #[serde(default, with = "option_duration_secs")]
    pub timeout: Option<Duration>,
    /// Default `Accept-Language`.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Fixed correlation id; a fresh UUID is sent per request when unset.
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,
}

fn default_max_client_tasks() -> usize {
    DEFAULT_CLIENT_TASKS
}

fn default_verify_tls() -> bool {
    true
}

fn default_request_id_header() -> String {
    DEFAULT_REQUEST_ID_HEADER.to_string()
}

impl SessionConfig {
    pub fn builder(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecureString>,
    ) -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: SessionConfig {
                host: host.into(),
                username: username.into(),
                password: password.into(),
                base_url: None,
                max_client_tasks: DEFAULT_CLIENT_TASKS,
                timeout: None,
                language: None,
                verify_tls: true,
                request_id: None,
                request_id_header: default_request_id_header(),
            },
        }
    }

    /// URL table for this installation.
    pub fn urls(&self) -> ResourceUrls {
        match &self.base_url {
            Some(base) => ResourceUrls::from_base(base.as_str()),
            None => ResourceUrls::for_host(&self.host),
        }
    }
}

/// Builder for [`SessionConfig`]
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Upper bound on concurrent requests. Values below the minimum are
    /// raised when the session is created.
    pub fn max_client_tasks(mut self, limit: usize) -> Self {
        self.config.max_client_tasks = limit;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = Some(language.into());
        self
    }

    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.config.request_id = Some(request_id.into());
        self
    }

    pub fn request_id_header(mut self, header: impl Into<String>) -> Self {
        self.config.request_id_header = header.into();
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
