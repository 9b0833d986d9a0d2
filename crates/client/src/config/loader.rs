//! Configuration loader
//!
//! Loads session settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Environment variables, when all required ones are set
//! 2. Otherwise a `kelvin.toml` / `kelvin.json` file found by
//!    [`probe_config_paths`]
//!
//! ## Environment Variables
//! - `KELVIN_HOST`: Kelvin host name (required)
//! - `KELVIN_USERNAME`: API user (required)
//! - `KELVIN_PASSWORD`: API password (required)
//! - `KELVIN_BASE_URL`: Full base URL, overrides the host
//! - `KELVIN_MAX_CLIENT_TASKS`: Concurrent request limit
//! - `KELVIN_TIMEOUT_SECS`: Default request timeout in seconds
//! - `KELVIN_LANGUAGE`: Default `Accept-Language`
//! - `KELVIN_VERIFY_TLS`: Verify server certificates (true/false)
//! - `KELVIN_REQUEST_ID_HEADER`: Name of the correlation id header

use std::path::{Path, PathBuf};
use std::time::Duration;

use kelvin_domain::{KelvinError, Result};

use crate::session::SessionConfig;

const FILE_NAMES: [&str; 2] = ["kelvin.toml", "kelvin.json"];

/// Load session settings, preferring the environment over files.
///
/// # Errors
/// Returns `KelvinError::Config` if neither source yields a complete,
/// valid configuration.
pub fn load() -> Result<SessionConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load session settings from `KELVIN_*` environment variables.
///
/// # Errors
/// Returns `KelvinError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<SessionConfig> {
    let host = env_var("KELVIN_HOST")?;
    let username = env_var("KELVIN_USERNAME")?;
    let password = env_var("KELVIN_PASSWORD")?;

    let mut builder = SessionConfig::builder(host, username, password);
    if let Some(base_url) = env_opt("KELVIN_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    if let Some(limit) = env_opt("KELVIN_MAX_CLIENT_TASKS") {
        let limit = limit.parse::<usize>().map_err(|e| {
            KelvinError::Config(format!("Invalid KELVIN_MAX_CLIENT_TASKS: {}", e))
        })?;
        builder = builder.max_client_tasks(limit);
    }
    if let Some(timeout) = env_opt("KELVIN_TIMEOUT_SECS") {
        let duration = timeout
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| {
                KelvinError::Config(format!("Invalid KELVIN_TIMEOUT_SECS: {timeout:?}"))
            })?;
        builder = builder.timeout(duration);
    }
    if let Some(language) = env_opt("KELVIN_LANGUAGE") {
        builder = builder.language(language);
    }
    if let Some(header) = env_opt("KELVIN_REQUEST_ID_HEADER") {
        builder = builder.request_id_header(header);
    }
    builder = builder.verify_tls(env_bool("KELVIN_VERIFY_TLS", true));

    Ok(builder.build())
}

/// Load session settings from a file.
///
/// If `path` is `None`, probes the standard locations. The format follows
/// the file extension (`.toml` or `.json`).
///
/// # Errors
/// Returns `KelvinError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<SessionConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(KelvinError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            KelvinError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| KelvinError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<SessionConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| KelvinError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| KelvinError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(KelvinError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing `kelvin.{toml,json}` in the working directory, its two
/// parents, or next to the executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        KelvinError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
