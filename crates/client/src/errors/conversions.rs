//! Conversions from transport errors into the client error type.

use kelvin_domain::KelvinError;
use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the transport side and can be
/// converted back into [`KelvinError`].
#[derive(Debug)]
pub struct TransportError(pub KelvinError);

impl From<TransportError> for KelvinError {
    fn from(value: TransportError) -> Self {
        value.0
    }
}

impl From<KelvinError> for TransportError {
    fn from(value: KelvinError) -> Self {
        TransportError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoKelvinError {
    fn into_kelvin(self) -> KelvinError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → KelvinError */
/* -------------------------------------------------------------------------- */

impl IntoKelvinError for HttpError {
    fn into_kelvin(self) -> KelvinError {
        let url = self.url().map(ToString::to_string);
        let target = url.as_deref().map(|url| format!(" ({url})")).unwrap_or_default();

        if self.is_timeout() {
            return KelvinError::Network(format!("HTTP request timed out{target}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return KelvinError::Network(format!("HTTP connection failure{target}"));
        }

        if self.is_builder() {
            return KelvinError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return KelvinError::Decode(format!("invalid response body{target}: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let reason = status.canonical_reason().map(str::to_string);
            let message = format!("HTTP {code} {}{target}", reason.as_deref().unwrap_or("unknown status"));
            return match code {
                404 => KelvinError::NoObject { message, reason, status: Some(code), url },
                400..=499 => KelvinError::InvalidRequest { message, reason, status: Some(code), url },
                _ => KelvinError::ServerError { message, reason, status: Some(code), url },
            };
        }

        KelvinError::Network(self.to_string())
    }
}

impl From<HttpError> for TransportError {
    fn from(value: HttpError) -> Self {
        TransportError(value.into_kelvin())
    }
}

/* -------------------------------------------------------------------------- */
/* header construction → KelvinError */
/* -------------------------------------------------------------------------- */

impl From<InvalidHeaderValue> for TransportError {
    fn from(value: InvalidHeaderValue) -> Self {
        TransportError(KelvinError::Config(format!("invalid header value: {value}")))
    }
}

impl From<InvalidHeaderName> for TransportError {
    fn from(value: InvalidHeaderName) -> Self {
        TransportError(KelvinError::Config(format!("invalid header name: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
