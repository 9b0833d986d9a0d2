//! Handling of credentials that must never reach log output.

pub mod secure_string;

pub use secure_string::SecureString;
