//! Testing utilities and helpers
//!
//! - **[`log_capture`]**: capture `tracing` output for assertions

pub mod log_capture;

pub use log_capture::LogCapture;
