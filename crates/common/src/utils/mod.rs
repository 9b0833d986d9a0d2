//! Common utility functions
//!
//! - **[`serde`]**: Serialization helpers for common data types

pub mod serde;

pub use self::serde::{option_date_ymd, option_duration_secs, option_secret_exposed};
