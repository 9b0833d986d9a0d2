//! Privacy helpers: masking of secrets before they are rendered.

pub mod redaction;

pub use redaction::{is_sensitive_key, mask_json, mask_pairs, mask_value, MASK};
