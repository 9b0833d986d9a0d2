//! Kelvin entity types
//!
//! One plain data struct per object kind. Relation fields hold bare object
//! names; see [`crate::codec`] for their wire form.

pub mod role;
pub mod school;
pub mod school_class;
pub mod status;
pub mod user;
pub mod workgroup;

pub use role::Role;
pub use school::School;
pub use school_class::SchoolClass;
pub use status::Status;
pub use user::{PasswordsHashes, User};
pub use workgroup::WorkGroup;

/// Free-form UDM properties passed through unchanged.
pub type UdmProperties = std::collections::BTreeMap<String, serde_json::Value>;
