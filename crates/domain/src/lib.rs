//! # Kelvin Domain
//!
//! Domain types for the UCS@school Kelvin REST API client.
//!
//! This crate contains:
//! - The error taxonomy and `Result` alias
//! - Client constants and the resource URL table
//! - Bearer token decoding
//! - The [`Entity`] trait and the per-type entity structs
//! - The wire codec translating entities to and from Kelvin JSON
//!
//! ## Architecture
//! - No networking; the `kelvin-client` crate drives requests
//! - Entity behavior is data ([`EntitySpec`]), not per-type code

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod codec;
pub mod constants;
pub mod entity;
pub mod errors;
pub mod macros;
pub mod token;
pub mod types;
pub mod urls;

// Re-export commonly used items
pub use entity::{Entity, EntitySpec, Identity, Operation, Operations, Relation, SearchQuery};
pub use errors::*;
pub use token::Token;
pub use types::*;
pub use urls::{ResourceKind, ResourceUrls};
