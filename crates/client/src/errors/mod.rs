//! Error conversions for the transport layer

mod conversions;

pub use conversions::TransportError;
