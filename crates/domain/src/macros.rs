//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Several small enums (resource kinds, lifecycle operations) map one-to-one
//! onto fixed lowercase strings. This macro provides both directions from a
//! single table.
//!
//! # Example
//!
//! ```rust
//! use kelvin_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verb {
//!     Read,
//!     Write,
//! }
//!
//! impl_wire_name_conversions!(Verb {
//!     Read => "read",
//!     Write => "write",
//! });
//!
//! assert_eq!(Verb::Read.to_string(), "read");
//! assert_eq!("WRITE".parse::<Verb>().unwrap(), Verb::Write);
//! ```

/// Implements Display and FromStr for enums with fixed wire names
///
/// Parsing is case-insensitive; display always yields the table string.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(::std::format!("Invalid {}: {}", ::std::stringify!($enum_name), s)),
                }
            }
        }
    };
}
