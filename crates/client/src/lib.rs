//! # Kelvin Client
//!
//! Async client for the UCS@school Kelvin REST API.
//!
//! This crate contains:
//! - The HTTP transport and its error conversions
//! - [`Session`]: connection pool, bearer token cache and concurrency limit
//! - [`Resource`]: typed get and search per entity type
//! - [`Record`]: save, reload and delete of a single object
//! - Config loading and tracing setup
//!
//! ## Architecture
//! - Entity types, wire codec and errors live in `kelvin-domain`
//! - Secret handling and log masking come from `kelvin-common`
//!
//! ```no_run
//! use kelvin_client::{config, Session};
//! use kelvin_domain::{SearchQuery, User};
//!
//! # async fn run() -> kelvin_domain::Result<()> {
//! let session = Session::connect(config::load()?)?;
//! let teachers = session
//!     .resource::<User>()
//!     .search(SearchQuery::new().filter("school", "DEMOSCHOOL").filter("roles", "teacher"))
//!     .await?;
//! for user in teachers {
//!     println!("{}", user?);
//! }
//! session.close();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod errors;
pub mod http;
pub mod record;
pub mod resource;
pub mod session;
pub mod telemetry;

pub use record::Record;
pub use resource::{Resource, SearchResults};
pub use session::{RequestOptions, Session, SessionConfig, SessionConfigBuilder};

use kelvin_domain::{Role, School, SchoolClass, Status, User, WorkGroup};

pub type Roles = Resource<Role>;
pub type Schools = Resource<School>;
pub type SchoolClasses = Resource<SchoolClass>;
pub type Users = Resource<User>;
pub type WorkGroups = Resource<WorkGroup>;
pub type ServiceStatus = Resource<Status>;
