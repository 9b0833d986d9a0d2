//! Client-wide constants

/// Version of this client library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Kelvin API version segment used in collection URLs.
pub const API_VERSION: &str = "v1";

/// Path of the Kelvin application below the host.
pub const BASE_PATH: &str = "/ucsschool/kelvin";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("kelvin-client/", env!("CARGO_PKG_VERSION"));

// Session defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MIN_CLIENT_TASKS: usize = 4;
pub const DEFAULT_CLIENT_TASKS: usize = 10;
pub const DEFAULT_REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Wildcard accepted by the server in search filters.
pub const SEARCH_WILDCARD: char = '*';
