//! Resource URL table
//!
//! Every Kelvin resource lives below `{base}/v1/`. Collections end with a
//! slash so that object URLs are formed by plain concatenation; the status
//! endpoint is a singleton without one.

use serde::{Deserialize, Serialize};

use crate::constants::{API_VERSION, BASE_PATH};
use crate::errors::{KelvinError, Result};
use crate::impl_wire_name_conversions;

/// Kind of Kelvin resource, named after its collection path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Role,
    School,
    SchoolClass,
    User,
    WorkGroup,
    Status,
}

impl_wire_name_conversions!(ResourceKind {
    Role => "roles",
    School => "schools",
    SchoolClass => "classes",
    User => "users",
    WorkGroup => "workgroups",
    Status => "status",
});

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        Self::Role,
        Self::School,
        Self::SchoolClass,
        Self::User,
        Self::WorkGroup,
        Self::Status,
    ];

    /// Whether objects of this kind live in a collection (everything but the
    /// status singleton).
    pub const fn is_collection(&self) -> bool {
        !matches!(self, Self::Status)
    }
}

/// Base URL of one Kelvin installation plus the derived endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUrls {
    base: String,
}

impl ResourceUrls {
    /// URLs for the standard deployment `https://{host}/ucsschool/kelvin`.
    pub fn for_host(host: &str) -> Self {
        Self::from_base(format!("https://{host}{BASE_PATH}"))
    }

    /// URLs below an explicit base (reverse proxies, test servers).
    pub fn from_base(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Token exchange endpoint.
    pub fn token(&self) -> String {
        format!("{}/token", self.base)
    }

    /// Collection URL of `kind`, or the singleton URL for [`ResourceKind::Status`].
    pub fn collection(&self, kind: ResourceKind) -> String {
        if kind.is_collection() {
            format!("{}/{API_VERSION}/{kind}/", self.base)
        } else {
            format!("{}/{API_VERSION}/{kind}", self.base)
        }
    }

    /// Object URL built from identity values in path order.
    ///
    /// Values are percent-encoded individually and joined with `/`.
    pub fn object<S: AsRef<str>>(&self, kind: ResourceKind, path: &[S]) -> String {
        let mut url = self.collection(kind);
        if !kind.is_collection() {
            return url;
        }
        let segments: Vec<String> =
            path.iter().map(|value| urlencoding::encode(value.as_ref()).into_owned()).collect();
        url.push_str(&segments.join("/"));
        url
    }

    /// Wire form of a relation: the URL of the named object of `kind`.
    pub fn relation_url(&self, kind: ResourceKind, name: &str) -> String {
        self.object(kind, &[name])
    }
}

/// Name of the object a relation URL points at.
///
/// Takes the last path segment, drops any query string and percent-decodes
/// the result. This reverses [`ResourceUrls::relation_url`].
pub fn name_from_url(url: &str) -> Result<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        return Err(KelvinError::Decode(format!("no object name in URL {url:?}")));
    }
    urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .map_err(|err| KelvinError::Decode(format!("invalid percent-encoding in {url:?}: {err}")))
}
