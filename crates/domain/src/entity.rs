//! Entity type plugins
//!
//! Each Kelvin object type is a plain serde struct plus a static
//! [`EntitySpec`] describing how the generic resource and record machinery
//! must treat it: where it lives, which fields address it, which fields are
//! relations to other objects, how it may be searched and which lifecycle
//! operations the server supports for it.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::constants::SEARCH_WILDCARD;
use crate::errors::{KelvinError, Result};
use crate::impl_wire_name_conversions;
use crate::urls::ResourceKind;

/// Lifecycle or query operation that an entity type may forbid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// POST to the collection.
    Create,
    /// PUT to the object URL.
    Modify,
    /// DELETE of the object URL.
    Delete,
    /// GET on the collection with filters.
    Search,
}

impl_wire_name_conversions!(Operation {
    Create => "create",
    Modify => "modify",
    Delete => "delete",
    Search => "search",
});

/// Operations the server implements for an entity type
///
/// Reading (`get`, `reload`) is always possible and therefore not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operations {
    /// New objects may be created.
    pub create: bool,
    /// Existing objects may be changed.
    pub modify: bool,
    /// Existing objects may be removed.
    pub delete: bool,
    /// The collection may be searched.
    pub search: bool,
}

impl Operations {
    /// Full lifecycle.
    pub const ALL: Self = Self { create: true, modify: true, delete: true, search: true };
    /// Get and search only.
    pub const READ_ONLY: Self = Self { create: false, modify: false, delete: false, search: true };
    /// Objects can be created but never changed or removed.
    pub const CREATE_ONLY: Self = Self { create: true, modify: false, delete: false, search: true };
    /// Get only.
    pub const NONE: Self = Self { create: false, modify: false, delete: false, search: false };

    pub const fn allows(&self, operation: Operation) -> bool {
        match operation {
            Operation::Create => self.create,
            Operation::Modify => self.modify,
            Operation::Delete => self.delete,
            Operation::Search => self.search,
        }
    }
}

/// Field holding name(s) of other objects that travel as URLs on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Entity field name.
    pub field: &'static str,
    /// Resource the names refer to.
    pub target: ResourceKind,
    /// List of names rather than a single name.
    pub many: bool,
}

impl Relation {
    pub const fn one(field: &'static str, target: ResourceKind) -> Self {
        Self { field, target, many: false }
    }

    pub const fn many(field: &'static str, target: ResourceKind) -> Self {
        Self { field, target, many: true }
    }
}

/// Static description of an entity type
#[derive(Debug, Clone, Copy)]
pub struct EntitySpec {
    /// Human readable type name used in messages.
    pub display_name: &'static str,
    pub resource: ResourceKind,
    /// Identity fields in URL path order.
    pub identity: &'static [&'static str],
    pub relations: &'static [Relation],
    /// Filters every search must carry.
    pub required_search: &'static [&'static str],
    /// Filters that must not contain a wildcard when given.
    pub exact_search: &'static [&'static str],
    pub operations: Operations,
}

impl EntitySpec {
    /// Fail with [`KelvinError::Unsupported`] unless `operation` is allowed.
    pub fn ensure(&self, operation: Operation) -> Result<()> {
        if self.operations.allows(operation) {
            Ok(())
        } else {
            Err(KelvinError::Unsupported { entity: self.display_name, operation })
        }
    }

    pub fn relation(&self, field: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.field == field)
    }

    /// Check that `identity` carries exactly the identity fields of this type
    /// and return their values in path order.
    pub fn identity_path<'a>(&self, identity: &'a Identity) -> Result<Vec<&'a str>> {
        let missing: Vec<&str> =
            self.identity.iter().copied().filter(|field| identity.get(field).is_none()).collect();
        let unknown: Vec<&str> = identity
            .fields()
            .filter(|field| !self.identity.iter().any(|known| known == field))
            .collect();
        if !missing.is_empty() || !unknown.is_empty() {
            return Err(KelvinError::Assertion(format!(
                "{} lookup requires argument(s): {}.",
                self.display_name,
                self.identity.join(", ")
            )));
        }
        Ok(self.identity.iter().filter_map(|field| identity.get(field)).collect())
    }

    /// Validate a search and return the query parameters to send.
    ///
    /// Filters equal to `""` or `"*"` match everything and are dropped.
    pub fn search_params(&self, query: &SearchQuery) -> Result<Vec<(String, String)>> {
        self.ensure(Operation::Search)?;
        let missing: Vec<&str> = self
            .required_search
            .iter()
            .copied()
            .filter(|field| query.get(field).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(KelvinError::invalid_request(format!(
                "{} search requires argument(s): {}.",
                self.display_name,
                self.required_search.join(", ")
            )));
        }
        for field in self.exact_search {
            if query.get(field).is_some_and(|value| value.contains(SEARCH_WILDCARD)) {
                return Err(KelvinError::invalid_request(format!(
                    "Argument '{field}' for searching {} objects must be exact.",
                    self.display_name
                )));
            }
        }
        Ok(query
            .filters
            .iter()
            .filter(|(_, value)| !matches!(value.as_str(), "" | "*"))
            .cloned()
            .collect())
    }
}

/// Values of the identity fields that address one object
///
/// ```rust
/// use kelvin_domain::Identity;
///
/// let id = Identity::new().with("school", "DEMO").with("name", "1a");
/// assert_eq!(id.get("school"), Some("DEMO"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    values: Vec<(String, String)>,
}

impl Identity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of an object addressed by name alone.
    pub fn name(name: impl Into<String>) -> Self {
        Self::new().with("name", name)
    }

    /// Identity of a school-scoped group.
    pub fn school_name(school: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new().with("school", school).with("name", name)
    }

    /// Set `field`, replacing an earlier value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(key, _)| *key == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.iter().find(|(key, _)| key == field).map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether any field is set to the empty string.
    pub fn has_empty_value(&self) -> bool {
        self.values.iter().any(|(_, value)| value.is_empty())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> =
            self.values.iter().map(|(key, value)| format!("{key}='{value}'")).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Search filters in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    filters: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; booleans and numbers are sent in their text form.
    pub fn filter(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        let field = field.into();
        let value = value.to_string();
        match self.filters.iter_mut().find(|(key, _)| *key == field) {
            Some(slot) => slot.1 = value,
            None => self.filters.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.filters.iter().find(|(key, _)| key == field).map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Kelvin object type handled by the generic resource and record code
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    const SPEC: EntitySpec;

    /// Current values of the identity fields.
    fn identity(&self) -> Identity;

    /// Inspect a raw response object before it is decoded.
    ///
    /// Used to flag responses from older server versions.
    fn check_response(_raw: &Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP: EntitySpec = EntitySpec {
        display_name: "Group",
        resource: ResourceKind::WorkGroup,
        identity: &["school", "name"],
        relations: &[Relation::many("users", ResourceKind::User)],
        required_search: &["school"],
        exact_search: &["school"],
        operations: Operations::ALL,
    };

    #[test]
    fn identity_path_follows_spec_order() {
        let id = Identity::new().with("name", "1a").with("school", "DEMO");
        assert_eq!(GROUP.identity_path(&id).unwrap(), vec!["DEMO", "1a"]);
    }

    #[test]
    fn identity_path_rejects_missing_and_unknown_fields() {
        let err = GROUP.identity_path(&Identity::name("1a")).unwrap_err();
        assert!(matches!(err, KelvinError::Assertion(ref msg) if msg.contains("school, name")));

        let id = Identity::school_name("DEMO", "1a").with("dn", "cn=1a");
        assert!(matches!(GROUP.identity_path(&id), Err(KelvinError::Assertion(_))));
    }

    #[test]
    fn search_requires_mandatory_filters() {
        let err = GROUP.search_params(&SearchQuery::new().filter("name", "1a")).unwrap_err();
        assert!(matches!(err, KelvinError::InvalidRequest { status: None, .. }));
    }

    #[test]
    fn search_rejects_wildcards_in_exact_fields() {
        let err = GROUP.search_params(&SearchQuery::new().filter("school", "AB*")).unwrap_err();
        assert!(err.to_string().contains("must be exact"));
    }

    #[test]
    fn search_drops_match_all_filters() {
        let query = SearchQuery::new()
            .filter("school", "DEMO")
            .filter("name", "*")
            .filter("description", "")
            .filter("disabled", false);
        let params = GROUP.search_params(&query).unwrap();
        assert_eq!(
            params,
            vec![("school".to_string(), "DEMO".to_string()), ("disabled".into(), "false".into())]
        );
    }

    #[test]
    fn forbidden_operations_are_reported() {
        let spec = EntitySpec { operations: Operations::READ_ONLY, ..GROUP };
        assert!(spec.ensure(Operation::Search).is_ok());
        let err = spec.ensure(Operation::Create).unwrap_err();
        assert!(matches!(err, KelvinError::Unsupported { operation: Operation::Create, .. }));
    }

    #[test]
    fn operation_names_parse_case_insensitively() {
        assert_eq!("SEARCH".parse::<Operation>().unwrap(), Operation::Search);
        assert_eq!("modify".parse::<Operation>().unwrap(), Operation::Modify);
        assert_eq!(Operation::Delete.to_string(), "delete");
        let err = "rename".parse::<Operation>().unwrap_err();
        assert_eq!(err, "Invalid Operation: rename");
    }

    #[test]
    fn identity_display_lists_fields() {
        let id = Identity::school_name("DEMO", "1a");
        assert_eq!(id.to_string(), "school='DEMO', name='1a'");
    }
}
