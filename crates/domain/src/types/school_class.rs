use serde::{Deserialize, Serialize};

use super::UdmProperties;
use crate::entity::{Entity, EntitySpec, Identity, Operations, Relation};
use crate::urls::ResourceKind;

/// School class, addressed by school and name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolClass {
    pub name: String,
    pub school: String,
    pub description: Option<String>,
    /// Member user names.
    pub users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ucsschool_roles: Vec<String>,
    #[serde(skip_serializing_if = "UdmProperties::is_empty")]
    pub udm_properties: UdmProperties,
}

impl SchoolClass {
    pub fn new(school: impl Into<String>, name: impl Into<String>) -> Self {
        Self { school: school.into(), name: name.into(), ..Self::default() }
    }
}

impl Entity for SchoolClass {
    const SPEC: EntitySpec = EntitySpec {
        display_name: "School class",
        resource: ResourceKind::SchoolClass,
        identity: &["school", "name"],
        relations: &[
            Relation::one("school", ResourceKind::School),
            Relation::many("users", ResourceKind::User),
        ],
        required_search: &["school"],
        exact_search: &["school"],
        operations: Operations::ALL,
    };

    fn identity(&self) -> Identity {
        Identity::school_name(&self.school, &self.name)
    }
}
