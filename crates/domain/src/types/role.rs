use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntitySpec, Identity, Operations};
use crate::urls::ResourceKind;

/// Role tag such as `student` or `teacher`
///
/// Roles are read only and carry neither a `dn` nor `ucsschool_roles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub name: String,
    pub display_name: Option<String>,
}

impl Entity for Role {
    const SPEC: EntitySpec = EntitySpec {
        display_name: "Role",
        resource: ResourceKind::Role,
        identity: &["name"],
        relations: &[],
        required_search: &[],
        exact_search: &[],
        operations: Operations::READ_ONLY,
    };

    fn identity(&self) -> Identity {
        Identity::name(&self.name)
    }
}
