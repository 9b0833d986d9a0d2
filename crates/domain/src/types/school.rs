use serde::{Deserialize, Serialize};

use super::UdmProperties;
use crate::entity::{Entity, EntitySpec, Identity, Operations};
use crate::urls::ResourceKind;

/// School (organizational unit)
///
/// The server supports creating schools but neither modifying nor deleting
/// them. Unset server lists are omitted from requests; the server rejects
/// `null` but accepts an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct School {
    pub name: String,
    pub display_name: Option<String>,
    pub educational_servers: Option<Vec<String>>,
    pub administrative_servers: Option<Vec<String>>,
    pub class_share_file_server: Option<String>,
    pub home_share_file_server: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ucsschool_roles: Vec<String>,
    #[serde(skip_serializing_if = "UdmProperties::is_empty")]
    pub udm_properties: UdmProperties,
}

impl School {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

impl Entity for School {
    const SPEC: EntitySpec = EntitySpec {
        display_name: "School",
        resource: ResourceKind::School,
        identity: &["name"],
        relations: &[],
        required_search: &[],
        exact_search: &[],
        operations: Operations::CREATE_ONLY,
    };

    fn identity(&self) -> Identity {
        Identity::name(&self.name)
    }
}
