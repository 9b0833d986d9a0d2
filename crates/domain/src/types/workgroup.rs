use serde::{Deserialize, Serialize};

use super::UdmProperties;
use crate::entity::{Entity, EntitySpec, Identity, Operations, Relation};
use crate::urls::ResourceKind;

/// Workgroup, addressed by school and name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkGroup {
    pub name: String,
    pub school: String,
    pub description: Option<String>,
    /// Member user names.
    pub users: Vec<String>,
    pub email: Option<String>,
    pub allowed_email_senders_users: Vec<String>,
    pub allowed_email_senders_groups: Vec<String>,
    pub create_share: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ucsschool_roles: Vec<String>,
    #[serde(skip_serializing_if = "UdmProperties::is_empty")]
    pub udm_properties: UdmProperties,
}

impl Default for WorkGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            school: String::new(),
            description: None,
            users: Vec::new(),
            email: None,
            allowed_email_senders_users: Vec::new(),
            allowed_email_senders_groups: Vec::new(),
            create_share: true,
            ucsschool_roles: Vec::new(),
            udm_properties: UdmProperties::new(),
        }
    }
}

impl WorkGroup {
    pub fn new(school: impl Into<String>, name: impl Into<String>) -> Self {
        Self { school: school.into(), name: name.into(), ..Self::default() }
    }
}

impl Entity for WorkGroup {
    const SPEC: EntitySpec = EntitySpec {
        display_name: "Workgroup",
        resource: ResourceKind::WorkGroup,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_is_created_unless_told_otherwise() {
        assert!(WorkGroup::new("DEMO", "chess").create_share);
        let decoded: WorkGroup =
            serde_json::from_value(serde_json::json!({"name": "chess", "school": "DEMO"})).unwrap();
        assert!(decoded.create_share);
    }
}
