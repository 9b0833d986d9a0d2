use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntitySpec, Identity, Operations};
use crate::urls::ResourceKind;

/// Health information of the Kelvin service
///
/// A singleton: it has no identity fields and can only be fetched or
/// reloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub internal_errors_last_minute: u64,
    pub version: String,
}

impl Entity for Status {
    const SPEC: EntitySpec = EntitySpec {
        display_name: "Status",
        resource: ResourceKind::Status,
        identity: &[],
        relations: &[],
        required_search: &[],
        exact_search: &[],
        operations: Operations::NONE,
    };

    fn identity(&self) -> Identity {
        Identity::new()
    }
}
