//! User accounts and their password hashes

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use kelvin_common::utils::{option_date_ymd, option_secret_exposed};
use kelvin_common::{SecureString, MASK};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::UdmProperties;
use crate::entity::{Entity, EntitySpec, Identity, Operations, Relation};
use crate::errors::{KelvinError, Result};
use crate::urls::ResourceKind;

/// Password hashes of an account as stored in the directory
///
/// Used to migrate accounts without knowing their clear text password.
/// `Debug` masks every hash.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordsHashes {
    pub user_password: Vec<String>,
    pub samba_nt_password: String,
    /// Base64 encoded Kerberos keys.
    pub krb_5_key: Vec<String>,
    pub krb5_key_version_number: i64,
    pub samba_pwd_last_set: i64,
}

impl PasswordsHashes {
    /// Same values keyed by the LDAP attribute names used in the directory.
    pub fn as_ldap_attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert("userPassword".into(), Value::from(self.user_password.clone()));
        attrs.insert("sambaNTPassword".into(), Value::from(self.samba_nt_password.clone()));
        attrs.insert("krb5Key".into(), Value::from(self.krb_5_key.clone()));
        attrs.insert("krb5KeyVersionNumber".into(), Value::from(self.krb5_key_version_number));
        attrs.insert("sambaPwdLastSet".into(), Value::from(self.samba_pwd_last_set));
        attrs
    }

    /// Kerberos keys decoded to raw bytes.
    pub fn krb_5_key_as_bytes(&self) -> Result<Vec<Vec<u8>>> {
        self.krb_5_key
            .iter()
            .map(|key| {
                STANDARD
                    .decode(key)
                    .map_err(|err| KelvinError::Decode(format!("invalid krb5Key entry: {err}")))
            })
            .collect()
    }

    pub fn set_krb_5_key_from_bytes<K: AsRef<[u8]>>(&mut self, keys: &[K]) {
        self.krb_5_key = keys.iter().map(|key| STANDARD.encode(key)).collect();
    }
}

impl fmt::Debug for PasswordsHashes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordsHashes")
            .field("user_password", &MASK)
            .field("samba_nt_password", &MASK)
            .field("krb_5_key", &MASK)
            .field("krb5_key_version_number", &self.krb5_key_version_number)
            .field("samba_pwd_last_set", &self.samba_pwd_last_set)
            .finish()
    }
}

/// User account
///
/// `school` is the primary school; `schools` lists every school the user
/// belongs to. `school_classes` and `workgroups` map school names to group
/// names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub school: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[serde(with = "option_date_ymd")]
    pub birthday: Option<NaiveDate>,
    pub disabled: bool,
    pub email: Option<String>,
    #[serde(with = "option_date_ymd")]
    pub expiration_date: Option<NaiveDate>,
    /// Only sent, never returned by the server.
    #[serde(with = "option_secret_exposed")]
    pub password: Option<SecureString>,
    pub record_uid: Option<String>,
    pub source_uid: Option<String>,
    pub roles: Vec<String>,
    pub schools: Vec<String>,
    pub school_classes: BTreeMap<String, Vec<String>>,
    pub workgroups: BTreeMap<String, Vec<String>>,
    pub kelvin_password_hashes: Option<PasswordsHashes>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ucsschool_roles: Vec<String>,
    #[serde(skip_serializing_if = "UdmProperties::is_empty")]
    pub udm_properties: UdmProperties,
}

impl User {
    pub fn new(name: impl Into<String>, school: impl Into<String>) -> Self {
        let school = school.into();
        Self { name: name.into(), schools: vec![school.clone()], school, ..Self::default() }
    }
}

impl Entity for User {
    const SPEC: EntitySpec = EntitySpec {
        display_name: "User",
        resource: ResourceKind::User,
        identity: &["name"],
        relations: &[
            Relation::one("school", ResourceKind::School),
            Relation::many("schools", ResourceKind::School),
            Relation::many("roles", ResourceKind::Role),
        ],
        required_search: &[],
        exact_search: &["school"],
        operations: Operations::ALL,
    };

    fn identity(&self) -> Identity {
        Identity::name(&self.name)
    }

    fn check_response(raw: &Value) {
        if raw.get("expiration_date").is_none() {
            let user = raw.get("name").and_then(serde_json::Value::as_str).unwrap_or_default();
            warn!(
                user,
                "User response lacks 'expiration_date'; server version probably < 1.5.1"
            );
        }
    }
}
