//! LDAP servers configured under an organization, and importing their users.
//!
//! An LDAP server is an ordinary entity for list/get/update, keyed by its
//! `id` rather than a `name`. Importing is two calls: fetch the directory's
//! users (with the uuids already present locally), then post the chosen ones
//! back to be created.

use console_states::row_fields;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::{ApiClient, ApiResult};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::rows::Extra;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ldap {
    pub id: String,
    pub owner: String,
    pub created_time: String,
    pub server_name: String,
    pub host: String,
    pub port: i64,
    pub enable_ssl: bool,
    pub allow_self_signed_cert: bool,
    pub username: String,
    pub password: String,
    pub base_dn: String,
    pub filter: String,
    #[serde(deserialize_with = "null_as_default")]
    pub filter_fields: Vec<String>,
    pub default_group: String,
    /// Minutes between automatic syncs; 0 turns it off.
    pub auto_sync: i64,
    pub last_sync: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(Ldap, key = id, {
    "serverName" => server_name: Str,
    "host" => host: Str,
    "port" => port: Int,
    "enableSsl" => enable_ssl: Bool,
    "allowSelfSignedCert" => allow_self_signed_cert: Bool,
    "username" => username: Str,
    "password" => password: Str,
    "baseDn" => base_dn: Str,
    "filter" => filter: Str,
    "filterFields" => filter_fields: List,
    "defaultGroup" => default_group: Str,
    "autoSync" => auto_sync: Int,
});

impl Ldap {
    pub const DEFAULT_PORT: i64 = 389;
    pub const DEFAULT_SSL_PORT: i64 = 636;

    /// `host:port`, with `ldaps://` when SSL is on.
    pub fn address(&self) -> String {
        let scheme = if self.enable_ssl { "ldaps" } else { "ldap" };
        let port = match self.port {
            0 if self.enable_ssl => Self::DEFAULT_SSL_PORT,
            0 => Self::DEFAULT_PORT,
            port => port,
        };
        format!("{scheme}://{}:{port}", self.host)
    }

    pub fn auto_sync_enabled(&self) -> bool {
        self.auto_sync > 0
    }
}

impl Entity for Ldap {
    const KIND: EntityKind = EntityKind::Ldap;

    fn owner(&self) -> &str {
        &self.owner
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn set_name(&mut self, name: String) {
        self.id = name;
    }

    fn display_name(&self) -> &str {
        &self.server_name
    }

    fn created_time(&self) -> &str {
        &self.created_time
    }
}

/// One directory entry as the server reports it.
///
/// Unknown attributes are carried through so a sync posts back exactly what
/// was fetched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LdapUser {
    pub uuid: String,
    pub uid: String,
    pub cn: String,
    pub display_name: String,
    pub email: String,
    pub mobile: String,
    pub group_id: String,
    pub address: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl LdapUser {
    /// The best human label: display name, then cn, then uid.
    pub fn label(&self) -> &str {
        [&self.display_name, &self.cn, &self.uid]
            .into_iter()
            .find(|value| !value.is_empty())
            .map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LdapUsers {
    #[serde(deserialize_with = "null_as_default")]
    pub users: Vec<LdapUser>,
    #[serde(deserialize_with = "null_as_default")]
    pub exist_uuids: Vec<String>,
}

impl LdapUsers {
    pub fn is_imported(&self, user: &LdapUser) -> bool {
        self.exist_uuids.iter().any(|uuid| *uuid == user.uuid)
    }

    /// Users not yet present in the organization, in directory order.
    pub fn pending(&self) -> Vec<&LdapUser> {
        self.users
            .iter()
            .filter(|user| !self.is_imported(user))
            .collect()
    }
}

/// Users the server skipped because they exist, and those it failed to add.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LdapSyncResult {
    #[serde(deserialize_with = "null_as_default")]
    pub exist: Vec<LdapUser>,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: Vec<LdapUser>,
}

impl LdapSyncResult {
    pub fn is_clean(&self) -> bool {
        self.exist.is_empty() && self.failed.is_empty()
    }
}

/// GET `/api/get-ldap-users?id=owner/id`
pub async fn get_ldap_users(client: &ApiClient, id: &EntityId) -> ApiResult<LdapUsers> {
    let id = id.to_string();
    client
        .get::<LdapUsers, Value>("get-ldap-users", &[("id", id.as_str())])
        .await?
        .into_result()
}

/// POST `/api/sync-ldap-users?owner=&ldapId=` with the users to import.
pub async fn sync_ldap_users(
    client: &ApiClient,
    id: &EntityId,
    users: &[LdapUser],
) -> ApiResult<LdapSyncResult> {
    log::info!("Syncing {} user(s) from LDAP server {id}", users.len());
    client
        .post_json::<_, LdapSyncResult, Value>(
            "sync-ldap-users",
            &[("owner", id.owner.as_str()), ("ldapId", id.name.as_str())],
            users,
        )
        .await?
        .into_result()
}

#[cfg(test)]
mod tests {
    use console_states::{FieldValue, Row};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ldap_keyed_by_id() {
        let ldap: Ldap = serde_json::from_value(json!({
            "id": "ldap-1",
            "owner": "acme",
            "serverName": "Corp directory",
            "host": "ldap.acme.test",
            "port": 389,
            "baseDn": "ou=People,dc=acme,dc=test",
            "filterFields": null,
            "autoSync": 30,
            "customAttributes": {"title": "title"},
        }))
        .unwrap();

        assert_eq!(ldap.id().to_string(), "acme/ldap-1");
        assert_eq!(ldap.display_name(), "Corp directory");
        assert!(ldap.filter_fields.is_empty());
        assert!(ldap.auto_sync_enabled());

        let back = serde_json::to_value(&ldap).unwrap();
        assert_eq!(back["customAttributes"]["title"], "title");
        assert_eq!(back["baseDn"], "ou=People,dc=acme,dc=test");
    }

    #[test]
    fn test_ldap_address_defaults_port() {
        let mut ldap = Ldap {
            host: "ldap.acme.test".to_owned(),
            ..Ldap::default()
        };
        assert_eq!(ldap.address(), "ldap://ldap.acme.test:389");
        ldap.enable_ssl = true;
        assert_eq!(ldap.address(), "ldaps://ldap.acme.test:636");
        ldap.port = 10636;
        assert_eq!(ldap.address(), "ldaps://ldap.acme.test:10636");
    }

    #[test]
    fn test_ldap_fields_are_typed() {
        let mut ldap = Ldap::default();
        let value = Ldap::parse_field("autoSync", "15").unwrap();
        ldap.set_field("autoSync", value).unwrap();
        assert_eq!(ldap.auto_sync, 15);

        ldap.set_field("filterFields", Ldap::parse_field("filterFields", "uid, mail").unwrap())
            .unwrap();
        assert_eq!(ldap.filter_fields, ["uid", "mail"]);

        assert!(Ldap::parse_field("port", "many").is_err());
        assert!(ldap.set_field("id", FieldValue::from("other")).is_err());
    }

    #[test]
    fn test_pending_users_skip_imported() {
        let users: LdapUsers = serde_json::from_value(json!({
            "users": [
                {"uuid": "u1", "uid": "alice", "cn": "Alice"},
                {"uuid": "u2", "uid": "bob", "displayName": "Bob B"},
                {"uuid": "u3", "uid": "carol"},
            ],
            "existUuids": ["u2"],
        }))
        .unwrap();

        let pending: Vec<&str> = users.pending().iter().map(|user| user.label()).collect();
        assert_eq!(pending, ["Alice", "carol"]);
        assert!(users.is_imported(&users.users[1]));
    }

    #[test]
    fn test_sync_result_with_nulls_is_clean() {
        let result: LdapSyncResult =
            serde_json::from_value(json!({"exist": null, "failed": null})).unwrap();
        assert!(result.is_clean());
    }
}
