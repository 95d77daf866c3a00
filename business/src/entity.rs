//! Parent entities that own editable row tables.
//!
//! An entity is fetched whole, edited in memory (including its row lists) and
//! saved whole. Row lists are `null` on the wire when the server never set
//! them; accessors treat that as empty.

use std::fmt;
use std::str::FromStr;

use console_states::Row;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::rows::{
    AccountItem, Extra, ManagedAccount, MfaItem, ProviderItem, SigninItem, SigninMethod,
    SignupItem, TableColumn,
};

/// `owner/name` pair identifying an entity on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub owner: Ustr,
    pub name: Ustr,
}

impl EntityId {
    pub fn new(owner: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            owner: Ustr::from(owner.as_ref()),
            name: Ustr::from(name.as_ref()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected an id of the form owner/name, got {0:?}")]
    EntityId(String),
    #[error("Unknown entity kind: {0}")]
    EntityKind(String),
    #[error("Unknown table: {0}")]
    TableKind(String),
    #[error("Unknown MFA method: {0}")]
    MfaType(String),
}

impl FromStr for EntityId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(ParseError::EntityId(s.to_owned())),
        }
    }
}

/// Resource families exposed by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Organization,
    Application,
    Syncer,
    User,
    Ldap,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [
        Self::Organization,
        Self::Application,
        Self::Syncer,
        Self::User,
        Self::Ldap,
    ];

    /// Resource name used in `get-{}`, `add-{}`, `update-{}`, `delete-{}`.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Application => "application",
            Self::Syncer => "syncer",
            Self::User => "user",
            Self::Ldap => "ldap",
        }
    }

    /// Resource name used by the list endpoint.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Organization => "organizations",
            Self::Application => "applications",
            Self::Syncer => "syncers",
            Self::User => "users",
            Self::Ldap => "ldaps",
        }
    }

    pub fn tables(self) -> &'static [TableKind] {
        match self {
            Self::Organization => &[TableKind::AccountItems, TableKind::MfaItems],
            Self::Application => &[
                TableKind::Providers,
                TableKind::SignupItems,
                TableKind::SigninItems,
                TableKind::SigninMethods,
            ],
            Self::Syncer => &[TableKind::TableColumns],
            Self::User => &[TableKind::ManagedAccounts],
            Self::Ldap => &[],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

impl FromStr for EntityKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.singular() == lowered || kind.plural() == lowered)
            .ok_or_else(|| ParseError::EntityKind(s.to_owned()))
    }
}

/// Row lists owned by entities, named after their JSON field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    AccountItems,
    MfaItems,
    Providers,
    SignupItems,
    SigninItems,
    SigninMethods,
    TableColumns,
    ManagedAccounts,
}

impl TableKind {
    pub const ALL: [Self; 8] = [
        Self::AccountItems,
        Self::MfaItems,
        Self::Providers,
        Self::SignupItems,
        Self::SigninItems,
        Self::SigninMethods,
        Self::TableColumns,
        Self::ManagedAccounts,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            Self::AccountItems => "accountItems",
            Self::MfaItems => "mfaItems",
            Self::Providers => "providers",
            Self::SignupItems => "signupItems",
            Self::SigninItems => "signinItems",
            Self::SigninMethods => "signinMethods",
            Self::TableColumns => "tableColumns",
            Self::ManagedAccounts => "managedAccounts",
        }
    }

    pub fn owner(self) -> EntityKind {
        match self {
            Self::AccountItems | Self::MfaItems => EntityKind::Organization,
            Self::Providers | Self::SignupItems | Self::SigninItems | Self::SigninMethods => {
                EntityKind::Application
            }
            Self::TableColumns => EntityKind::Syncer,
            Self::ManagedAccounts => EntityKind::User,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for TableKind {
    type Err = ParseError;

    /// Accepts the JSON name (`accountItems`) or a kebab/snake spelling
    /// (`account-items`, `account_items`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.field_name().to_ascii_lowercase() == folded)
            .ok_or_else(|| ParseError::TableKind(s.to_owned()))
    }
}

/// A server-side object the console can fetch, edit and save whole.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    fn owner(&self) -> &str;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);

    fn display_name(&self) -> &str {
        ""
    }

    fn created_time(&self) -> &str {
        ""
    }

    fn id(&self) -> EntityId {
        EntityId::new(self.owner(), self.name())
    }

    /// Normalises the entity right before it is sent to the server.
    fn prepare_for_save(&mut self) {}
}

/// A row type stored in exactly one table of one entity type.
pub trait TableRow: Row + Serialize + fmt::Debug {
    const TABLE: TableKind;

    fn new_row(existing: &[Self]) -> Self;

    /// A user-defined row, for tables that allow them.
    fn custom_row(_existing: &[Self]) -> Option<Self> {
        None
    }
}

/// Access to the row list of type `R` held by an entity.
pub trait HasTable<R: TableRow>: Entity {
    fn table(&self) -> Option<&[R]>;
    fn set_table(&mut self, rows: Vec<R>);

    fn table_rows(&self) -> &[R] {
        self.table().unwrap_or_default()
    }
}

macro_rules! entity_basics {
    () => {
        fn owner(&self) -> &str {
            &self.owner
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
        }

        fn display_name(&self) -> &str {
            &self.display_name
        }

        fn created_time(&self) -> &str {
            &self.created_time
        }
    };
}

macro_rules! table_row {
    (@impl $row:ty => $table:ident in $entity:ty, $field:ident, { $($extra:tt)* }) => {
        impl TableRow for $row {
            const TABLE: TableKind = TableKind::$table;

            fn new_row(existing: &[Self]) -> Self {
                <$row>::new_row(existing)
            }

            $($extra)*
        }

        impl HasTable<$row> for $entity {
            fn table(&self) -> Option<&[$row]> {
                self.$field.as_deref()
            }

            fn set_table(&mut self, rows: Vec<$row>) {
                self.$field = Some(rows);
            }
        }
    };
    ($row:ty => $table:ident in $entity:ty, $field:ident) => {
        table_row!(@impl $row => $table in $entity, $field, {});
    };
    ($row:ty => $table:ident in $entity:ty, $field:ident, custom = $custom:path) => {
        table_row!(@impl $row => $table in $entity, $field, {
            fn custom_row(existing: &[Self]) -> Option<Self> {
                Some($custom(existing))
            }
        });
    };
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub website_url: String,
    pub default_application: String,
    pub account_items: Option<Vec<AccountItem>>,
    pub mfa_items: Option<Vec<MfaItem>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entity for Organization {
    const KIND: EntityKind = EntityKind::Organization;

    entity_basics!();
}

table_row!(AccountItem => AccountItems in Organization, account_items);
table_row!(MfaItem => MfaItems in Organization, mfa_items);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub organization: String,
    pub providers: Option<Vec<ProviderItem>>,
    pub signup_items: Option<Vec<SignupItem>>,
    pub signin_items: Option<Vec<SigninItem>>,
    pub signin_methods: Option<Vec<SigninMethod>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entity for Application {
    const KIND: EntityKind = EntityKind::Application;

    entity_basics!();

    fn prepare_for_save(&mut self) {
        if let Some(methods) = self.signin_methods.as_mut() {
            let before = methods.len();
            methods.retain(SigninMethod::is_supported);
            if methods.len() != before {
                log::info!(
                    "Dropped {} unsupported sign-in method(s) from {}",
                    before - methods.len(),
                    self.name
                );
            }
        }
    }
}

table_row!(ProviderItem => Providers in Application, providers);
table_row!(SignupItem => SignupItems in Application, signup_items);
table_row!(SigninItem => SigninItems in Application, signin_items, custom = signin_custom_row);

fn signin_custom_row(existing: &[SigninItem]) -> SigninItem {
    SigninItem::custom_row(existing, chrono::Utc::now())
}
table_row!(SigninMethod => SigninMethods in Application, signin_methods);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Syncer {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    #[serde(skip)]
    display_name: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub syncer_type: String,
    pub host: String,
    pub port: i64,
    pub database: String,
    pub table: String,
    pub table_columns: Option<Vec<TableColumn>>,
    pub is_enabled: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entity for Syncer {
    const KIND: EntityKind = EntityKind::Syncer;

    entity_basics!();
}

table_row!(TableColumn => TableColumns in Syncer, table_columns);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub managed_accounts: Option<Vec<ManagedAccount>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    entity_basics!();
}

table_row!(ManagedAccount => ManagedAccounts in User, managed_accounts);
