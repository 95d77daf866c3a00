//! Domain layer for the identity console.
//!
//! Typed rows and the entities that own them, the admin REST client, edit
//! sessions that tie row tables to an entity, the MFA setup flow and LDAP
//! user import.

pub mod api;
pub mod config;
pub mod editor;
pub mod entity;
pub mod http;
pub mod ldap;
pub mod mfa;
pub mod rows;

pub use api::{ApiClient, ApiEnvelope, ApiError, ApiResult, MutationOutcome};
pub use config::{ConfigError, ConsoleConfig, RawConfig};
pub use editor::{EditorError, EntityEditor};
pub use entity::{
    Application, Entity, EntityId, EntityKind, HasTable, Organization, ParseError, Syncer,
    TableKind, TableRow, User,
};
pub use ldap::{Ldap, LdapSyncResult, LdapUser, LdapUsers};
pub use mfa::{MfaError, MfaProps, MfaSetup, MfaStep, MfaType};
pub use rows::{
    AccountItem, Extra, ManagedAccount, MfaItem, ProviderItem, SigninItem, SigninMethod,
    SignupItem, TableColumn,
};
