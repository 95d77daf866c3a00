//! Command implementations for the console CLI.
//!
//! Each subcommand is implemented in its own module. Row commands are generic
//! over the entity and row types; [`with_table!`] picks the pair for a
//! [`TableKind`](console_business::TableKind) at runtime.

/// Runs `$body` with `$entity` and `$row` aliased to the entity and row types
/// behind `$table`.
macro_rules! with_table {
    ($table:expr, <$entity:ident, $row:ident> => $body:expr) => {
        match $table {
            console_business::TableKind::AccountItems => {
                type $entity = console_business::Organization;
                type $row = console_business::AccountItem;
                $body
            }
            console_business::TableKind::MfaItems => {
                type $entity = console_business::Organization;
                type $row = console_business::MfaItem;
                $body
            }
            console_business::TableKind::Providers => {
                type $entity = console_business::Application;
                type $row = console_business::ProviderItem;
                $body
            }
            console_business::TableKind::SignupItems => {
                type $entity = console_business::Application;
                type $row = console_business::SignupItem;
                $body
            }
            console_business::TableKind::SigninItems => {
                type $entity = console_business::Application;
                type $row = console_business::SigninItem;
                $body
            }
            console_business::TableKind::SigninMethods => {
                type $entity = console_business::Application;
                type $row = console_business::SigninMethod;
                $body
            }
            console_business::TableKind::TableColumns => {
                type $entity = console_business::Syncer;
                type $row = console_business::TableColumn;
                $body
            }
            console_business::TableKind::ManagedAccounts => {
                type $entity = console_business::User;
                type $row = console_business::ManagedAccount;
                $body
            }
        }
    };
}

pub mod completions;
pub mod config;
pub mod ldap;
pub mod list;
pub mod mfa_setup;
pub mod options;
pub mod rows;
pub mod show;

use anyhow::{Result, bail};
use console_states::Row;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::TableTarget;

pub use completions::generate_completions;
pub use config::run_config;
pub use ldap::run_ldap;
pub use list::run_list;
pub use mfa_setup::{run_mfa_disable, run_mfa_preferred, run_mfa_setup};
pub use options::run_options;
pub use rows::{RowEdit, run_row_edit};
pub use show::run_show;

const CELL_WIDTH: usize = 32;

/// Rejects a table that the named entity kind does not own.
pub fn check_target(target: &TableTarget) -> Result<()> {
    let owner = target.table.owner();
    if target.kind.tables().is_empty() {
        bail!("{} has no row tables; see `iam-console {} --help`", target.kind, target.kind);
    }
    if owner != target.kind {
        bail!(
            "{} is a table of {owner}, not {}; try one of: {}",
            target.table,
            target.kind,
            target
                .kind
                .tables()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

/// Renders rows with an index column and one column per field.
pub fn rows_table<R: Row>(rows: &[R]) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["#".to_owned()];
    header.extend(R::fields().iter().map(|(key, _)| (*key).to_owned()));
    builder.push_record(header);

    for (index, row) in rows.iter().enumerate() {
        let mut record = vec![index.to_string()];
        record.extend(R::fields().iter().map(|(key, _)| {
            row.get_field(key)
                .map(|value| truncate_str(&value.to_string(), CELL_WIDTH))
                .unwrap_or_default()
        }));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
