//! List entities command.

use anyhow::{Context as _, Result};
use console_business::api::list_entities;
use console_business::{
    ApiClient, Application, Entity, EntityKind, Ldap, Organization, Syncer, TableKind, User,
};
use inquire::Select;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::cli::TableTarget;
use crate::commands::ldap::run_ldap_show;
use crate::commands::{run_show, truncate_str};
use crate::context::AppContext;
use crate::output::Output;

/// Owner used for kinds other than users, which live under an organization.
const ADMIN_OWNER: &str = "admin";

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Display name")]
    display_name: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Rows")]
    rows: String,
}

#[instrument(skip_all, name = "list", fields(kind = %kind))]
pub async fn run_list(
    ctx: &AppContext,
    kind: EntityKind,
    owner: Option<String>,
    interactive: bool,
) -> Result<()> {
    let out = Output::new();
    let client = ctx.client()?;
    let owner = owner.unwrap_or_else(|| default_owner(kind, &client).to_owned());

    let rows = match kind {
        EntityKind::Organization => fetch_rows::<Organization>(&client, &owner).await?,
        EntityKind::Application => fetch_rows::<Application>(&client, &owner).await?,
        EntityKind::Syncer => fetch_rows::<Syncer>(&client, &owner).await?,
        EntityKind::User => fetch_rows::<User>(&client, &owner).await?,
        EntityKind::Ldap => fetch_rows::<Ldap>(&client, &owner).await?,
    };

    if rows.is_empty() {
        out.dim(format!("No {} found under {owner}.", kind.plural()));
        return Ok(());
    }

    if interactive {
        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        let Some(id) = Select::new(&format!("Select {kind}:"), ids)
            .with_help_message("Use arrow keys to navigate, Enter to select")
            .prompt_skippable()
            .context("Failed to select entity")?
        else {
            return Ok(());
        };

        if kind.tables().is_empty() {
            return run_ldap_show(&client, id.parse()?).await;
        }
        let table = Select::new("Select table:", kind.tables().to_vec())
            .prompt()
            .context("Failed to select table")?;
        let target = TableTarget {
            kind,
            id: id.parse()?,
            table,
        };
        return run_show(ctx, target).await;
    }

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.newline();
    out.print(table.to_string());
    out.total("Total", rows.len(), kind);
    Ok(())
}

fn default_owner(kind: EntityKind, client: &ApiClient) -> &str {
    match kind {
        EntityKind::User | EntityKind::Ldap => client.config().organization(),
        _ => ADMIN_OWNER,
    }
}

async fn fetch_rows<E: Entity>(client: &ApiClient, owner: &str) -> Result<Vec<ListRow>> {
    let entities = list_entities::<E>(client, owner)
        .await
        .with_context(|| format!("Failed to list {}", E::KIND.plural()))?;
    Ok(entities.iter().map(list_row).collect())
}

fn list_row<E: Entity>(entity: &E) -> ListRow {
    ListRow {
        id: entity.id().to_string(),
        display_name: truncate_str(entity.display_name(), 24),
        created: entity.created_time().to_owned(),
        rows: row_counts(entity),
    }
}

/// `accountItems: 3, mfaItems: 0` for each table the entity owns.
fn row_counts<E: Entity>(entity: &E) -> String {
    if E::KIND.tables().is_empty() {
        return "-".to_owned();
    }
    let value = serde_json::to_value(entity).unwrap_or_default();
    E::KIND
        .tables()
        .iter()
        .map(|table: &TableKind| {
            let count = value
                .get(table.field_name())
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len);
            format!("{table}: {count}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use console_business::{AccountItem, ConsoleConfig};

    use super::*;

    #[test]
    fn test_row_counts_treat_null_as_empty() {
        let org = Organization {
            owner: "admin".to_owned(),
            name: "acme".to_owned(),
            account_items: Some(vec![AccountItem::default(), AccountItem::default()]),
            mfa_items: None,
            ..Organization::default()
        };
        assert_eq!(row_counts(&org), "accountItems: 2, mfaItems: 0");
    }

    #[test]
    fn test_list_row() {
        let user = User {
            owner: "built-in".to_owned(),
            name: "alice".to_owned(),
            display_name: "Alice Example".to_owned(),
            created_time: "2024-01-01T00:00:00Z".to_owned(),
            ..User::default()
        };
        let row = list_row(&user);
        assert_eq!(row.id, "built-in/alice");
        assert_eq!(row.display_name, "Alice Example");
        assert_eq!(row.rows, "managedAccounts: 0");
    }

    #[test]
    fn test_list_row_for_ldap() {
        let ldap = Ldap {
            id: "ldap-1".to_owned(),
            owner: "acme".to_owned(),
            server_name: "Corp directory".to_owned(),
            ..Ldap::default()
        };
        let row = list_row(&ldap);
        assert_eq!(row.id, "acme/ldap-1");
        assert_eq!(row.display_name, "Corp directory");
        assert_eq!(row.rows, "-");
    }

    #[test]
    fn test_default_owner() {
        let client = ApiClient::new(ConsoleConfig::new("http://localhost:8000").unwrap());
        assert_eq!(default_owner(EntityKind::User, &client), "built-in");
        assert_eq!(default_owner(EntityKind::Application, &client), "admin");
        assert_eq!(default_owner(EntityKind::Ldap, &client), "built-in");
    }
}
