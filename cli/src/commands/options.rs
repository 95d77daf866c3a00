//! Lists the values a table's name column can still take.

use anyhow::{Context as _, Result, bail};
use console_business::rows::{
    ACCOUNT_ITEM_NAMES, MFA_METHOD_NAMES, SIGNIN_ITEM_NAMES, SIGNIN_METHOD_NAMES,
    SIGNUP_ITEM_NAMES,
};
use console_business::{ApiClient, EntityEditor, EntityId, HasTable, TableKind, TableRow};
use console_states::deduplicated_options;
use serde_json::Value;
use tracing::instrument;

use crate::cli::TableTarget;
use crate::commands::check_target;
use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "options", fields(id = %target.id, table = %target.table))]
pub async fn run_options(ctx: &AppContext, target: TableTarget) -> Result<()> {
    check_target(&target)?;
    let client = ctx.client()?;
    let candidates = candidates(&client, target.table).await?;

    let left = with_table!(target.table, <E, R> => {
        unused_options::<E, R>(&client, &target.id, &candidates).await?
    });

    let out = Output::new();
    if left.is_empty() {
        out.dim(format!("Every option is already used in {}.", target.table));
        return Ok(());
    }
    out.header(format!("Available for {} of {}", target.table, target.id));
    out.numbered(&left);
    out.count("Options", left.len());
    Ok(())
}

async fn unused_options<E, R>(
    client: &ApiClient,
    id: &EntityId,
    candidates: &[String],
) -> Result<Vec<String>>
where
    E: HasTable<R>,
    R: TableRow + Send + 'static,
{
    let editor = EntityEditor::<E>::load(client, id).await?;
    let key = option_key(R::TABLE);
    Ok(
        deduplicated_options(candidates, String::as_str, editor.rows::<R>(), key)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// The row field the candidates are matched against.
fn option_key(table: TableKind) -> &'static str {
    match table {
        TableKind::ManagedAccounts => "application",
        _ => "name",
    }
}

async fn candidates(client: &ApiClient, table: TableKind) -> Result<Vec<String>> {
    let fixed = match table {
        TableKind::AccountItems => ACCOUNT_ITEM_NAMES,
        TableKind::MfaItems => MFA_METHOD_NAMES,
        TableKind::SignupItems => SIGNUP_ITEM_NAMES,
        TableKind::SigninItems => SIGNIN_ITEM_NAMES,
        TableKind::SigninMethods => SIGNIN_METHOD_NAMES,
        TableKind::Providers => return fetch_names(client, "get-providers").await,
        TableKind::ManagedAccounts => return fetch_names(client, "get-applications").await,
        TableKind::TableColumns => bail!("{table} names are free-form; there is no option list"),
    };
    Ok(fixed.iter().map(|name| (*name).to_owned()).collect())
}

/// Names of every object the admin owner has at `path`.
async fn fetch_names(client: &ApiClient, path: &str) -> Result<Vec<String>> {
    let items = client
        .get::<Vec<Value>, Value>(path, &[("owner", "admin")])
        .await?
        .into_result()
        .with_context(|| format!("Failed to fetch options from {path}"))?;
    Ok(names_of(&items))
}

fn names_of(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}
