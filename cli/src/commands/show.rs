//! Show one row table of an entity.

use anyhow::Result;
use console_business::{ApiClient, EntityEditor, EntityId, HasTable, TableRow};
use tracing::instrument;

use crate::cli::TableTarget;
use crate::commands::{check_target, rows_table};
use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "show", fields(id = %target.id, table = %target.table))]
pub async fn run_show(ctx: &AppContext, target: TableTarget) -> Result<()> {
    check_target(&target)?;
    let client = ctx.client()?;
    with_table!(target.table, <E, R> => show_table::<E, R>(&client, &target.id).await)
}

async fn show_table<E, R>(client: &ApiClient, id: &EntityId) -> Result<()>
where
    E: HasTable<R>,
    R: TableRow + Send + 'static,
{
    let editor = EntityEditor::<E>::load(client, id).await?;
    print_table(id, editor.rows::<R>());
    Ok(())
}

/// Prints `rows` under a header naming the entity and table.
pub fn print_table<R: TableRow>(id: &EntityId, rows: &[R]) {
    let out = Output::new();
    out.header(format!("{id} · {}", R::TABLE));
    if rows.is_empty() {
        out.dim("No rows.");
        return;
    }
    out.print(rows_table(rows));
    out.count("Rows", rows.len());
}
