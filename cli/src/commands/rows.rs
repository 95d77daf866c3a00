//! Row editing commands: add, delete, move and set-field.
//!
//! Each run loads the entity, applies one edit through an [`EntityEditor`],
//! prints the resulting table and saves.

use anyhow::{Context as _, Result};
use console_business::{ApiClient, EntityEditor, EntityId, HasTable, TableRow};
use console_states::{Position, Row, RowTable, TableError};
use inquire::Confirm;
use tracing::{info, instrument};

use crate::cli::{Direction, TableTarget};
use crate::commands::check_target;
use crate::commands::show::print_table;
use crate::context::AppContext;
use crate::output::Output;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEdit {
    Add {
        position: Position,
        custom: bool,
        set: Vec<(String, String)>,
    },
    Delete {
        index: usize,
        confirmed: bool,
    },
    Move {
        index: usize,
        direction: Direction,
    },
    SetField {
        index: usize,
        key: String,
        value: String,
    },
}

#[instrument(skip_all, name = "row_edit", fields(id = %target.id, table = %target.table))]
pub async fn run_row_edit(ctx: &AppContext, target: TableTarget, edit: RowEdit) -> Result<()> {
    check_target(&target)?;
    let client = ctx.client()?;
    with_table!(target.table, <E, R> => edit_rows::<E, R>(&client, &target.id, edit).await)
}

async fn edit_rows<E, R>(client: &ApiClient, id: &EntityId, edit: RowEdit) -> Result<()>
where
    E: HasTable<R>,
    R: TableRow + Send + 'static,
{
    let out = Output::new();
    if matches!(edit, RowEdit::Add { custom: true, .. }) && R::custom_row(&[]).is_none() {
        anyhow::bail!("{} has no custom rows", R::TABLE);
    }

    let mut editor = EntityEditor::<E>::load(client, id).await?;

    if let RowEdit::Delete {
        index,
        confirmed: false,
    } = &edit
        && let Some(row) = editor.rows::<R>().get(*index)
    {
        let proceed = Confirm::new(&format!(
            "Delete row {index} ({}) from {}?",
            row.name().trim_end(),
            R::TABLE
        ))
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")?;
        if !proceed {
            out.dim("Cancelled.");
            return Ok(());
        }
    }

    let summary = apply_edit::<E, R>(&mut editor, edit)?;
    print_table(id, editor.rows::<R>());

    let outcome = editor.save(client).await?;
    info!(?outcome, "saved");
    if outcome.is_affected() {
        out.success(summary);
    } else {
        out.warning(format!("{summary}, but the server reported no change"));
    }
    Ok(())
}

/// Applies `edit` to the editor and describes what changed.
pub fn apply_edit<E, R>(editor: &mut EntityEditor<E>, edit: RowEdit) -> Result<String, TableError>
where
    E: HasTable<R>,
    R: TableRow + Send + 'static,
{
    match edit {
        RowEdit::Add {
            position,
            custom,
            set,
        } => {
            let values = set
                .iter()
                .map(|(key, value)| -> Result<_, TableError> {
                    Ok((key.as_str(), R::parse_field(key, value)?))
                })
                .collect::<Result<Vec<_>, TableError>>()?;

            let custom_index = if custom {
                editor.insert_custom_row::<R>(position)
            } else {
                None
            };
            let index = match custom_index {
                Some(index) => index,
                None => editor.insert_new_row::<R>(position),
            };
            editor.edit_table(|table: &mut RowTable<'_, R>| {
                for (key, value) in values {
                    table.update_field(index, key, value)?;
                }
                Ok(())
            })?;
            Ok(format!("Added row {index} to {}", R::TABLE))
        }
        RowEdit::Delete { index, .. } => {
            editor.edit_table(|table: &mut RowTable<'_, R>| {
                table.delete_row(index)?;
                Ok(())
            })?;
            Ok(format!("Deleted row {index} from {}", R::TABLE))
        }
        RowEdit::Move { index, direction } => {
            let to = editor.edit_table(|table: &mut RowTable<'_, R>| match direction {
                Direction::Up => table.move_up(index).map(|_| index - 1),
                Direction::Down => table.move_down(index).map(|_| index + 1),
            })?;
            Ok(format!("Moved row {index} to {to} in {}", R::TABLE))
        }
        RowEdit::SetField { index, key, value } => {
            let value = R::parse_field(&key, &value)?;
            editor.edit_table(|table: &mut RowTable<'_, R>| {
                table.update_field(index, &key, value)?;
                Ok(())
            })?;
            Ok(format!("Set {key} on row {index} of {}", R::TABLE))
        }
    }
}
