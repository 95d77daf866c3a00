//! LDAP server commands: show, set and user sync.

use anyhow::{Context as _, Result, bail};
use console_business::ldap::{get_ldap_users, sync_ldap_users};
use console_business::{ApiClient, EntityEditor, EntityId, Ldap, LdapUser, LdapUsers};
use console_states::Row;
use inquire::MultiSelect;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{info, instrument};

use crate::cli::LdapAction;
use crate::commands::truncate_str;
use crate::context::AppContext;
use crate::output::Output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Imported")]
    imported: &'static str,
}

pub async fn run_ldap(ctx: &AppContext, action: LdapAction) -> Result<()> {
    let client = ctx.client()?;
    match action {
        LdapAction::Show { id } => run_ldap_show(&client, id).await,
        LdapAction::Set { id, set } => run_ldap_set(&client, id, set).await,
        LdapAction::Sync { id, all } => run_ldap_sync(&client, id, all).await,
    }
}

#[instrument(skip_all, name = "ldap_show", fields(id = %id))]
pub async fn run_ldap_show(client: &ApiClient, id: EntityId) -> Result<()> {
    let editor = EntityEditor::<Ldap>::load(client, &id).await?;
    print_ldap(&id, editor.entity());
    Ok(())
}

fn print_ldap(id: &EntityId, ldap: &Ldap) {
    let out = Output::new();
    out.header(format!("{id} · {}", ldap.server_name));
    for (label, value) in ldap_summary(ldap) {
        out.labeled_indent(label, value, 2);
    }
}

fn ldap_summary(ldap: &Ldap) -> Vec<(&'static str, String)> {
    let auto_sync = if ldap.auto_sync_enabled() {
        format!("every {} min", ldap.auto_sync)
    } else {
        "off".to_owned()
    };
    let last_sync = if ldap.last_sync.is_empty() {
        "never".to_owned()
    } else {
        ldap.last_sync.clone()
    };
    vec![
        ("Server", ldap.address()),
        ("Base DN", ldap.base_dn.clone()),
        ("Admin", ldap.username.clone()),
        ("Filter", ldap.filter.clone()),
        ("Filter fields", ldap.filter_fields.join(", ")),
        ("Default group", ldap.default_group.clone()),
        ("Auto sync", auto_sync),
        ("Last sync", last_sync),
    ]
}

#[instrument(skip_all, name = "ldap_set", fields(id = %id))]
async fn run_ldap_set(client: &ApiClient, id: EntityId, set: Vec<(String, String)>) -> Result<()> {
    let out = Output::new();
    let mut editor = EntityEditor::<Ldap>::load(client, &id).await?;

    let keys: Vec<&str> = set.iter().map(|(key, _)| key.as_str()).collect();
    apply_ldap_fields(&mut editor, &set)?;

    let outcome = editor.save(client).await?;
    info!(?outcome, "saved");
    print_ldap(&editor.original_id(), editor.entity());
    if outcome.is_affected() {
        out.success(format!("Updated {} on {id}", keys.join(", ")));
    } else {
        out.warning(format!("{id} saved, but the server reported no change"));
    }
    Ok(())
}

/// Parses every value before touching the entity, so a bad one changes nothing.
fn apply_ldap_fields(editor: &mut EntityEditor<Ldap>, set: &[(String, String)]) -> Result<()> {
    let values = set
        .iter()
        .map(|(key, value)| -> Result<_> { Ok((key.as_str(), Ldap::parse_field(key, value)?)) })
        .collect::<Result<Vec<_>>>()?;

    let mut result = Ok(());
    editor.update(|ldap| {
        result = values
            .into_iter()
            .try_for_each(|(key, value)| ldap.set_field(key, value));
    });
    Ok(result?)
}

#[instrument(skip_all, name = "ldap_sync", fields(id = %id))]
async fn run_ldap_sync(client: &ApiClient, id: EntityId, all: bool) -> Result<()> {
    let out = Output::new();
    let editor = EntityEditor::<Ldap>::load(client, &id).await?;
    let ldap = editor.entity();

    let listing = get_ldap_users(client, &id)
        .await
        .with_context(|| format!("Failed to read users from {}", ldap.address()))?;
    if listing.users.is_empty() {
        out.dim(format!("No users found under {}.", ldap.base_dn));
        return Ok(());
    }

    out.header(format!("{id} · {}", ldap.server_name));
    out.print(users_table(&listing));
    out.count("Users", listing.users.len());

    let pending = listing.pending();
    if pending.is_empty() {
        out.success(format!(
            "All {} user(s) are already in {}",
            listing.users.len(),
            ldap.owner
        ));
        return Ok(());
    }

    let selected: Vec<LdapUser> = if all {
        pending.into_iter().cloned().collect()
    } else {
        pick_users(&pending)?
    };
    if selected.is_empty() {
        bail!("Select at least one user to sync");
    }

    let result = sync_ldap_users(client, &id, &selected).await?;
    info!(
        selected = selected.len(),
        exist = result.exist.len(),
        failed = result.failed.len(),
        "ldap sync finished"
    );

    if !result.exist.is_empty() {
        out.warning(format!("Already present: {}", labels(&result.exist)));
    }
    if !result.failed.is_empty() {
        bail!("Failed to sync: {}", labels(&result.failed));
    }
    let imported = selected.len().saturating_sub(result.exist.len());
    out.success(format!("Synced {imported} user(s) into {}", ldap.owner));
    Ok(())
}

fn pick_users(pending: &[&LdapUser]) -> Result<Vec<LdapUser>> {
    let options: Vec<String> = pending
        .iter()
        .map(|user| format!("{} ({})", user.label(), user.uid))
        .collect();
    let chosen = MultiSelect::new("Users to sync:", options)
        .with_help_message("Space to toggle, Enter to confirm")
        .raw_prompt()
        .context("Failed to select users")?;
    Ok(chosen
        .into_iter()
        .filter_map(|option| pending.get(option.index).map(|user| (*user).clone()))
        .collect())
}

fn users_table(listing: &LdapUsers) -> String {
    let rows: Vec<UserRow> = listing
        .users
        .iter()
        .map(|user| UserRow {
            uid: user.uid.clone(),
            name: truncate_str(user.label(), 24),
            email: user.email.clone(),
            imported: if listing.is_imported(user) { "yes" } else { "" },
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

fn labels(users: &[LdapUser]) -> String {
    users
        .iter()
        .map(LdapUser::label)
        .collect::<Vec<_>>()
        .join(", ")
}
