//! `config` subcommands: inspect and change the saved settings.

use anyhow::{Context as _, Result};
use console_business::ConsoleConfig;
use inquire::Password;

use crate::cli::ConfigAction;
use crate::context::AppContext;
use crate::output::Output;

pub fn run_config(ctx: &mut AppContext, action: ConfigAction) -> Result<()> {
    let out = Output::new();
    match action {
        ConfigAction::SetServer { url } => {
            let checked = ConsoleConfig::new(url.as_str())
                .with_context(|| format!("Not a usable server URL: {url}"))?;
            ctx.file.set_server(checked.server_url());
            ctx.save()?;
            out.success(format!("Server set to {}", checked.server_url()));
        }
        ConfigAction::SetToken { token } => {
            let token = match token {
                Some(token) => token,
                None => Password::new("Access token:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read token")?,
            };
            if token.trim().is_empty() {
                out.warning("Empty token ignored.");
                return Ok(());
            }
            ctx.file.set_token(&token);
            ctx.save()?;
            out.success("Token saved");
        }
        ConfigAction::ClearToken => {
            if ctx.file.has_token() {
                ctx.file.clear_token();
                ctx.save()?;
                out.success("Token cleared");
            } else {
                out.info("No token was saved.");
            }
        }
        ConfigAction::Show => show(ctx, &out),
    }
    Ok(())
}

fn show(ctx: &AppContext, out: &Output) {
    out.labeled_indent("Config file", ctx.config_path.display(), 0);
    out.divider(40);
    match ctx.console_config() {
        Ok(config) => {
            out.section("Effective settings");
            out.labeled_indent("Server", config.server_url(), 4);
            out.labeled_indent("Organization", config.organization(), 4);
            let auth = match (config.access_token(), config.client_credentials()) {
                (Some(token), _) => format!("bearer {}", mask(token)),
                (None, Some((id, _))) => format!("client {id}"),
                (None, None) => "none".to_owned(),
            };
            out.labeled_indent("Auth", auth, 4);
        }
        Err(err) => out.warning(format!("{err:#}")),
    }
}

/// Keeps the first and last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
