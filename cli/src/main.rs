mod cli;
mod commands;
mod config;
mod context;
mod output;
mod timing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console_states::Position;

use crate::cli::{Cli, Commands};
use crate::commands::{
    RowEdit, generate_completions, run_config, run_ldap, run_list, run_mfa_disable,
    run_mfa_preferred, run_mfa_setup, run_options, run_row_edit, run_show,
};
use crate::context::AppContext;
use crate::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            Output::new().error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // completions never need a config file
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell)?;
        return Ok(());
    }

    let mut ctx = AppContext::load(cli.config)?;

    match cli.command {
        Commands::List {
            kind,
            owner,
            interactive,
        } => run_list(&ctx, kind, owner, interactive).await,
        Commands::Show { target } => run_show(&ctx, target).await,
        Commands::AddRow {
            target,
            top,
            custom,
            set,
        } => {
            let position = if top {
                Position::Top
            } else {
                Position::Bottom
            };
            run_row_edit(
                &ctx,
                target,
                RowEdit::Add {
                    position,
                    custom,
                    set,
                },
            )
            .await
        }
        Commands::DeleteRow { target, index, yes } => {
            run_row_edit(
                &ctx,
                target,
                RowEdit::Delete {
                    index,
                    confirmed: yes,
                },
            )
            .await
        }
        Commands::MoveRow {
            target,
            index,
            direction,
        } => run_row_edit(&ctx, target, RowEdit::Move { index, direction }).await,
        Commands::SetField {
            target,
            index,
            key,
            value,
        } => run_row_edit(&ctx, target, RowEdit::SetField { index, key, value }).await,
        Commands::Options { target } => run_options(&ctx, target).await,
        Commands::MfaSetup {
            user,
            method,
            skip_password,
        } => run_mfa_setup(&ctx, user, method, skip_password).await,
        Commands::MfaPreferred { user, method } => run_mfa_preferred(&ctx, user, method).await,
        Commands::MfaDisable { user, yes } => run_mfa_disable(&ctx, user, yes).await,
        Commands::Ldap { action } => run_ldap(&ctx, action).await,
        Commands::Config { action } => run_config(&mut ctx, action),
        Commands::Completions { .. } => Ok(()),
    }
}
