//! Shell completions generation command.

use std::io::{self, Write};

use clap::CommandFactory as _;
use clap_complete::{Generator, Shell};

use crate::cli::Cli;

/// Generate shell completions for the specified shell on stdout.
pub fn generate_completions(shell: Shell) -> io::Result<()> {
    let mut stdout = io::stdout();
    write_completions(shell, &mut stdout)?;
    stdout.flush()
}

fn write_completions<G: Generator>(generator: G, buf: &mut impl Write) -> io::Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_owned();
    clap_complete::generate(generator, &mut cmd, bin_name, buf);
    Ok(())
}
