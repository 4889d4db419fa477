//! Hack The Planet binary
//!
//! Loads configuration, opens every host and runs the interactive shell on
//! the terminal.

use anyhow::Context;
use clap::Parser;
use hacktheplanet::cli::{Cli, CliContext};
use hacktheplanet::shell::TerminalConsole;
use std::process;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = CliContext::new(cli).context("Failed to load configuration")?;

    if cli.print_config {
        println!("{}", context.config().to_toml()?);
        return Ok(());
    }

    context
        .init_logging()
        .context("Failed to initialize logging")?;

    if cli.reset {
        let removed = context.reset().context("Failed to delete saved progress")?;
        println!("Deleted {} saved filesystem(s).", removed);
    }

    let mut console = TerminalConsole::new();
    context
        .run(&mut console)
        .context("Game session ended with an error")?;
    Ok(())
}
