//! setpasswd, help, resetgame, clear, exit

use crate::error::ShellError;
use crate::shell::context::CommandContext;
use crate::shell::Invocation;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};

pub fn setpasswd(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() != 1 {
        return Err(ShellError::Usage("setpasswd <password>"));
    }
    if ctx.host().active_user().is_none() {
        return Err(ShellError::SessionState(
            "setpasswd: nobody is logged in".to_string(),
        ));
    }
    ctx.host_mut().set_password(inv.args[0])?;
    tracing::info!(host = %ctx.host().name(), "password changed");
    ctx.print("Password updated.");
    Ok(())
}

pub fn help(ctx: &mut CommandContext<'_>, _inv: &Invocation<'_>) -> Result<(), ShellError> {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Command", "Usage", "Description"]);
    for spec in ctx.shell.commands() {
        table.add_row(vec![spec.name, spec.usage, spec.summary]);
    }
    ctx.print(table.to_string());
    Ok(())
}

const RESET_PROMPT: &str =
    "This deletes all saved progress and quits. Are you sure? (yes/no): ";

pub fn resetgame(ctx: &mut CommandContext<'_>, _inv: &Invocation<'_>) -> Result<(), ShellError> {
    loop {
        let answer = match ctx.console.read_line(RESET_PROMPT) {
            Some(answer) => answer,
            None => {
                ctx.print("Reset cancelled.");
                return Ok(());
            }
        };
        match answer.trim().to_lowercase().as_str() {
            "yes" | "y" => break,
            "no" | "n" => {
                ctx.print("Reset cancelled.");
                return Ok(());
            }
            _ => ctx.print("Invalid input. Please enter 'yes|y' or 'no|n'."),
        }
    }

    let mut removed = 0;
    for host in ctx.network.hosts() {
        removed += host.store().purge()?;
    }
    tracing::warn!(removed, "saved progress deleted");
    ctx.print("Game reset. All saved progress has been deleted.");
    ctx.sessions.request_shutdown();
    Ok(())
}

pub fn clear(ctx: &mut CommandContext<'_>, _inv: &Invocation<'_>) -> Result<(), ShellError> {
    ctx.console.clear();
    Ok(())
}

/// Save and flag the current host; the session loop does the leaving.
pub fn exit(ctx: &mut CommandContext<'_>, _inv: &Invocation<'_>) -> Result<(), ShellError> {
    ctx.save()?;
    ctx.host_mut().request_exit();
    Ok(())
}
