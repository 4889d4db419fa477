//! ifconfig, ssh, download

use crate::error::ShellError;
use crate::shell::context::CommandContext;
use crate::shell::{remote, Invocation};

pub fn ifconfig(ctx: &mut CommandContext<'_>, _inv: &Invocation<'_>) -> Result<(), ShellError> {
    let host = ctx.host();
    let report = format!(
        "{}: flags=4163<UP,BROADCAST,RUNNING,MULTICAST>  mtu 1500\n        inet {}  netmask 255.255.255.0",
        host.name(),
        host.ip()
    );
    ctx.print(report);
    Ok(())
}

pub fn ssh(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() != 1 {
        return Err(ShellError::Usage("ssh <ip>"));
    }
    let ip = inv.args[0];
    let target = remote::lookup(ctx.network, ctx.sessions, ip)?;

    let aborted = || ShellError::SessionState("ssh: login aborted".to_string());
    let username = ctx.console.read_line("Username: ").ok_or_else(aborted)?;
    let password = ctx.console.read_password("Password: ").ok_or_else(aborted)?;
    let username = username.trim();

    remote::connect(ctx.network, ctx.sessions, target, username, &password)?;
    let name = ctx.network.host(target).name().to_string();
    ctx.print(format!("Connected to {} ({})", name, ip));
    ctx.print(format!("Logged in as {}!", username));
    Ok(())
}

pub fn download(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() != 1 {
        return Err(ShellError::Usage("download <path>"));
    }
    let dest = remote::download(ctx.network, ctx.sessions, inv.args[0])?;
    ctx.print(format!("Downloaded {} to {}", inv.args[0], dest));
    Ok(())
}
