//! Command shell.
//!
//! [`Shell`] owns the command table and dispatches one line at a time
//! against whichever host is on top of the [`SessionStack`]. [`Shell::run`]
//! is the interactive loop: sign-in, prompt, dispatch, until the local
//! session exits or input runs out.

pub mod commands;
pub mod console;
pub mod context;
pub mod remote;
pub mod session;

pub use commands::CommandSpec;
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use context::CommandContext;
pub use session::{SessionFrame, SessionStack};

use crate::error::ShellError;
use crate::host::Host;
use crate::network::Network;
use std::collections::BTreeMap;

/// Frames per second used when `open` plays a media file.
pub const DEFAULT_ANIMATION_FPS: u32 = 24;

/// Runtime knobs for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub animation_fps: u32,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            animation_fps: DEFAULT_ANIMATION_FPS,
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'l> {
    pub name: &'l str,
    /// Whitespace-separated arguments
    pub args: Vec<&'l str>,
    /// Everything after the command name, untokenized
    pub raw_args: &'l str,
}

impl<'l> Invocation<'l> {
    /// Split a line into command name and arguments. Blank lines yield `None`.
    pub fn parse(line: &'l str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };
        Some(Self {
            name,
            args: rest.split_whitespace().collect(),
            raw_args: rest,
        })
    }
}

/// User-facing rendering of a command failure.
pub(crate) fn render_error(command: &str, err: &ShellError) -> String {
    match err {
        ShellError::Path(e) => format!("{}: {}", command, e),
        e if e.is_recoverable() => e.to_string(),
        e => format!("Error executing command: {}", e),
    }
}

pub struct Shell {
    commands: BTreeMap<&'static str, &'static CommandSpec>,
    settings: ShellSettings,
}

impl Shell {
    pub fn new(settings: ShellSettings) -> Self {
        let commands = commands::BUILTINS.iter().map(|spec| (spec.name, spec)).collect();
        Self { commands, settings }
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn command(&self, name: &str) -> Option<&'static CommandSpec> {
        self.commands.get(name).copied()
    }

    /// Every registered command, sorted by name.
    pub fn commands(&self) -> impl Iterator<Item = &'static CommandSpec> + '_ {
        self.commands.values().copied()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    /// Run one line against the host on top of `sessions`.
    ///
    /// Failures are reported on the console, never returned. If the line
    /// made a remote host exit, its session is torn down here.
    pub fn execute(
        &self,
        network: &mut Network,
        sessions: &mut SessionStack,
        console: &mut dyn Console,
        line: &str,
    ) {
        let invocation = match Invocation::parse(line) {
            Some(inv) => inv,
            None => return,
        };
        let host_id = match sessions.current_host() {
            Some(id) => id,
            None => return,
        };
        let spec = match self.command(invocation.name) {
            Some(spec) => spec,
            None => {
                console.print(&format!("Command not found: {}", invocation.name));
                return;
            }
        };

        tracing::debug!(
            command = spec.name,
            host = %network.host(host_id).name(),
            args = ?invocation.args,
            "dispatch"
        );
        let result = {
            let mut ctx = CommandContext::new(self, network, sessions, console, host_id);
            (spec.handler)(&mut ctx, &invocation)
        };
        if let Err(err) = result {
            if err.is_recoverable() {
                tracing::debug!(command = spec.name, error = %err, "command refused");
            } else {
                tracing::error!(command = spec.name, error = %err, "command failed");
            }
            console.print(&render_error(spec.name, &err));
        }

        if sessions.is_remote()
            && sessions.current_host() == Some(host_id)
            && network.host(host_id).exit_requested()
        {
            if let Some(frame) = remote::disconnect(network, sessions) {
                console.print(&format!("Connection to {} closed.", network.host(frame.host).ip()));
            }
        }
    }

    /// Interactive loop starting on the player's host.
    pub fn run(&self, network: &mut Network, console: &mut dyn Console) -> Result<(), ShellError> {
        let player = network
            .player()
            .ok_or_else(|| ShellError::Config("no hosts configured".to_string()))?;
        let mut sessions = SessionStack::new(player);
        self.run_sessions(network, &mut sessions, console)
    }

    /// Drive `sessions` until the local frame exits, input ends, or a
    /// shutdown is requested.
    ///
    /// End of input unwinds every open session and saves each host. A
    /// shutdown (from `resetgame`) stops immediately without saving.
    pub fn run_sessions(
        &self,
        network: &mut Network,
        sessions: &mut SessionStack,
        console: &mut dyn Console,
    ) -> Result<(), ShellError> {
        while let Some(host_id) = sessions.current_host() {
            if sessions.is_shutdown() {
                tracing::info!("shutdown requested, leaving without saving");
                return Ok(());
            }

            if network.host(host_id).active_user().is_none() {
                if !sign_in(network.host_mut(host_id), console)? {
                    return self.unwind(network, sessions, console);
                }
                continue;
            }

            let prompt = network.host(host_id).prompt();
            let line = match console.read_line(&prompt) {
                Some(line) => line,
                None => return self.unwind(network, sessions, console),
            };
            self.execute(network, sessions, console, &line);

            if sessions.is_shutdown() {
                tracing::info!("shutdown requested, leaving without saving");
                return Ok(());
            }
            if sessions.current_host() == Some(host_id)
                && !sessions.is_remote()
                && network.host_mut(host_id).take_exit_request()
            {
                sessions.pop();
            }
        }
        console.print("Quit out of terminal successfully!");
        Ok(())
    }

    fn unwind(
        &self,
        network: &mut Network,
        sessions: &mut SessionStack,
        console: &mut dyn Console,
    ) -> Result<(), ShellError> {
        while let Some(frame) = sessions.current() {
            network.host(frame.host).save()?;
            if remote::disconnect(network, sessions).is_none() {
                sessions.pop();
            }
        }
        tracing::info!("input closed, all sessions saved");
        console.print("Quit out of terminal successfully!");
        Ok(())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellSettings::default())
    }
}

/// Account creation (first start of the player host) or login.
///
/// Returns `Ok(false)` when input ends before a user is active.
fn sign_in(host: &mut Host, console: &mut dyn Console) -> Result<bool, ShellError> {
    if !host.has_users() && host.is_player() {
        console.print("Create a login for your terminal.");
        let username = match console.read_line("Enter a username: ") {
            Some(u) => u,
            None => return Ok(false),
        };
        let password = match console.read_password("Enter a password: ") {
            Some(p) => p,
            None => return Ok(false),
        };
        match host.create_user(username.trim(), &password) {
            Ok(user) => console.print(&format!("Logged in as {}!", user.username)),
            Err(e) if e.is_recoverable() => console.print(&e.to_string()),
            Err(e) => return Err(e),
        }
        return Ok(true);
    }

    console.print(&format!("Login to {}", host.name()));
    let username = match console.read_line("Username: ") {
        Some(u) => u,
        None => return Ok(false),
    };
    let password = match console.read_password("Password: ") {
        Some(p) => p,
        None => return Ok(false),
    };
    if host.login(username.trim(), &password) {
        console.print(&format!("Logged in as {}!", username.trim()));
    } else {
        console.print(&ShellError::AuthenticationFailed.to_string());
    }
    Ok(true)
}
