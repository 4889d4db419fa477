//! Per-invocation state handed to command handlers.

use crate::error::ShellError;
use crate::host::Host;
use crate::network::{HostId, Network};
use crate::shell::console::Console;
use crate::shell::session::SessionStack;
use crate::shell::Shell;

/// Everything a command may touch: the shell's table and settings, every
/// host, the session stack and the console.
pub struct CommandContext<'a> {
    pub shell: &'a Shell,
    pub network: &'a mut Network,
    pub sessions: &'a mut SessionStack,
    pub console: &'a mut dyn Console,
    host_id: HostId,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        shell: &'a Shell,
        network: &'a mut Network,
        sessions: &'a mut SessionStack,
        console: &'a mut dyn Console,
        host_id: HostId,
    ) -> Self {
        Self {
            shell,
            network,
            sessions,
            console,
            host_id,
        }
    }

    /// Host the command runs on.
    pub fn host_id(&self) -> HostId {
        self.host_id
    }

    pub fn host(&self) -> &Host {
        self.network.host(self.host_id)
    }

    pub fn host_mut(&mut self) -> &mut Host {
        self.network.host_mut(self.host_id)
    }

    pub fn print(&mut self, text: impl AsRef<str>) {
        self.console.print(text.as_ref());
    }

    /// Persist the current host's tree.
    pub fn save(&self) -> Result<(), ShellError> {
        self.host().save()?;
        Ok(())
    }
}
