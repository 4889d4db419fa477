//! Built-in command table.

pub mod files;
pub mod navigation;
pub mod network;
pub mod search;
pub mod system;

use crate::error::ShellError;
use crate::host::Host;
use crate::shell::context::CommandContext;
use crate::shell::Invocation;

pub type CommandHandler = fn(&mut CommandContext<'_>, &Invocation<'_>) -> Result<(), ShellError>;

/// A command's name, help text and handler.
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: CommandHandler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish()
    }
}

pub static BUILTINS: &[CommandSpec] = &[
    CommandSpec {
        name: "pwd",
        usage: "pwd",
        summary: "Print the current working directory",
        handler: navigation::pwd,
    },
    CommandSpec {
        name: "ls",
        usage: "ls [-a] [path]",
        summary: "List directory contents",
        handler: navigation::ls,
    },
    CommandSpec {
        name: "cd",
        usage: "cd [path]",
        summary: "Change the working directory",
        handler: navigation::cd,
    },
    CommandSpec {
        name: "mkdir",
        usage: "mkdir <dir>...",
        summary: "Create directories",
        handler: files::mkdir,
    },
    CommandSpec {
        name: "touch",
        usage: "touch <file>...",
        summary: "Create empty files",
        handler: files::touch,
    },
    CommandSpec {
        name: "cat",
        usage: "cat <file>",
        summary: "Print a text file",
        handler: files::cat,
    },
    CommandSpec {
        name: "open",
        usage: "open <file>",
        summary: "Open a text or media file",
        handler: files::open,
    },
    CommandSpec {
        name: "rm",
        usage: "rm [-r] <path>...",
        summary: "Remove files, or directories with -r",
        handler: files::rm,
    },
    CommandSpec {
        name: "rmdir",
        usage: "rmdir [-r] <dir>...",
        summary: "Remove empty directories, or non-empty ones with -r",
        handler: files::rmdir,
    },
    CommandSpec {
        name: "echo",
        usage: "echo <text> [> file | >> file]",
        summary: "Print text or write it to a file",
        handler: files::echo,
    },
    CommandSpec {
        name: "find",
        usage: "find [-a] <term> [path]",
        summary: "Search entry names below a directory",
        handler: search::find,
    },
    CommandSpec {
        name: "unzip",
        usage: "unzip <archive.zip>",
        summary: "Extract an archive next to itself",
        handler: files::unzip,
    },
    CommandSpec {
        name: "ifconfig",
        usage: "ifconfig",
        summary: "Show this host's address",
        handler: network::ifconfig,
    },
    CommandSpec {
        name: "ssh",
        usage: "ssh <ip>",
        summary: "Log in to a remote host",
        handler: network::ssh,
    },
    CommandSpec {
        name: "download",
        usage: "download <path>",
        summary: "Copy a remote file into ~/Downloads",
        handler: network::download,
    },
    CommandSpec {
        name: "setpasswd",
        usage: "setpasswd <password>",
        summary: "Change this host's password",
        handler: system::setpasswd,
    },
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "List available commands",
        handler: system::help,
    },
    CommandSpec {
        name: "resetgame",
        usage: "resetgame",
        summary: "Delete all saved progress and quit",
        handler: system::resetgame,
    },
    CommandSpec {
        name: "clear",
        usage: "clear",
        summary: "Clear the screen",
        handler: system::clear,
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        summary: "Save and leave the current session",
        handler: system::exit,
    },
];

/// Names of every built-in, in table order (for `/bin`).
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|spec| spec.name)
}

/// Separate `-x` style flags from operands.
pub(crate) fn split_flags<'l>(args: &[&'l str]) -> (Vec<&'l str>, Vec<&'l str>) {
    args.iter()
        .copied()
        .partition(|arg| arg.len() > 1 && arg.starts_with('-'))
}

/// Whether `flag` is one of the recursive-removal spellings.
pub(crate) fn is_recursive_flag(flag: &str) -> bool {
    matches!(flag, "-r" | "-R" | "-rf" | "-fr")
}

/// Apply `op` to each operand on the current host.
///
/// User-facing failures are printed and the next operand is tried; the host
/// is saved once if any operand changed it.
pub(crate) fn for_each_operand<F>(
    ctx: &mut CommandContext<'_>,
    command: &str,
    operands: &[&str],
    mut op: F,
) -> Result<(), ShellError>
where
    F: FnMut(&mut Host, &str) -> Result<(), ShellError>,
{
    let mut changed = false;
    for operand in operands {
        match op(ctx.host_mut(), operand) {
            Ok(()) => changed = true,
            Err(e) if e.is_recoverable() => {
                let message = crate::shell::render_error(command, &e);
                ctx.print(message);
            }
            Err(e) => return Err(e),
        }
    }
    if changed {
        ctx.save()?;
    }
    Ok(())
}
