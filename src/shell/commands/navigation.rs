//! pwd, ls, cd

use crate::error::{PathError, ShellError};
use crate::shell::commands::split_flags;
use crate::shell::context::CommandContext;
use crate::shell::Invocation;
use crate::tree::node::{is_archive_name, is_hidden_name};
use crate::tree::{path, Directory, EntryKind};
use owo_colors::OwoColorize;

/// One visible entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl ListingEntry {
    /// Colored name: directories blue, archives yellow, files white.
    pub fn render(&self) -> String {
        match self.kind {
            EntryKind::Directory => self.name.blue().to_string(),
            EntryKind::Archive => self.name.yellow().to_string(),
            EntryKind::File => self.name.white().to_string(),
        }
    }
}

/// Entries of `dir` in name order, skipping dot-names unless `show_hidden`.
pub fn list_entries(dir: &Directory, show_hidden: bool) -> Vec<ListingEntry> {
    dir.iter()
        .filter(|(name, _)| show_hidden || !is_hidden_name(name))
        .map(|(name, node)| ListingEntry {
            name: name.clone(),
            kind: node.kind(name),
        })
        .collect()
}

fn last_segment(abs: &str) -> String {
    path::split_parent(abs)
        .map(|(_, name)| name)
        .unwrap_or_else(|| "/".to_string())
}

pub fn pwd(ctx: &mut CommandContext<'_>, _inv: &Invocation<'_>) -> Result<(), ShellError> {
    if ctx.host().active_user().is_none() {
        return Err(ShellError::SessionState("pwd: nobody is logged in".to_string()));
    }
    let cwd = ctx.host().current_path().to_string();
    ctx.print(cwd);
    Ok(())
}

pub fn ls(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    let (flags, operands) = split_flags(&inv.args);
    let mut show_hidden = false;
    for flag in flags {
        match flag {
            "-a" | "-al" | "-la" => show_hidden = true,
            _ => return Err(ShellError::Usage("ls [-a] [path]")),
        }
    }
    if operands.len() > 1 {
        return Err(ShellError::Usage("ls [-a] [path]"));
    }
    let target = operands.first().copied().unwrap_or(".");

    let line = {
        let host = ctx.host();
        let abs = host.absolute(target);
        let node = host.filesystem().resolve("/", &abs)?;
        let name = last_segment(&abs);
        let dir = match node.as_dir() {
            Some(_) if is_archive_name(&name) => {
                return Err(ShellError::InvalidTarget(format!(
                    "ls: {}: is a zip archive, use unzip to extract it",
                    target
                )))
            }
            Some(dir) => dir,
            None => {
                return Err(ShellError::InvalidTarget(format!(
                    "ls: {}: is a file, not a directory",
                    target
                )))
            }
        };
        list_entries(dir, show_hidden)
            .iter()
            .map(ListingEntry::render)
            .collect::<Vec<_>>()
            .join("  ")
    };
    if !line.is_empty() {
        ctx.print(line);
    }
    Ok(())
}

pub fn cd(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() > 1 {
        return Err(ShellError::Usage("cd [path]"));
    }
    let target = inv.args.first().copied().unwrap_or("~");

    let host = ctx.host();
    let dest = host.absolute(target);
    let node = host.filesystem().resolve("/", &dest)?;
    let name = last_segment(&dest);
    if !node.is_dir() {
        return Err(PathError::NotADirectory(name).into());
    }
    if is_archive_name(&name) {
        return Err(ShellError::InvalidTarget(format!(
            "cd: {}: is a zip archive, use unzip first",
            target
        )));
    }
    ctx.host_mut().set_current_path(dest);
    Ok(())
}
