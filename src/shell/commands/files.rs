//! File manipulation: mkdir, touch, cat, open, rm, rmdir, echo, unzip

use crate::error::ShellError;
use crate::game_state::GAME_STATES_DIR;
use crate::host::Host;
use crate::shell::commands::{for_each_operand, is_recursive_flag, split_flags};
use crate::shell::context::CommandContext;
use crate::shell::Invocation;
use crate::tree::node::{is_archive_name, unique_name, ZIP_SUFFIX};
use crate::tree::{home_path, path, Directory, FsNode, HOME_DIR, PASSWD_DIR, PASSWD_FILE};

/// Paths under the mission-state directory; never touched by commands.
fn is_reserved(abs: &str) -> bool {
    let states = path::join("/", GAME_STATES_DIR);
    abs == states || abs.starts_with(&format!("{}/", states))
}

/// Paths `rm` and `rmdir` refuse: the root, `/home`, the password file and
/// its directory, mission state, and the home of every account.
fn is_protected(host: &Host, abs: &str) -> bool {
    if abs == "/" || abs == HOME_DIR || abs == PASSWD_DIR || is_reserved(abs) {
        return true;
    }
    if abs == path::join(PASSWD_DIR, PASSWD_FILE) {
        return true;
    }
    host.valid_users()
        .iter()
        .any(|u| home_path(&u.username) == abs)
}

/// Parent directory and entry name for a non-root path.
fn parent_and_name(abs: &str, command: &str) -> Result<(String, String), ShellError> {
    path::split_parent(abs)
        .ok_or_else(|| ShellError::InvalidTarget(format!("{}: /: is the root directory", command)))
}

/// Parent and name for a new entry at `abs`.
///
/// Nothing may be created inside mission state or directly under `/home`,
/// where every entry counts as an account.
fn creatable(abs: &str, command: &str, target: &str) -> Result<(String, String), ShellError> {
    let (parent, name) = parent_and_name(abs, command)?;
    if is_reserved(abs) || parent == HOME_DIR {
        return Err(ShellError::Protected(format!("{}: {}", command, target)));
    }
    Ok((parent, name))
}

fn make_directory(host: &mut Host, target: &str) -> Result<(), ShellError> {
    let abs = host.absolute(target);
    let (parent, name) = creatable(&abs, "mkdir", target)?;
    let dir = host.filesystem_mut().dir_mut(&parent)?;
    if dir.contains_key(&name) {
        return Err(ShellError::AlreadyExists(format!(
            "mkdir: cannot create directory '{}': File exists",
            target
        )));
    }
    dir.insert(name, FsNode::empty_dir());
    Ok(())
}

pub fn mkdir(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    let (flags, operands) = split_flags(&inv.args);
    if !flags.is_empty() || operands.is_empty() {
        return Err(ShellError::Usage("mkdir <dir>..."));
    }
    for_each_operand(ctx, "mkdir", &operands, make_directory)
}

fn touch_file(host: &mut Host, target: &str) -> Result<(), ShellError> {
    let abs = host.absolute(target);
    let (parent, name) = creatable(&abs, "touch", target)?;
    let dir = host.filesystem_mut().dir_mut(&parent)?;
    match dir.get(&name) {
        Some(node) if node.is_dir() => Err(ShellError::InvalidTarget(format!(
            "touch: {}: is a directory",
            target
        ))),
        Some(_) => Err(ShellError::AlreadyExists(format!(
            "touch: {}: file already exists",
            target
        ))),
        None => {
            dir.insert(name, FsNode::Empty);
            Ok(())
        }
    }
}

pub fn touch(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    let (flags, operands) = split_flags(&inv.args);
    if !flags.is_empty() || operands.is_empty() {
        return Err(ShellError::Usage("touch <file>..."));
    }
    for_each_operand(ctx, "touch", &operands, touch_file)
}

/// What a leaf holds, as far as cat and open care.
enum Contents {
    Text(String),
    Frames(Vec<String>),
}

fn read_contents(host: &Host, command: &str, target: &str) -> Result<Contents, ShellError> {
    let abs = host.absolute(target);
    let node = host.filesystem().resolve("/", &abs)?;
    let name = path::split_parent(&abs).map(|(_, n)| n).unwrap_or_default();
    if is_archive_name(&name) {
        return Err(ShellError::InvalidTarget(format!(
            "{}: {}: is a zip archive, use unzip to extract it",
            command, target
        )));
    }
    match node {
        FsNode::Directory(_) => Err(ShellError::InvalidTarget(format!(
            "{}: {}: is a directory",
            command, target
        ))),
        FsNode::Frames(frames) => Ok(Contents::Frames(frames.clone())),
        FsNode::Text(s) if !s.is_empty() => Ok(Contents::Text(s.clone())),
        _ => Err(ShellError::InvalidTarget(format!(
            "{}: {}: not a readable file",
            command, target
        ))),
    }
}

pub fn cat(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() != 1 {
        return Err(ShellError::Usage("cat <file>"));
    }
    let target = inv.args[0];
    match read_contents(ctx.host(), "cat", target)? {
        Contents::Text(text) => {
            ctx.print(text);
            Ok(())
        }
        Contents::Frames(_) => Err(ShellError::InvalidTarget(format!(
            "cat: {}: is a media file, use open to play it",
            target
        ))),
    }
}

pub fn open(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() != 1 {
        return Err(ShellError::Usage("open <file>"));
    }
    match read_contents(ctx.host(), "open", inv.args[0])? {
        Contents::Text(text) => ctx.print(text),
        Contents::Frames(frames) => {
            let fps = ctx.shell.settings().animation_fps;
            tracing::debug!(frames = frames.len(), fps, "playing media");
            ctx.console.play_animation(&frames, fps);
        }
    }
    Ok(())
}

/// Detach `target`, moving the working directory out of it if needed.
fn remove_entry(host: &mut Host, command: &str, target: &str, recursive: bool) -> Result<(), ShellError> {
    let abs = host.absolute(target);
    if is_protected(host, &abs) {
        return Err(ShellError::Protected(format!("{}: {}", command, target)));
    }
    let (parent, name) = parent_and_name(&abs, command)?;
    let node = host.filesystem().resolve("/", &abs)?;
    let is_directory = node.is_dir() && !is_archive_name(&name);

    match (command, is_directory) {
        ("rmdir", false) => {
            return Err(ShellError::InvalidTarget(format!(
                "rmdir: {}: not a directory, use rm instead",
                target
            )))
        }
        (_, true) if !recursive && node.child_count() > 0 => {
            return Err(ShellError::InvalidTarget(format!(
                "{}: {}: directory not empty, use '{} -rf' to remove it",
                command, target, command
            )))
        }
        ("rm", true) if !recursive => {
            return Err(ShellError::InvalidTarget(format!(
                "rm: {}: is a directory, use 'rmdir' or 'rm -r'",
                target
            )))
        }
        _ => {}
    }

    host.filesystem_mut().remove(&abs);
    let cwd = host.current_path();
    if cwd == abs || cwd.starts_with(&format!("{}/", abs)) {
        host.set_current_path(parent);
    }
    tracing::debug!(host = %host.name(), path = %abs, "removed");
    Ok(())
}

fn removal(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>, command: &'static str, usage: &'static str) -> Result<(), ShellError> {
    let (flags, operands) = split_flags(&inv.args);
    if operands.is_empty() || !flags.iter().all(|f| is_recursive_flag(f)) {
        return Err(ShellError::Usage(usage));
    }
    let recursive = !flags.is_empty();
    for_each_operand(ctx, command, &operands, |host, target| {
        remove_entry(host, command, target, recursive)
    })
}

pub fn rm(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    removal(ctx, inv, "rm", "rm [-r] <path>...")
}

pub fn rmdir(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    removal(ctx, inv, "rmdir", "rmdir [-r] <dir>...")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Redirect {
    Overwrite,
    Append,
}

/// Split `text > file` / `text >> file`, ignoring `>` inside quotes.
fn split_redirect(raw: &str) -> (&str, Option<(Redirect, &str)>) {
    let mut quote: Option<char> = None;
    for (idx, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => {
                let rest = &raw[idx + 1..];
                let (mode, file) = match rest.strip_prefix('>') {
                    Some(file) => (Redirect::Append, file),
                    None => (Redirect::Overwrite, rest),
                };
                return (&raw[..idx], Some((mode, file.trim())));
            }
            _ => {}
        }
    }
    (raw, None)
}

/// Strip one pair of matching surrounding quotes.
fn unquote(text: &str) -> &str {
    let text = text.trim();
    for q in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(q) && text.ends_with(q) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn write_text(host: &mut Host, target: &str, text: &str, mode: Redirect) -> Result<(), ShellError> {
    let abs = host.absolute(target);
    let (parent, name) = creatable(&abs, "echo", target)?;
    let dir = host.filesystem_mut().dir_mut(&parent)?;
    let content = match (dir.get(&name), mode) {
        (Some(FsNode::Directory(_)), _) => {
            return Err(ShellError::InvalidTarget(format!("echo: {}: is a directory", target)))
        }
        (Some(FsNode::Frames(_)), Redirect::Append) => {
            return Err(ShellError::InvalidTarget(format!(
                "echo: {}: cannot append text to a media file",
                target
            )))
        }
        (Some(FsNode::Text(old)), Redirect::Append) if !old.is_empty() => format!("{}\n{}", old, text),
        _ => text.to_string(),
    };
    dir.insert(name, FsNode::Text(content));
    Ok(())
}

pub fn echo(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    let (text, redirect) = split_redirect(inv.raw_args);
    let text = unquote(text);
    match redirect {
        None => ctx.print(text),
        Some((_, target)) if unquote(target).is_empty() => {
            return Err(ShellError::Usage("echo <text> [> file | >> file]"))
        }
        Some((mode, target)) => {
            write_text(ctx.host_mut(), unquote(target), text, mode)?;
            ctx.save()?;
        }
    }
    Ok(())
}

pub fn unzip(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    if inv.args.len() != 1 {
        return Err(ShellError::Usage("unzip <archive.zip>"));
    }
    let target = inv.args[0];
    let host = ctx.host_mut();
    let abs = host.absolute(target);
    let (parent, name) = parent_and_name(&abs, "unzip")?;
    if !is_archive_name(&name) {
        return Err(ShellError::InvalidTarget(format!(
            "unzip: {}: not a zip archive",
            target
        )));
    }
    let contents = match host.filesystem().resolve("/", &abs)? {
        FsNode::Directory(d) => d.clone(),
        _ => Directory::new(),
    };
    let dir = host.filesystem_mut().dir_mut(&parent)?;
    let extracted = unique_name(dir, &name[..name.len() - ZIP_SUFFIX.len()]);
    dir.insert(extracted.clone(), FsNode::Directory(contents));
    host.save()?;

    let dest = path::join(&parent, &extracted);
    ctx.print(format!("Extracted {} to {}", target, dest));
    Ok(())
}
