//! find

use crate::error::{PathError, ShellError};
use crate::shell::commands::split_flags;
use crate::shell::context::CommandContext;
use crate::shell::Invocation;
use crate::tree::node::{is_archive_name, is_hidden_name};
use crate::tree::{path, Directory, Filesystem};

/// Absolute paths below `start` whose entry name contains `term`.
///
/// Results come in depth-first name order; directories get a trailing `/`.
/// Archives are matched by name but never descended into, and dot-names
/// (with everything under them) are skipped unless `show_hidden`.
pub fn find_paths(
    fs: &Filesystem,
    start: &str,
    term: &str,
    show_hidden: bool,
) -> Result<Vec<String>, PathError> {
    let base = path::normalize("/", start);
    let node = fs.resolve("/", &base)?;
    let mut hits = Vec::new();
    if let Some(dir) = node.as_dir() {
        collect(dir, &base, term, show_hidden, &mut hits);
    }
    Ok(hits)
}

fn collect(dir: &Directory, base: &str, term: &str, show_hidden: bool, hits: &mut Vec<String>) {
    for (name, child) in dir {
        if !show_hidden && is_hidden_name(name) {
            continue;
        }
        let full = path::join(base, name);
        let subdir = child.as_dir().filter(|_| !is_archive_name(name));
        if name.contains(term) {
            match subdir {
                Some(_) => hits.push(format!("{}/", full)),
                None => hits.push(full.clone()),
            }
        }
        if let Some(sub) = subdir {
            collect(sub, &full, term, show_hidden, hits);
        }
    }
}

pub fn find(ctx: &mut CommandContext<'_>, inv: &Invocation<'_>) -> Result<(), ShellError> {
    const USAGE: &str = "find [-a] <term> [path]";
    let (flags, operands) = split_flags(&inv.args);
    let mut show_hidden = false;
    for flag in flags {
        match flag {
            "-a" => show_hidden = true,
            _ => return Err(ShellError::Usage(USAGE)),
        }
    }

    let host = ctx.host();
    let (term, start) = match operands.as_slice() {
        [term] => (*term, host.current_path().to_string()),
        [term, dir] => (*term, host.absolute(dir)),
        _ => return Err(ShellError::Usage(USAGE)),
    };
    let hits = find_paths(host.filesystem(), &start, term, show_hidden)?;
    if hits.is_empty() {
        ctx.print(format!("find: no matches for '{}'", term));
    } else {
        ctx.print(hits.join("\n"));
    }
    Ok(())
}
