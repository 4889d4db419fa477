//! Remote sessions: connecting to another host, leaving it again, and
//! copying files back to the player's machine.

use crate::error::ShellError;
use crate::network::{HostId, Network};
use crate::shell::session::{SessionFrame, SessionStack};
use crate::tree::node::{is_archive_name, unique_name, ZIP_SUFFIX};
use crate::tree::{home_path, path};

/// Directory under the player's home that receives downloads.
pub const DOWNLOADS_DIR: &str = "Downloads";

/// Find the host behind `ip` and make sure it can be entered from here.
pub fn lookup(network: &Network, sessions: &SessionStack, ip: &str) -> Result<HostId, ShellError> {
    let current = sessions
        .current_host()
        .ok_or_else(|| ShellError::SessionState("ssh: no active session".to_string()))?;
    let target = network
        .find_by_ip(ip)
        .ok_or_else(|| ShellError::ConnectionFailed(ip.to_string()))?;
    if target == current {
        return Err(ShellError::SessionState(format!(
            "ssh: {}: you are already on this host",
            ip
        )));
    }
    if sessions.contains(target) {
        return Err(ShellError::SessionState(format!(
            "ssh: {}: a session to this host is already open",
            ip
        )));
    }
    Ok(target)
}

/// Log in on `target` and push a remote frame for it.
pub fn connect(
    network: &mut Network,
    sessions: &mut SessionStack,
    target: HostId,
    username: &str,
    password: &str,
) -> Result<(), ShellError> {
    let origin = sessions
        .current_host()
        .ok_or_else(|| ShellError::SessionState("ssh: no active session".to_string()))?;
    let host = network.host_mut(target);
    if !host.login(username, password) {
        tracing::info!(host = %host.name(), username, "remote login refused");
        return Err(ShellError::AuthenticationFailed);
    }
    host.set_in_ssh_session(true);
    sessions.push_remote(target, origin);
    tracing::info!(host = %network.host(target).name(), depth = sessions.depth(), "remote session opened");
    Ok(())
}

/// Pop the top frame if it is remote, restoring the host it leaves behind.
///
/// The remote host's exit flag and session marker are cleared and its user
/// is logged out.
pub fn disconnect(network: &mut Network, sessions: &mut SessionStack) -> Option<SessionFrame> {
    let frame = sessions.current().filter(|f| f.is_remote())?;
    sessions.pop();
    let host = network.host_mut(frame.host);
    host.take_exit_request();
    host.set_in_ssh_session(false);
    host.logout();
    tracing::info!(host = %host.name(), "remote session closed");
    Some(frame)
}

/// Copy `target` from the remote host into the player's `~/Downloads`.
///
/// Directories arrive as a `<name>.zip` archive; name collisions get a
/// numeric suffix. Returns the absolute destination path on the player host.
pub fn download(network: &mut Network, sessions: &SessionStack, target: &str) -> Result<String, ShellError> {
    let remote_id = match sessions.current() {
        Some(frame) if frame.is_remote() && network.host(frame.host).in_ssh_session() => frame.host,
        _ => {
            return Err(ShellError::SessionState(
                "download: only available during an ssh session".to_string(),
            ))
        }
    };

    let remote = network.host(remote_id);
    let abs = remote.absolute(target);
    let (_, name) = path::split_parent(&abs)
        .ok_or_else(|| ShellError::InvalidTarget("download: cannot download /".to_string()))?;
    let payload = remote.filesystem().resolve("/", &abs)?.clone();
    let desired = if payload.is_dir() && !is_archive_name(&name) {
        format!("{}{}", name, ZIP_SUFFIX)
    } else {
        name
    };

    let player_id = network
        .player()
        .ok_or_else(|| ShellError::SessionState("download: no local host".to_string()))?;
    let player = network.host_mut(player_id);
    let username = player
        .active_user()
        .map(|u| u.username.clone())
        .ok_or_else(|| ShellError::SessionState("download: nobody is logged in locally".to_string()))?;
    let downloads = path::join(&home_path(&username), DOWNLOADS_DIR);
    let dir = player.filesystem_mut().ensure_dir(&downloads)?;
    let stored = unique_name(dir, &desired);
    dir.insert(stored.clone(), payload);
    player.save()?;

    let dest = path::join(&downloads, &stored);
    tracing::info!(from = %abs, to = %dest, "download complete");
    Ok(dest)
}
