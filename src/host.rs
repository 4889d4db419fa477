//! Simulated machines.
//!
//! A [`Host`] owns one filesystem, its accounts, the active user and the
//! current working directory. It persists its tree through a
//! [`FilesystemStore`] after every change.

use crate::error::{ShellError, StorageError};
use crate::store::FilesystemStore;
use crate::tree::{home_path, path, Filesystem, FsNode, HOME_DIR};
use crate::users::{User, UserDirectory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Static description of a host, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    /// Host name, also used as the save file name
    pub name: String,
    /// Address used by `ssh`
    pub ip: String,
    /// The player's own machine
    #[serde(default)]
    pub is_player: bool,
    /// Account seeded on first start (remote hosts)
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl HostProfile {
    pub fn player(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            is_player: true,
            username: None,
            password: None,
        }
    }

    pub fn remote(
        name: impl Into<String>,
        ip: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            is_player: false,
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// One simulated machine.
pub struct Host {
    profile: HostProfile,
    filesystem: Filesystem,
    users: UserDirectory,
    current_path: String,
    exit_requested: bool,
    in_ssh_session: bool,
    store: Arc<dyn FilesystemStore>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("name", &self.profile.name)
            .field("ip", &self.profile.ip)
            .field("active_user", &self.users.active())
            .field("current_path", &self.current_path)
            .finish()
    }
}

impl Host {
    /// Load the host's saved tree, or build a fresh one.
    ///
    /// A fresh tree gets the base layout with `/bin` listing `commands`. If
    /// the profile carries credentials and the host has no accounts yet, the
    /// account is created (but left logged out). New trees are saved right
    /// away.
    pub fn open<'a>(
        profile: HostProfile,
        store: Arc<dyn FilesystemStore>,
        commands: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ShellError> {
        let (filesystem, fresh) = match store.load(&profile.name)? {
            Some(fs) => (fs, false),
            None => (Filesystem::with_base_structure(commands), true),
        };
        let users = UserDirectory::load(&filesystem);
        let mut host = Self {
            profile,
            filesystem,
            users,
            current_path: HOME_DIR.to_string(),
            exit_requested: false,
            in_ssh_session: false,
            store,
        };

        let seed = match (&host.profile.username, &host.profile.password) {
            (Some(u), Some(p)) if host.users.users().is_empty() => Some((u.clone(), p.clone())),
            _ => None,
        };
        let seeded = seed.is_some();
        if let Some((username, password)) = seed {
            host.users
                .create_user(&mut host.filesystem, &username, &password)?;
            host.users.logout();
            tracing::info!(host = %host.profile.name, %username, "seeded account");
        }
        if fresh || seeded {
            host.save()?;
        }
        tracing::debug!(host = %host.profile.name, ip = %host.profile.ip, fresh, "host ready");
        Ok(host)
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn ip(&self) -> &str {
        &self.profile.ip
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    pub fn is_player(&self) -> bool {
        self.profile.is_player
    }

    pub fn filesystem(&self) -> &Filesystem {
        &self.filesystem
    }

    pub fn filesystem_mut(&mut self) -> &mut Filesystem {
        &mut self.filesystem
    }

    pub fn store(&self) -> &Arc<dyn FilesystemStore> {
        &self.store
    }

    pub fn valid_users(&self) -> &[User] {
        self.users.users()
    }

    pub fn has_users(&self) -> bool {
        !self.users.users().is_empty()
    }

    pub fn active_user(&self) -> Option<&User> {
        self.users.active()
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Set the working directory; `path` must already be normalized.
    pub fn set_current_path(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
    }

    /// Home of the active user, or `/home` when nobody is logged in.
    pub fn home_path(&self) -> String {
        match self.users.active() {
            Some(user) => home_path(&user.username),
            None => HOME_DIR.to_string(),
        }
    }

    /// Shell prompt, e.g. `neo@localhost:/home/neo$ `.
    pub fn prompt(&self) -> String {
        let user = self
            .users
            .active()
            .map(|u| u.username.as_str())
            .unwrap_or("guest");
        format!("{}@{}:{}$ ", user, self.profile.name, self.current_path)
    }

    /// Normalize `target` against the working directory, expanding a
    /// leading `~` to the home directory.
    pub fn absolute(&self, target: &str) -> String {
        match target.strip_prefix('~') {
            Some("") => self.home_path(),
            Some(rest) if rest.starts_with('/') => path::normalize(&self.home_path(), &rest[1..]),
            _ => path::normalize(&self.current_path, target),
        }
    }

    /// Persist the whole tree.
    pub fn save(&self) -> Result<(), StorageError> {
        self.store.save(&self.profile.name, &self.filesystem)
    }

    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if !self.users.login(&self.filesystem, username, password) {
            return false;
        }
        self.current_path = home_path(username);
        tracing::info!(host = %self.profile.name, username, "login");
        true
    }

    /// Create and activate an account, then persist.
    pub fn create_user(&mut self, username: &str, password: &str) -> Result<User, ShellError> {
        let user = self
            .users
            .create_user(&mut self.filesystem, username, password)?;
        self.current_path = home_path(username);
        self.save()?;
        tracing::info!(host = %self.profile.name, username, "account created");
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.users.logout();
        self.current_path = HOME_DIR.to_string();
    }

    /// Replace the host-wide password and persist.
    pub fn set_password(&mut self, password: &str) -> Result<(), ShellError> {
        self.filesystem.set_password(password)?;
        self.users.set_password(password);
        self.save()?;
        Ok(())
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Clear the exit flag, returning whether it was set.
    pub fn take_exit_request(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }

    pub fn in_ssh_session(&self) -> bool {
        self.in_ssh_session
    }

    pub(crate) fn set_in_ssh_session(&mut self, active: bool) {
        self.in_ssh_session = active;
    }

    /// Plant or replace a file without going through the shell.
    pub fn add_file_to_filesystem(
        &mut self,
        dir: &str,
        filename: &str,
        content: FsNode,
    ) -> Result<(), ShellError> {
        self.filesystem.add_file(dir, filename, content)?;
        self.save()?;
        Ok(())
    }

    pub fn is_mission_completed(&self, mission_id: &str) -> bool {
        self.filesystem.game_states().is_completed(mission_id)
    }

    pub fn update_mission_state(&mut self, mission_id: &str, completed: bool) -> Result<(), ShellError> {
        self.filesystem.game_states_mut().set(mission_id, completed)?;
        self.save()?;
        Ok(())
    }

    /// Whether any visible entry below `start` has `term` in its name.
    pub fn find(&self, term: &str, start: &str) -> bool {
        crate::shell::commands::search::find_paths(&self.filesystem, start, term, false)
            .map(|hits| !hits.is_empty())
            .unwrap_or(false)
    }
}
