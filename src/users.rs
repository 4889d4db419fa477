//! Accounts on a host.
//!
//! Users are not stored separately: every entry under `/home` is a user and
//! all of them share the host-wide password in `/etc/.passwd`.

use crate::error::ShellError;
use crate::tree::Filesystem;

/// A (username, password) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Derive the valid users of a host from its filesystem.
pub fn load_valid_users(fs: &Filesystem) -> Vec<User> {
    let password = fs.password();
    fs.home_entries()
        .into_iter()
        .map(|name| User::new(name, password))
        .collect()
}

/// Whether `username` can be used as a home directory name.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username != "."
        && username != ".."
        && !username.contains('/')
        && !username.chars().any(char::is_whitespace)
}

/// The known users of one host and which of them is logged in.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
    active: Option<User>,
}

impl UserDirectory {
    pub fn load(fs: &Filesystem) -> Self {
        Self {
            users: load_valid_users(fs),
            active: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn active(&self) -> Option<&User> {
        self.active.as_ref()
    }

    pub fn exists(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
    }

    /// Check credentials against the host password and activate on success.
    pub fn login(&mut self, fs: &Filesystem, username: &str, password: &str) -> bool {
        if !self.exists(username) || fs.password() != password {
            tracing::debug!(username, "login rejected");
            return false;
        }
        self.active = Some(User::new(username, password));
        true
    }

    /// Create an account, make it active, and set the host password.
    pub fn create_user(
        &mut self,
        fs: &mut Filesystem,
        username: &str,
        password: &str,
    ) -> Result<User, ShellError> {
        if !is_valid_username(username) {
            return Err(ShellError::InvalidTarget(format!(
                "'{}' is not a valid username",
                username
            )));
        }
        if self.exists(username) {
            return Err(ShellError::AlreadyExists(format!(
                "User {} already exists",
                username
            )));
        }
        fs.set_password(password)?;
        fs.create_home(username)?;
        // the password is host-wide, so every account picks up the new one
        for user in &mut self.users {
            user.password = password.to_string();
        }
        let user = User::new(username, password);
        self.users.push(user.clone());
        self.active = Some(user.clone());
        Ok(user)
    }

    /// Apply a new host-wide password to every known account.
    pub fn set_password(&mut self, password: &str) {
        for user in &mut self.users {
            user.password = password.to_string();
        }
        if let Some(active) = &mut self.active {
            active.password = password.to_string();
        }
    }

    pub fn logout(&mut self) {
        self.active = None;
    }
}
