//! Game configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `PLANET_*` environment variables (`__` separates nested keys,
//! e.g. `PLANET_LOGGING__LEVEL=debug`).

use crate::error::ShellError;
use crate::host::HostProfile;
use crate::logging::LoggingConfig;
use crate::shell::DEFAULT_ANIMATION_FPS;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hack_the_planet";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Where host filesystems are saved; platform data dir when unset
    #[serde(default)]
    pub save_dir: Option<PathBuf>,

    /// Frame rate for media files opened with `open`
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,

    /// Hosts on the network; the one marked `is_player` comes first
    #[serde(default = "default_hosts")]
    pub hosts: Vec<HostProfile>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_animation_fps() -> u32 {
    DEFAULT_ANIMATION_FPS
}

/// The game's stock network.
pub fn default_hosts() -> Vec<HostProfile> {
    vec![
        HostProfile::player("localhost", "127.0.0.1"),
        HostProfile::remote("gibson", "18.127.11.23", "admin", "god"),
        HostProfile::remote("microsoft", "18.23.123.11", "root", "M$FT"),
        HostProfile::remote("apple", "182.124.12.132", "apple", "M@c1nt0sh"),
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_dir: None,
            animation_fps: default_animation_fps(),
            hosts: default_hosts(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ShellError> {
        if self.animation_fps == 0 {
            return Err(ShellError::Config(
                "animation_fps must be greater than zero".to_string(),
            ));
        }
        let players = self.hosts.iter().filter(|h| h.is_player).count();
        if players != 1 {
            return Err(ShellError::Config(format!(
                "exactly one host must be marked is_player (found {})",
                players
            )));
        }
        for host in self.hosts.iter().filter(|h| !h.is_player) {
            if host.username.is_none() || host.password.is_none() {
                return Err(ShellError::Config(format!(
                    "remote host {} needs a username and password",
                    host.name
                )));
            }
        }
        Ok(())
    }

    /// Hosts with the player first, in configured order otherwise.
    pub fn ordered_hosts(&self) -> Vec<HostProfile> {
        let mut hosts = self.hosts.clone();
        hosts.sort_by_key(|h| !h.is_player);
        hosts
    }

    /// The configured save directory, or the platform data directory.
    pub fn resolve_save_dir(&self) -> Result<PathBuf, ShellError> {
        match &self.save_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.clone()),
            _ => project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
        }
    }

    /// Render as TOML, e.g. to seed a config file.
    pub fn to_toml(&self) -> Result<String, ShellError> {
        toml::to_string_pretty(self).map_err(|e| ShellError::Config(e.to_string()))
    }
}

pub(crate) fn project_dirs() -> Result<directories::ProjectDirs, ShellError> {
    directories::ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
        ShellError::Config("Could not determine platform directories (HOME not set)".to_string())
    })
}

/// Default config file location: `<config_dir>/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs()
        .ok()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the default file location (if present) and environment.
    pub fn load() -> Result<GameConfig, ConfigError> {
        let builder = Config::builder();
        let builder = match default_config_path() {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(false)),
            None => builder,
        };
        Self::finish(builder)
    }

    /// Load from a specific file, which must exist, plus environment.
    pub fn load_from_file(path: &Path) -> Result<GameConfig, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml).required(true));
        Self::finish(builder)
    }

    /// Parse a TOML document, without the environment overlay.
    pub fn load_from_str(toml: &str) -> Result<GameConfig, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<GameConfig, ConfigError> {
        let builder = builder.add_source(
            Environment::with_prefix("PLANET")
                .separator("__")
                .try_parsing(true),
        );
        builder.build()?.try_deserialize()
    }
}
