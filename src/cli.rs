//! Command-line entry: argument parsing and game bootstrap.

use crate::config::{ConfigLoader, GameConfig};
use crate::error::ShellError;
use crate::logging::{self, LogFormat, LogOutput};
use crate::network::Network;
use crate::shell::{Console, Shell, ShellSettings};
use crate::store::{FilesystemStore, JsonFileStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Hack The Planet: a terminal hacking game.
#[derive(Parser, Debug)]
#[command(name = "hack-the-planet", version, about)]
pub struct Cli {
    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding saved host filesystems
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Delete all saved progress before starting
    #[arg(long, default_value = "false")]
    pub reset: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long, default_value = "false")]
    pub print_config: bool,

    /// Enable verbose logging (debug level unless --log-level is given)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into a loaded configuration.
    pub fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(dir) = &self.save_dir {
            config.save_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        } else if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(output) = self.log_output {
            config.logging.output = output;
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

/// Resolved configuration plus the save store it points at.
pub struct CliContext {
    config: GameConfig,
    store: Arc<JsonFileStore>,
}

impl CliContext {
    pub fn new(cli: &Cli) -> Result<Self, ShellError> {
        let mut config = match &cli.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        cli.apply_overrides(&mut config);
        Self::from_config(config)
    }

    pub fn from_config(config: GameConfig) -> Result<Self, ShellError> {
        config.validate()?;
        let save_dir = config.resolve_save_dir()?;
        Ok(Self {
            config,
            store: Arc::new(JsonFileStore::new(save_dir)),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub fn init_logging(&self) -> Result<(), ShellError> {
        logging::init_logging(&self.config.logging)
    }

    /// Delete every saved host filesystem.
    pub fn reset(&self) -> Result<usize, ShellError> {
        let removed = self.store.purge()?;
        tracing::warn!(removed, dir = %self.store.root().display(), "saves purged");
        Ok(removed)
    }

    /// Build the shell and open every configured host.
    pub fn build(&self) -> Result<(Shell, Network), ShellError> {
        let shell = Shell::new(ShellSettings {
            animation_fps: self.config.animation_fps,
        });
        let store: Arc<dyn FilesystemStore> = self.store.clone();
        let network = Network::from_profiles(&self.config.ordered_hosts(), store, &shell.command_names())?;
        tracing::info!(
            hosts = network.len(),
            save_dir = %self.store.root().display(),
            "network ready"
        );
        Ok((shell, network))
    }

    /// Build everything and run the interactive loop on `console`.
    pub fn run(&self, console: &mut dyn Console) -> Result<(), ShellError> {
        let (shell, mut network) = self.build()?;
        shell.run(&mut network, console)
    }
}
