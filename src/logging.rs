//! Logging
//!
//! Game events are traced with `tracing`. The subscriber is configured from
//! [`LoggingConfig`] and the `PLANET_LOG*` environment variables. Logs go to
//! a file unless told otherwise so they never interleave with the shell.

use crate::error::ShellError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "hack_the_planet.log";
const ENV_FILTER: &str = "PLANET_LOG";
const ENV_MODULES: &str = "PLANET_LOG_MODULES";
const ENV_FORMAT: &str = "PLANET_LOG_FORMAT";
const ENV_OUTPUT: &str = "PLANET_LOG_OUTPUT";
const ENV_FILE: &str = "PLANET_LOG_FILE";

/// Line format of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ShellError::Config(format!(
                "unknown log format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[serde(rename = "stderr")]
    Stderr,
    #[default]
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    #[serde(rename = "both")]
    Both,
}

impl LogOutput {
    fn uses_file(self) -> bool {
        matches!(self, Self::File | Self::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "file" => Ok(Self::File),
            "file+stderr" => Ok(Self::FileAndStderr),
            "both" => Ok(Self::Both),
            other => Err(ShellError::Config(format!(
                "unknown log output '{}' (expected stdout, stderr, file, file+stderr or both)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::FileAndStderr => "file+stderr",
            Self::Both => "both",
        })
    }
}

/// `[logging]` table of the game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// trace, debug, info, warn, error or off
    pub level: String,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file; the platform state directory when unset
    pub file: Option<PathBuf>,

    /// ANSI colors for text logs on a terminal stream
    pub color: bool,

    /// Per-module levels, e.g. `"hacktheplanet::shell" = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Pick the log file: explicit path, then `PLANET_LOG_FILE`, then the
/// configured path, then `<state dir>/hack_the_planet.log`.
pub fn resolve_log_file_path(
    explicit: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> Result<PathBuf, ShellError> {
    let from_env = std::env::var_os(ENV_FILE).map(PathBuf::from);
    let chosen = [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty());
    match chosen {
        Some(path) => Ok(path),
        None => {
            let dirs = crate::config::project_dirs()?;
            let base = dirs.state_dir().unwrap_or_else(|| dirs.data_dir());
            Ok(base.join(LOG_FILE_NAME))
        }
    }
}

/// Install the global subscriber. Environment variables win over `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ShellError> {
    if !config.enabled {
        Registry::default().with(EnvFilter::new("off")).init();
        return Ok(());
    }

    let filter = env_filter(config)?;
    let format = env_override(ENV_FORMAT)?.unwrap_or(config.format);
    let output = env_override(ENV_OUTPUT)?.unwrap_or(config.output);
    let ansi = config.color && !output.uses_file();
    let writer = make_writer(output, config)?;

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let registry = Registry::default().with(filter);
    match format {
        LogFormat::Json => registry.with(layer.json()).init(),
        LogFormat::Text => registry.with(layer.with_ansi(ansi)).init(),
    }
    tracing::debug!(%format, %output, "logging ready");
    Ok(())
}

fn env_override<T: FromStr<Err = ShellError>>(var: &str) -> Result<Option<T>, ShellError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

fn make_writer(output: LogOutput, config: &LoggingConfig) -> Result<BoxMakeWriter, ShellError> {
    Ok(match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(config)?),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(open_log_file(config)?.and(std::io::stderr))
        }
    })
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, ShellError> {
    let path = resolve_log_file_path(None, config.file.clone())?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| {
            ShellError::Config(format!("cannot create log directory {}: {}", dir.display(), e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ShellError::Config(format!("cannot open log file {}: {}", path.display(), e)))
}

/// `PLANET_LOG` replaces everything; otherwise the configured level plus
/// per-module directives from the config and `PLANET_LOG_MODULES`.
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ShellError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    let mut filter = EnvFilter::new(&config.level);
    for directive in module_directives(config)? {
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn module_directives(config: &LoggingConfig) -> Result<Vec<Directive>, ShellError> {
    let from_env = std::env::var(ENV_MODULES).unwrap_or_default();
    let env_pairs = from_env
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(m, l)| (m.trim(), l.trim()));
    config
        .modules
        .iter()
        .map(|(m, l)| (m.as_str(), l.as_str()))
        .chain(env_pairs)
        .map(|(module, level)| {
            format!("{}={}", module, level)
                .parse::<Directive>()
                .map_err(|e| ShellError::Config(format!("bad log directive for {}: {}", module, e)))
        })
        .collect()
}
