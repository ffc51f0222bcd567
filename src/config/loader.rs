//! Configuration file loading with precedence handling.

use crate::store::RetentionPolicy;
use crate::viewer::DEFAULT_MAX_LINE;
use crate::virtual_list::{JumpAlign, DEFAULT_RENDERER_CEILING};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "EXLV_CONFIG";
/// Environment variable overriding `max_line`.
pub const ENV_MAX_LINE: &str = "EXLV_MAX_LINE";
/// Environment variable overriding `follow`.
pub const ENV_FOLLOW: &str = "EXLV_FOLLOW";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Config file exists but could not be read.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file is not valid TOML or has unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unset fields fall back to defaults.
/// Corresponds to `~/.config/exlv/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Start in follow (live-tail) mode.
    #[serde(default)]
    pub follow: Option<bool>,

    /// Ceiling on retained entries.
    #[serde(default)]
    pub max_line: Option<usize>,

    /// Max simultaneously materialized entries.
    #[serde(default)]
    pub renderer_ceiling: Option<usize>,

    /// Extra entries rendered beyond each viewport edge.
    #[serde(default)]
    pub overscan: Option<usize>,

    /// Wrap long log lines.
    #[serde(default)]
    pub line_wrap: Option<bool>,

    /// Show the gutter (line number and metadata columns).
    #[serde(default)]
    pub gutter: Option<bool>,

    /// Show the timestamp column in the gutter.
    #[serde(default)]
    pub time: Option<bool>,

    /// Show the step-context (command) column in the gutter.
    #[serde(default)]
    pub command: Option<bool>,

    /// Show the node column in the gutter.
    #[serde(default)]
    pub node_icon: Option<bool>,

    /// "evict-oldest" or "unbounded".
    #[serde(default)]
    pub retention: Option<RetentionPolicy>,

    /// "center" or "start".
    #[serde(default)]
    pub jump_align: Option<JumpAlign>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Follow mode.
    pub follow: bool,
    /// Retained-entry ceiling.
    pub max_line: usize,
    /// Renderer ceiling.
    pub renderer_ceiling: usize,
    /// Overscan in entries.
    pub overscan: usize,
    /// Line wrapping.
    pub line_wrap: bool,
    /// Gutter shown.
    pub gutter: bool,
    /// Timestamp column shown.
    pub time: bool,
    /// Step-context column shown.
    pub command: bool,
    /// Node column shown.
    pub node_icon: bool,
    /// Retention policy.
    pub retention: RetentionPolicy,
    /// Jump alignment.
    pub jump_align: JumpAlign,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            follow: false,
            max_line: DEFAULT_MAX_LINE,
            renderer_ceiling: DEFAULT_RENDERER_CEILING,
            overscan: 3,
            line_wrap: true,
            gutter: true,
            time: false,
            command: false,
            node_icon: true,
            retention: RetentionPolicy::EvictOldest,
            jump_align: JumpAlign::Center,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/exlv/exlv.log` on Linux, or the platform
/// equivalent. Falls back to the current directory when no state directory
/// exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("exlv").join("exlv.log")
    } else {
        PathBuf::from("exlv.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("exlv").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `EXLV_CONFIG` environment variable
/// 3. Default path `~/.config/exlv/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
/// An empty `EXLV_CONFIG` is an `InvalidPath`.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        if env_path.trim().is_empty() {
            return Err(ConfigError::InvalidPath(format!("{ENV_CONFIG} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        follow: config.follow.unwrap_or(defaults.follow),
        max_line: config.max_line.unwrap_or(defaults.max_line),
        renderer_ceiling: config.renderer_ceiling.unwrap_or(defaults.renderer_ceiling),
        overscan: config.overscan.unwrap_or(defaults.overscan),
        line_wrap: config.line_wrap.unwrap_or(defaults.line_wrap),
        gutter: config.gutter.unwrap_or(defaults.gutter),
        time: config.time.unwrap_or(defaults.time),
        command: config.command.unwrap_or(defaults.command),
        node_icon: config.node_icon.unwrap_or(defaults.node_icon),
        retention: config.retention.unwrap_or(defaults.retention),
        jump_align: config.jump_align.unwrap_or(defaults.jump_align),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `EXLV_MAX_LINE`: non-negative integer
/// - `EXLV_FOLLOW`: `1`/`true`/`yes` or `0`/`false`/`no`
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(ENV_MAX_LINE) {
        match raw.trim().parse::<usize>() {
            Ok(max_line) => config.max_line = max_line,
            Err(err) => warn!(value = %raw, error = %err, "Ignoring invalid {ENV_MAX_LINE}"),
        }
    }

    if let Ok(raw) = std::env::var(ENV_FOLLOW) {
        match parse_flag(&raw) {
            Some(follow) => config.follow = follow,
            None => warn!(value = %raw, "Ignoring invalid {ENV_FOLLOW}"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence. Only flags the user actually set
/// are passed as `Some`.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    follow_override: Option<bool>,
    max_line_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(follow) = follow_override {
        config.follow = follow;
    }

    if let Some(max_line) = max_line_override {
        config.max_line = max_line;
    }

    config
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
