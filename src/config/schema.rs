use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sessions::in_memory::DEFAULT_MAX_PLAYER_NAME_CHARS;

/// Environment variable pointing at the directory holding `config.toml`.
pub const CONFIG_DIR_ENV: &str = "PLANPOKER_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.toml";

// ── Top-level config ──────────────────────────────────────────────

/// Top-level planpoker configuration, loaded from `config.toml`.
///
/// Resolution order: `--config-dir` / `PLANPOKER_CONFIG_DIR` env → `~/.planpoker/config.toml`.
/// A missing file yields defaults; nothing is written back.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// HTTP gateway configuration: host, port, body limit, timeout (`[gateway]`).
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session registry limits (`[sessions]`).
    #[serde(default)]
    pub sessions: SessionsConfig,
}

// ── Gateway ──────────────────────────────────────────────────────

/// Gateway server configuration (`[gateway]` section).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Gateway port (default: 8080)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 0.0.0.0)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Maximum accepted request body size in bytes. Default: `65536`.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Per-request timeout in seconds. Default: `30`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_gateway_host() -> String {
    "0.0.0.0".into()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ── Sessions ─────────────────────────────────────────────────────

/// Session registry configuration (`[sessions]` section).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionsConfig {
    /// Longest accepted player name, counted in characters after trimming. Default: `64`.
    #[serde(default = "default_max_player_name_chars")]
    pub max_player_name_chars: usize,
}

fn default_max_player_name_chars() -> usize {
    DEFAULT_MAX_PLAYER_NAME_CHARS
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_player_name_chars: default_max_player_name_chars(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigResolutionSource {
    CliFlag,
    EnvConfigDir,
    DefaultConfigDir,
}

impl ConfigResolutionSource {
    const fn as_str(self) -> &'static str {
        match self {
            Self::CliFlag => "cli_flag",
            Self::EnvConfigDir => "PLANPOKER_CONFIG_DIR",
            Self::DefaultConfigDir => "default",
        }
    }
}

fn default_config_dir() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".planpoker"))
}

fn resolve_config_dir(cli_dir: Option<&Path>) -> Result<(PathBuf, ConfigResolutionSource)> {
    if let Some(dir) = cli_dir {
        return Ok((dir.to_path_buf(), ConfigResolutionSource::CliFlag));
    }
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok((PathBuf::from(dir), ConfigResolutionSource::EnvConfigDir));
        }
    }
    Ok((default_config_dir()?, ConfigResolutionSource::DefaultConfigDir))
}

impl Config {
    /// Resolve the config directory, read `config.toml` if present, then apply
    /// env overrides and validate.
    pub async fn load(cli_dir: Option<&Path>) -> Result<Self> {
        let (config_dir, source) = resolve_config_dir(cli_dir)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = Self::load_from_path(&config_path).await?;
        config.apply_env_overrides();
        config.validate()?;

        tracing::info!(
            path = %config.config_path.display(),
            source = source.as_str(),
            "Config loaded"
        );
        Ok(config)
    }

    /// Parse the config file at `path`, falling back to defaults when it does not exist.
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate configuration values that would cause runtime failures.
    pub fn validate(&self) -> Result<()> {
        // Gateway
        if self.gateway.host.trim().is_empty() {
            anyhow::bail!("gateway.host must not be empty");
        }
        if self.gateway.max_body_bytes == 0 {
            anyhow::bail!("gateway.max_body_bytes must be greater than 0");
        }
        if self.gateway.request_timeout_secs == 0 {
            anyhow::bail!("gateway.request_timeout_secs must be greater than 0");
        }

        // Sessions
        if self.sessions.max_player_name_chars == 0 {
            anyhow::bail!("sessions.max_player_name_chars must be greater than 0");
        }

        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Gateway port: PLANPOKER_GATEWAY_PORT or PORT
        if let Some(port_str) = var("PLANPOKER_GATEWAY_PORT").or_else(|| var("PORT")) {
            match port_str.trim().parse::<u16>() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(value = %port_str, "Ignoring invalid gateway port override"),
            }
        }

        // Gateway host: PLANPOKER_GATEWAY_HOST or HOST
        if let Some(host) = var("PLANPOKER_GATEWAY_HOST").or_else(|| var("HOST")) {
            if !host.trim().is_empty() {
                self.gateway.host = host;
            }
        }
    }
}
