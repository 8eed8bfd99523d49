use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable holding the upstream API credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable holding the listening port.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub share: ShareConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub default_subject: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama3-8b-8192".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_subject: "Meeting Summary".to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Returns the credential if one is set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Loads the config from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing file yields the defaults. An explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {:?}", path);
                }
                Self::read(path)
            }
            None => Self::load_or_default(default_config_path()),
        }
    }

    /// Reads `candidate` if it exists; otherwise, or without a candidate, uses the defaults.
    pub fn load_or_default(candidate: Option<PathBuf>) -> Result<Self> {
        match candidate {
            Some(config_path) if config_path.exists() => Self::read(&config_path),
            Some(config_path) => {
                info!(
                    "Config file not found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
            None => {
                warn!("Unable to determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn read(config_path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()) {
            debug!("Using upstream API key from {}", API_KEY_ENV);
            self.upstream.api_key = Some(key);
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, port))?;
        }

        Ok(self)
    }

    /// Applies environment overrides from the process environment.
    pub fn with_process_env(self) -> Result<Self> {
        self.with_env(|name| std::env::var(name).ok())
    }

    pub fn validate(&self) -> Result<()> {
        let api_base = Url::parse(self.upstream.api_base.trim()).with_context(|| {
            format!("upstream.api_base is not a valid URL: {:?}", self.upstream.api_base)
        })?;
        if !matches!(api_base.scheme(), "http" | "https") {
            bail!(
                "upstream.api_base must use http or https, got {:?}",
                self.upstream.api_base
            );
        }
        if self.upstream.model.trim().is_empty() {
            bail!("upstream.model must not be empty");
        }
        if self.upstream.timeout_seconds == 0 {
            bail!("upstream.timeout_seconds must be greater than 0");
        }
        Ok(())
    }

    /// Renders the config as TOML with the API key masked.
    pub fn to_masked_toml(&self) -> Result<String> {
        let mut masked = self.clone();
        masked.upstream.api_key = self.upstream.credential().map(mask_secret);
        toml::to_string_pretty(&masked).context("Failed to serialize config")
    }
}

/// `$XDG_CONFIG_HOME/meetbrief/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("meetbrief").join("config.toml"))
}

/// Keeps the first four characters of a secret and hides the rest.
/// Secrets of four characters or fewer are hidden entirely.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        return "****".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}...", visible)
}
