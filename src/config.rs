// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_BASE_URL: &str =
    "https://masar-api-emhwehcgh5a8bwhh.italynorth-01.azurewebsites.net";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            upload_timeout_seconds: DEFAULT_UPLOAD_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_upload_timeout() -> u64 {
    DEFAULT_UPLOAD_TIMEOUT_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    #[serde(default = "default_jobs_path")]
    pub jobs_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".masar/session.toml")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_jobs_path() -> PathBuf {
    PathBuf::from(".masar/jobs.csv")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/tmp/masar-client.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session_path: default_session_path(),
            download_dir: default_download_dir(),
            jobs_path: default_jobs_path(),
            log_path: default_log_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: ClientConfig,
    production: ClientConfig,
}

impl ClientConfig {
    /// Load configuration for the current environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config_path = std::env::var("MASAR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"));

        info!("Loading configuration for environment: {}", environment);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_yaml(&content, &environment)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("MASAR_API_URL") {
            config.api.base_url = url;
        }

        config.resolve_paths()
    }

    fn get_environment() -> String {
        std::env::var("MASAR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Pick the section for `environment` out of a `local:`/`production:` document
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content).context("Invalid configuration")?;

        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn resolve_paths(self) -> Result<Self> {
        Ok(Self {
            session_path: resolve_path(&self.session_path)?,
            download_dir: resolve_path(&self.download_dir)?,
            jobs_path: resolve_path(&self.jobs_path)?,
            log_path: resolve_path(&self.log_path)?,
            api: self.api,
        })
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
