use crate::{
    domain::{Login, DEFAULT_HOST},
    ports::{AppConfig, ConfigError, ConfigResult, ConfigStore},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

pub const LOGIN_ENV_VAR: &str = "REVIEW_COMMENT_LOGIN";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    login: Option<String>,
    host: Option<String>,
    owner: Option<String>,
    repository: Option<String>,
    pull_request: Option<u64>,
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self::with_path(
            config_dir.join("review-comment").join("config.json"),
        ))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }

    fn login_from_env() -> Option<Login> {
        std::env::var(LOGIN_ENV_VAR)
            .ok()
            .filter(|login| !login.trim().is_empty())
            .map(Login::from)
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", self.config_path.display());
                return Ok(AppConfig {
                    login: Self::login_from_env(),
                    ..Default::default()
                });
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            // Environment wins over the file
            login: Self::login_from_env().or(config_file.login.map(Login)),
            host: config_file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            owner: config_file.owner.unwrap_or(defaults.owner),
            repository: config_file.repository.unwrap_or(defaults.repository),
            pull_request: config_file.pull_request.unwrap_or(defaults.pull_request),
        })
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let config_file = ConfigFile {
            login: config.login.as_ref().map(|l| l.0.clone()),
            host: Some(config.host.clone()),
            owner: Some(config.owner.clone()),
            repository: Some(config.repository.clone()),
            pull_request: Some(config.pull_request),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}
