use crate::domain::{Login, PullRequestRef, DEFAULT_HOST};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(String),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub login: Option<Login>,
    pub host: String,
    pub owner: String,
    pub repository: String,
    pub pull_request: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            login: None,
            host: DEFAULT_HOST.to_string(),
            owner: "octocat".to_string(),
            repository: "hello-world".to_string(),
            pull_request: 1,
        }
    }
}

impl AppConfig {
    pub fn pull_request_ref(&self) -> PullRequestRef {
        PullRequestRef::new(&self.owner, &self.repository, self.pull_request)
            .with_host(&self.host)
    }
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_config(&self) -> ConfigResult<AppConfig>;
    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()>;
}
