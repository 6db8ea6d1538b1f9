use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Errors raised by the remote review service.
///
/// `Display` is the bare message so it can be shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Api(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// The pull request review session shared by every comment in a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSession: Send + Sync {
    /// Whether a review has been started but not yet submitted.
    fn has_pending_review(&self) -> watch::Receiver<bool>;

    async fn start_review(&self) -> RepositoryResult<()>;
}
