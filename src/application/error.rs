use crate::domain::DomainError;
use crate::ports::{BrowserError, ConfigError, RepositoryError};
use std::fmt;
use thiserror::Error;

/// Failure of a single comment operation. Always local to one attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommentError {
    #[error("{0}")]
    Post(RepositoryError),

    #[error("{0}")]
    ReviewStart(RepositoryError),

    #[error(transparent)]
    Open(#[from] BrowserError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    BeginEdit,
    CancelEdit,
    CommitEdit,
    StartReview,
    OpenOnGitHub,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::BeginEdit => "begin edit",
            Operation::CancelEdit => "cancel edit",
            Operation::CommitEdit => "commit edit",
            Operation::StartReview => "start review",
            Operation::OpenOnGitHub => "open on GitHub",
        };
        f.write_str(name)
    }
}

/// An entry on a comment's shared "last error" channel.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed: {error}")]
pub struct OperationFailure {
    pub operation: Operation,
    pub error: CommentError,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid comment: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Login not configured")]
    LoginNotConfigured,
}
