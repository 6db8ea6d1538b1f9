use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to open {url}: {reason}")]
pub struct BrowserError {
    pub url: String,
    pub reason: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait Browser: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), BrowserError>;
}
