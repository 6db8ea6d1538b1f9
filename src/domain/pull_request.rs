use serde::{Deserialize, Serialize};
use std::fmt;

use super::CommentId;

pub const DEFAULT_HOST: &str = "https://github.com";

/// Identifies the pull request a review thread belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub host: String,
    pub owner: String,
    pub repository: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>, number: u64) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            owner: owner.into(),
            repository: repository.into(),
            number,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Web URL of a review comment on this pull request.
    pub fn comment_url(&self, id: CommentId) -> String {
        format!(
            "{}/{}/{}/pull/{}#discussion_r{}",
            self.host.trim_end_matches('/'),
            self.owner,
            self.repository,
            self.number,
            id
        )
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_url() {
        let pr = PullRequestRef::new("octo", "widgets", 7);
        assert_eq!(
            pr.comment_url(CommentId(42)),
            "https://github.com/octo/widgets/pull/7#discussion_r42"
        );

        let enterprise = pr.with_host("https://git.example.com/");
        assert_eq!(
            enterprise.comment_url(CommentId(1)),
            "https://git.example.com/octo/widgets/pull/7#discussion_r1"
        );
    }
}
