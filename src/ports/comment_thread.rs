use async_trait::async_trait;
use tokio::sync::watch;

use super::RepositoryResult;
use crate::domain::CommentId;

/// What the thread hands back after persisting a comment.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedComment {
    pub id: CommentId,
    pub body: String,
}

/// The inline thread a comment is posted into.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentThread: Send + Sync {
    async fn post_comment(&self, body: &str) -> RepositoryResult<PostedComment>;

    /// Whether the thread currently accepts new comments.
    fn can_post(&self) -> watch::Receiver<bool>;

    fn comment_url(&self, id: CommentId) -> String;
}
