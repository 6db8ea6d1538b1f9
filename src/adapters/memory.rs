use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{watch, RwLock};

use crate::domain::{CommentId, PullRequestRef};
use crate::ports::{
    CommentThread, PostedComment, RepositoryError, RepositoryResult, ReviewSession,
};

/// Review session kept entirely in memory.
pub struct InMemorySession {
    pending: watch::Sender<bool>,
    fail_next: RwLock<Option<RepositoryError>>,
    started: AtomicUsize,
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::with_pending_review(false)
    }

    pub fn with_pending_review(pending: bool) -> Self {
        let (pending, _) = watch::channel(pending);
        Self {
            pending,
            fail_next: RwLock::new(None),
            started: AtomicUsize::new(0),
        }
    }

    pub fn has_pending(&self) -> bool {
        *self.pending.borrow()
    }

    /// Submits the pending review, if any.
    pub fn submit_review(&self) {
        if self.pending.send_replace(false) {
            tracing::info!("Pending review submitted");
        }
    }

    /// Makes the next `start_review` call fail with `error`.
    pub async fn fail_next(&self, error: RepositoryError) {
        *self.fail_next.write().await = Some(error);
    }

    pub fn start_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewSession for InMemorySession {
    fn has_pending_review(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    async fn start_review(&self) -> RepositoryResult<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_next.write().await.take() {
            return Err(error);
        }
        if self.has_pending() {
            return Err(RepositoryError::Api(
                "A pending review is already underway".to_string(),
            ));
        }

        self.pending.send_replace(true);
        tracing::info!("Review started");
        Ok(())
    }
}

/// Review thread kept entirely in memory. Ids are handed out from 1 upwards.
pub struct InMemoryThread {
    pull_request: PullRequestRef,
    comments: DashMap<CommentId, PostedComment>,
    next_id: AtomicU64,
    can_post: watch::Sender<bool>,
    fail_next: RwLock<Option<RepositoryError>>,
}

impl InMemoryThread {
    pub fn new(pull_request: PullRequestRef) -> Self {
        let (can_post, _) = watch::channel(true);
        Self {
            pull_request,
            comments: DashMap::new(),
            next_id: AtomicU64::new(1),
            can_post,
            fail_next: RwLock::new(None),
        }
    }

    pub fn set_can_post(&self, can_post: bool) {
        self.can_post.send_replace(can_post);
    }

    pub async fn fail_next(&self, error: RepositoryError) {
        *self.fail_next.write().await = Some(error);
    }

    pub fn get(&self, id: CommentId) -> Option<PostedComment> {
        self.comments.get(&id).map(|entry| entry.value().clone())
    }

    /// Posted comments in the order they were created.
    pub fn posted(&self) -> Vec<PostedComment> {
        let mut posted: Vec<_> = self
            .comments
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        posted.sort_by_key(|comment| comment.id.0);
        posted
    }
}

#[async_trait]
impl CommentThread for InMemoryThread {
    async fn post_comment(&self, body: &str) -> RepositoryResult<PostedComment> {
        if let Some(error) = self.fail_next.write().await.take() {
            return Err(error);
        }
        if !*self.can_post.borrow() {
            return Err(RepositoryError::Api(
                "Thread is not accepting comments".to_string(),
            ));
        }

        let id = CommentId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let posted = PostedComment {
            id,
            body: body.to_string(),
        };
        self.comments.insert(id, posted.clone());
        tracing::debug!(%id, pull_request = %self.pull_request, "Stored comment");
        Ok(posted)
    }

    fn can_post(&self) -> watch::Receiver<bool> {
        self.can_post.subscribe()
    }

    fn comment_url(&self, id: CommentId) -> String {
        self.pull_request.comment_url(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::browser::ConsoleBrowser;
    use crate::application::{CommentContext, Outcome, ReviewComment};
    use crate::domain::{EditState, User};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_session_start_and_submit() {
        let session = InMemorySession::new();
        let rx = session.has_pending_review();
        assert!(!*rx.borrow());

        session.start_review().await.unwrap();
        assert!(*rx.borrow());
        assert!(session.start_review().await.is_err());

        session.submit_review();
        assert!(!*rx.borrow());
        assert_eq!(session.start_count(), 2);
    }

    #[tokio::test]
    async fn test_session_fail_next_only_once() {
        let session = InMemorySession::new();
        session
            .fail_next(RepositoryError::Network("offline".into()))
            .await;

        let err = session.start_review().await.unwrap_err();
        assert_eq!(err.to_string(), "offline");
        assert!(!session.has_pending());

        session.start_review().await.unwrap();
        assert!(session.has_pending());
    }

    #[tokio::test]
    async fn test_thread_assigns_ids() {
        let thread = InMemoryThread::new(PullRequestRef::new("octo", "widgets", 3));
        let first = thread.post_comment("one").await.unwrap();
        let second = thread.post_comment("two").await.unwrap();

        assert_eq!(first.id, CommentId(1));
        assert_eq!(second.id, CommentId(2));
        assert_eq!(thread.get(CommentId(2)).unwrap().body, "two");
        assert_eq!(
            thread.posted().iter().map(|c| c.body.as_str()).collect::<Vec<_>>(),
            vec!["one", "two"]
        );
        assert_eq!(
            thread.comment_url(first.id),
            "https://github.com/octo/widgets/pull/3#discussion_r1"
        );
    }

    #[tokio::test]
    async fn test_thread_refuses_when_closed() {
        let thread = InMemoryThread::new(PullRequestRef::new("octo", "widgets", 3));
        let rx = thread.can_post();
        thread.set_can_post(false);
        assert!(!*rx.borrow());
        assert!(thread.post_comment("late").await.is_err());
        assert!(thread.posted().is_empty());
    }

    #[tokio::test]
    async fn test_comments_sharing_a_session_converge() {
        let session = Arc::new(InMemorySession::new());
        let thread = Arc::new(InMemoryThread::new(PullRequestRef::new("octo", "widgets", 3)));
        let context = CommentContext::new(
            User::new("mona"),
            session.clone(),
            thread.clone(),
            Arc::new(ConsoleBrowser),
        );
        let first = ReviewComment::placeholder(context.clone());
        let second = ReviewComment::placeholder(context);
        assert!(first.can_start_review() && second.can_start_review());

        first.begin_edit();
        first.set_body("opening the review");
        assert_eq!(first.start_review().await, Outcome::Completed);

        assert!(!first.can_start_review());
        assert!(!second.can_start_review());
        assert_eq!(second.commit_caption(), "Add review comment");

        second.begin_edit();
        second.set_body("second comment");
        assert_eq!(second.start_review().await, Outcome::Failed);
        assert_eq!(
            second.error_message().as_deref(),
            Some("A pending review is already underway")
        );
        assert_eq!(second.commit_edit().await, Outcome::Completed);
        assert_eq!(second.edit_state(), EditState::None);
        assert_eq!(thread.posted().len(), 2);

        session.submit_review();
        assert!(first.can_start_review() && second.can_start_review());
    }

    #[tokio::test]
    async fn test_thread_failure_surfaces_on_comment() {
        let session = Arc::new(InMemorySession::new());
        let thread = Arc::new(InMemoryThread::new(PullRequestRef::new("octo", "widgets", 3)));
        thread
            .fail_next(RepositoryError::Network("network down".into()))
            .await;
        let comment = ReviewComment::placeholder(CommentContext::new(
            User::new("mona"),
            session,
            thread.clone(),
            Arc::new(ConsoleBrowser),
        ));

        comment.begin_edit();
        comment.set_body("hello");
        assert_eq!(comment.commit_edit().await, Outcome::Failed);
        assert_eq!(comment.error_message().as_deref(), Some("network down"));
        assert!(thread.posted().is_empty());
    }
}
