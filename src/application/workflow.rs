use super::{Outcome, ReviewComment};

/// Writes a new comment into a placeholder and commits it, optionally as the
/// first comment of a new review.
pub async fn compose(comment: &ReviewComment, body: &str, start_review: bool) -> Outcome {
    if comment.begin_edit() == Outcome::Skipped {
        return Outcome::Skipped;
    }
    comment.set_body(body);

    if start_review {
        comment.start_review().await
    } else {
        comment.commit_edit().await
    }
}

/// Replaces the body of an existing comment, then commits or cancels.
///
/// Nothing is touched when the current user may not edit the comment.
pub async fn revise(comment: &ReviewComment, new_body: &str, cancel: bool) -> Outcome {
    if comment.begin_edit() == Outcome::Skipped {
        tracing::info!(
            user = %comment.current_user().login,
            author = %comment.author().login,
            "Not allowed to edit comment"
        );
        return Outcome::Skipped;
    }
    comment.set_body(new_body);

    if cancel {
        comment.cancel_edit()
    } else {
        comment.commit_edit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::browser::ConsoleBrowser;
    use crate::adapters::memory::{InMemorySession, InMemoryThread};
    use crate::application::CommentContext;
    use crate::domain::{CommentId, CommentRecord, EditState, PullRequestRef, User};
    use chrono::Utc;
    use std::sync::Arc;

    fn setup() -> (Arc<InMemoryThread>, CommentContext) {
        let thread = Arc::new(InMemoryThread::new(PullRequestRef::new("octo", "widgets", 3)));
        let context = CommentContext::new(
            User::new("mona"),
            Arc::new(InMemorySession::new()),
            thread.clone(),
            Arc::new(ConsoleBrowser),
        );
        (thread, context)
    }

    fn existing(context: CommentContext, author: &str) -> ReviewComment {
        ReviewComment::from_record(
            context,
            CommentRecord {
                id: CommentId(7),
                body: "original".to_string(),
                author: User::new(author),
                updated_at: Utc::now(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_revise_someone_elses_comment_changes_nothing() {
        let (thread, context) = setup();
        let comment = existing(context, "hubot");
        let before = comment.snapshot();

        assert_eq!(revise(&comment, "hijacked", false).await, Outcome::Skipped);

        assert_eq!(comment.snapshot(), before);
        assert_eq!(comment.id(), CommentId(7));
        assert_eq!(comment.body(), "original");
        assert!(thread.posted().is_empty());
    }

    #[tokio::test]
    async fn test_revise_own_comment_commits() {
        let (thread, context) = setup();
        let comment = existing(context, "mona");

        assert_eq!(revise(&comment, "updated", false).await, Outcome::Completed);

        assert_eq!(comment.body(), "updated");
        assert_eq!(comment.edit_state(), EditState::None);
        assert_eq!(thread.posted().len(), 1);
    }

    #[tokio::test]
    async fn test_revise_then_cancel_restores_body() {
        let (thread, context) = setup();
        let comment = existing(context, "mona");

        assert_eq!(revise(&comment, "draft", true).await, Outcome::Completed);

        assert_eq!(comment.body(), "original");
        assert_eq!(comment.edit_state(), EditState::None);
        assert!(thread.posted().is_empty());
    }

    #[tokio::test]
    async fn test_compose_starts_review() {
        let (thread, context) = setup();
        let comment = ReviewComment::placeholder(context);

        assert_eq!(compose(&comment, "first", true).await, Outcome::Completed);

        assert!(!comment.can_start_review());
        assert_eq!(comment.id(), CommentId(1));
        assert_eq!(thread.posted()[0].body, "first");
    }
}
