use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{Instrument, Span};

use super::command::{AsyncAction, ErrorSink, Outcome};
use super::gate::{self, Availability, GateInputs};
use super::watcher::AvailabilityWatcher;
use super::{CommentError, Operation, OperationFailure};
use crate::domain::{CommentId, CommentRecord, CommentState, DomainResult, EditState, User};
use crate::ports::{Browser, CommentThread, ReviewSession};

/// Everything a comment needs from the outside world.
#[derive(Clone)]
pub struct CommentContext {
    pub current_user: User,
    pub session: Arc<dyn ReviewSession>,
    pub thread: Arc<dyn CommentThread>,
    pub browser: Arc<dyn Browser>,
    /// Span all of the comment's log events are recorded in.
    pub span: Span,
}

impl CommentContext {
    pub fn new(
        current_user: User,
        session: Arc<dyn ReviewSession>,
        thread: Arc<dyn CommentThread>,
        browser: Arc<dyn Browser>,
    ) -> Self {
        let span = tracing::info_span!(
            "review_comment",
            user = %current_user.login,
            comment_id = tracing::field::Empty,
        );
        Self {
            current_user,
            session,
            thread,
            browser,
            span,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// A single inline review comment and the operations a user can run on it.
///
/// Operations never return errors: a closed gate makes them a no-op
/// ([`Outcome::Skipped`]) and failures are recorded on the comment itself
/// and on the shared last-error channel.
pub struct ReviewComment {
    state: watch::Sender<CommentState>,
    current_user: User,
    session: Arc<dyn ReviewSession>,
    thread: Arc<dyn CommentThread>,
    browser: Arc<dyn Browser>,
    pending_review: watch::Receiver<bool>,
    thread_can_post: watch::Receiver<bool>,
    commit: AsyncAction,
    errors: ErrorSink,
    span: Span,
}

impl ReviewComment {
    /// A not-yet-created comment authored by the current user.
    pub fn placeholder(context: CommentContext) -> Self {
        let state = CommentState::placeholder(context.current_user.clone());
        Self::with_state(context, state)
    }

    pub fn from_record(context: CommentContext, record: CommentRecord) -> DomainResult<Self> {
        let state = CommentState::from_record(record)?;
        Ok(Self::with_state(context, state))
    }

    fn with_state(context: CommentContext, state: CommentState) -> Self {
        let CommentContext {
            current_user,
            session,
            thread,
            browser,
            span,
        } = context;

        span.record("comment_id", state.id().0);
        let pending_review = session.has_pending_review();
        let thread_can_post = thread.can_post();
        let (state, _) = watch::channel(state);

        Self {
            state,
            current_user,
            session,
            thread,
            browser,
            pending_review,
            thread_can_post,
            commit: AsyncAction::new(),
            errors: ErrorSink::new(),
            span,
        }
    }

    pub fn id(&self) -> CommentId {
        self.state.borrow().id()
    }

    pub fn body(&self) -> String {
        self.state.borrow().body().to_string()
    }

    pub fn edit_state(&self) -> EditState {
        self.state.borrow().edit_state()
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error_message().map(str::to_string)
    }

    pub fn is_read_only(&self) -> bool {
        self.state.borrow().is_read_only()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.borrow().updated_at()
    }

    pub fn author(&self) -> User {
        self.state.borrow().author().clone()
    }

    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    /// Copy of the whole comment state.
    pub fn snapshot(&self) -> CommentState {
        self.state.borrow().clone()
    }

    /// Observe every state change (body, edit state, error, id, timestamp).
    pub fn subscribe(&self) -> watch::Receiver<CommentState> {
        self.state.subscribe()
    }

    pub fn can_start_review(&self) -> bool {
        gate::can_start_review(*self.pending_review.borrow())
    }

    pub fn commit_caption(&self) -> &'static str {
        gate::commit_caption(*self.pending_review.borrow())
    }

    pub fn is_executing(&self) -> bool {
        self.commit.is_executing()
    }

    pub fn availability(&self) -> Availability {
        let state = self.state.borrow();
        Availability::compute(GateInputs {
            state: &state,
            current_user: &self.current_user,
            has_pending_review: *self.pending_review.borrow(),
            thread_can_post: *self.thread_can_post.borrow(),
            executing: self.commit.is_executing(),
        })
    }

    pub fn watch_availability(&self) -> AvailabilityWatcher {
        AvailabilityWatcher::new(
            self.state.subscribe(),
            self.pending_review.clone(),
            self.thread_can_post.clone(),
            self.commit.subscribe(),
            self.current_user.clone(),
        )
    }

    pub fn last_error(&self) -> Option<OperationFailure> {
        self.errors.last()
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<OperationFailure>> {
        self.errors.subscribe()
    }

    /// Replaces the body. Ignored while the comment is read-only.
    pub fn set_body(&self, body: impl Into<String>) -> bool {
        let body = body.into();
        self.state.send_if_modified(|state| state.set_body(body))
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.state
            .send_if_modified(|state| state.set_read_only(read_only));
    }

    pub fn begin_edit(&self) -> Outcome {
        let _entered = self.span.enter();
        let began = self.state.send_if_modified(|state| {
            gate::can_begin_edit(state, &self.current_user) && state.begin_edit()
        });

        if began {
            tracing::debug!("Began editing");
            Outcome::Completed
        } else {
            tracing::trace!("Begin edit skipped");
            Outcome::Skipped
        }
    }

    pub fn cancel_edit(&self) -> Outcome {
        let _entered = self.span.enter();
        let executing = self.commit.is_executing();
        let cancelled = self.state.send_if_modified(|state| {
            gate::can_cancel_edit(state, executing) && state.cancel_edit()
        });

        if cancelled {
            tracing::debug!(edit_state = ?self.edit_state(), "Cancelled editing");
            Outcome::Completed
        } else {
            tracing::trace!("Cancel edit skipped");
            Outcome::Skipped
        }
    }

    pub async fn commit_edit(&self) -> Outcome {
        async {
            let Some(_guard) = self.commit.try_begin() else {
                tracing::debug!("Commit already in flight");
                return Outcome::Skipped;
            };
            if !self.commit_gate_open() {
                tracing::trace!("Commit skipped");
                return Outcome::Skipped;
            }

            self.post_body(Operation::CommitEdit).await
        }
        .instrument(self.span.clone())
        .await
    }

    /// Starts a pending review on the session, then commits this comment into it.
    pub async fn start_review(&self) -> Outcome {
        async {
            let Some(_guard) = self.commit.try_begin() else {
                tracing::debug!("Commit already in flight");
                return Outcome::Skipped;
            };
            if !self.commit_gate_open() {
                tracing::trace!("Start review skipped");
                return Outcome::Skipped;
            }

            self.state.send_if_modified(CommentState::clear_error);
            if let Err(e) = self.session.start_review().await {
                tracing::warn!(error = %e, "Failed to start review");
                let message = e.to_string();
                self.state.send_modify(|state| state.fail(message));
                self.errors
                    .report(Operation::StartReview, CommentError::ReviewStart(e));
                return Outcome::Failed;
            }
            tracing::info!("Review started");

            self.post_body(Operation::StartReview).await
        }
        .instrument(self.span.clone())
        .await
    }

    pub fn open_on_github(&self) -> Outcome {
        let _entered = self.span.enter();
        let id = self.id();
        if !gate::can_open_on_github(id) {
            tracing::trace!("Open skipped for unsaved comment");
            return Outcome::Skipped;
        }

        let url = self.thread.comment_url(id);
        match self.browser.open_url(&url) {
            Ok(()) => {
                tracing::debug!(%url, "Opened comment in browser");
                Outcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open comment in browser");
                self.errors
                    .report(Operation::OpenOnGitHub, CommentError::Open(e));
                Outcome::Failed
            }
        }
    }

    fn commit_gate_open(&self) -> bool {
        let state = self.state.borrow();
        // The caller already holds the executing flag
        gate::can_commit_edit(&state, *self.thread_can_post.borrow(), false)
    }

    async fn post_body(&self, operation: Operation) -> Outcome {
        self.state.send_if_modified(CommentState::clear_error);
        let body = self.body();

        match self.thread.post_comment(&body).await {
            Ok(posted) => {
                self.state
                    .send_modify(|state| state.mark_committed(posted.id, Utc::now()));
                self.span.record("comment_id", posted.id.0);
                tracing::info!(id = %posted.id, "Comment posted");
                Outcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to post comment");
                let message = e.to_string();
                self.state.send_modify(|state| state.fail(message));
                self.errors.report(operation, CommentError::Post(e));
                Outcome::Failed
            }
        }
    }
}
