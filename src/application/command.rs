use tokio::sync::watch;

use super::{CommentError, Operation, OperationFailure};

/// What happened when an operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    /// The gate was closed; nothing ran.
    Skipped,
}

impl Outcome {
    pub fn ran(&self) -> bool {
        !matches!(self, Outcome::Skipped)
    }
}

/// An asynchronous action that can only run once at a time.
///
/// The executing flag is observable so that other gates can depend on it.
#[derive(Debug)]
pub struct AsyncAction {
    executing: watch::Sender<bool>,
}

impl Default for AsyncAction {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncAction {
    pub fn new() -> Self {
        let (executing, _) = watch::channel(false);
        Self { executing }
    }

    pub fn is_executing(&self) -> bool {
        *self.executing.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.executing.subscribe()
    }

    /// Marks the action as running, or returns `None` if it already is.
    pub fn try_begin(&self) -> Option<ExecutionGuard<'_>> {
        let acquired = self.executing.send_if_modified(|running| {
            if *running {
                false
            } else {
                *running = true;
                true
            }
        });

        acquired.then(|| ExecutionGuard {
            executing: &self.executing,
        })
    }
}

/// Clears the executing flag when dropped, whichever way the action ends.
#[derive(Debug)]
pub struct ExecutionGuard<'a> {
    executing: &'a watch::Sender<bool>,
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        self.executing.send_replace(false);
    }
}

/// The "last error" channel shared by every operation on a comment.
#[derive(Debug)]
pub struct ErrorSink {
    last: watch::Sender<Option<OperationFailure>>,
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSink {
    pub fn new() -> Self {
        let (last, _) = watch::channel(None);
        Self { last }
    }

    pub fn report(&self, operation: Operation, error: CommentError) {
        self.last
            .send_replace(Some(OperationFailure { operation, error }));
    }

    pub fn last(&self) -> Option<OperationFailure> {
        self.last.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<OperationFailure>> {
        self.last.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RepositoryError;

    #[test]
    fn test_action_refuses_reentry() {
        let action = AsyncAction::new();
        let guard = action.try_begin();
        assert!(guard.is_some());
        assert!(action.is_executing());
        assert!(action.try_begin().is_none());

        drop(guard);
        assert!(!action.is_executing());
        assert!(action.try_begin().is_some());
    }

    #[test]
    fn test_executing_flag_is_observable() {
        let action = AsyncAction::new();
        let mut rx = action.subscribe();
        assert!(!*rx.borrow_and_update());

        let guard = action.try_begin();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        drop(guard);
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn test_error_sink_keeps_latest_failure() {
        let sink = ErrorSink::new();
        assert_eq!(sink.last(), None);

        sink.report(
            Operation::CommitEdit,
            CommentError::Post(RepositoryError::Network("first".into())),
        );
        sink.report(
            Operation::StartReview,
            CommentError::ReviewStart(RepositoryError::Api("second".into())),
        );

        let last = sink.last().unwrap();
        assert_eq!(last.operation, Operation::StartReview);
        assert_eq!(last.error.to_string(), "second");
        assert_eq!(last.to_string(), "start review failed: second");
    }
}
