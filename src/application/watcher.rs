use tokio::sync::watch;

use super::gate::{Availability, GateInputs};
use crate::domain::{CommentState, User};

/// Follows every signal a comment's gates depend on and reports when the
/// derived [`Availability`] changes.
#[derive(Debug)]
pub struct AvailabilityWatcher {
    state: watch::Receiver<CommentState>,
    pending_review: watch::Receiver<bool>,
    thread_can_post: watch::Receiver<bool>,
    executing: watch::Receiver<bool>,
    current_user: User,
    last: Availability,
}

impl AvailabilityWatcher {
    pub(crate) fn new(
        state: watch::Receiver<CommentState>,
        pending_review: watch::Receiver<bool>,
        thread_can_post: watch::Receiver<bool>,
        executing: watch::Receiver<bool>,
        current_user: User,
    ) -> Self {
        let last = compute(&state, &pending_review, &thread_can_post, &executing, &current_user);
        Self {
            state,
            pending_review,
            thread_can_post,
            executing,
            current_user,
            last,
        }
    }

    pub fn current(&self) -> Availability {
        compute(
            &self.state,
            &self.pending_review,
            &self.thread_can_post,
            &self.executing,
            &self.current_user,
        )
    }

    /// Waits until the availability differs from the last value handed out.
    ///
    /// Returns `None` once any upstream signal has been dropped.
    pub async fn changed(&mut self) -> Option<Availability> {
        loop {
            let result = tokio::select! {
                r = self.state.changed() => r,
                r = self.pending_review.changed() => r,
                r = self.thread_can_post.changed() => r,
                r = self.executing.changed() => r,
            };
            if result.is_err() {
                return None;
            }

            let next = self.current();
            if next != self.last {
                self.last = next.clone();
                return Some(next);
            }
        }
    }
}

fn compute(
    state: &watch::Receiver<CommentState>,
    pending_review: &watch::Receiver<bool>,
    thread_can_post: &watch::Receiver<bool>,
    executing: &watch::Receiver<bool>,
    current_user: &User,
) -> Availability {
    let state = state.borrow();
    Availability::compute(GateInputs {
        state: &state,
        current_user,
        has_pending_review: *pending_review.borrow(),
        thread_can_post: *thread_can_post.borrow(),
        executing: *executing.borrow(),
    })
}
