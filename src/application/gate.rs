//! Availability predicates for comment operations.
//!
//! Everything here is a pure function of its inputs. Callers recompute
//! whenever the comment state, the session's pending-review flag, the
//! thread's can-post flag or the executing flag changes.

use serde::Serialize;

use crate::domain::{CommentId, CommentState, EditState, User};

pub const REVIEW_COMMENT_CAPTION: &str = "Add review comment";
pub const SINGLE_COMMENT_CAPTION: &str = "Add a single comment";

pub fn can_begin_edit(state: &CommentState, current_user: &User) -> bool {
    match state.edit_state() {
        EditState::Placeholder => true,
        EditState::None => state.author().is_same_account(current_user),
        EditState::Editing => false,
    }
}

pub fn can_cancel_edit(state: &CommentState, executing: bool) -> bool {
    state.edit_state() == EditState::Editing && !executing
}

pub fn can_commit_edit(state: &CommentState, thread_can_post: bool, executing: bool) -> bool {
    !state.is_read_only() && !state.is_body_blank() && thread_can_post && !executing
}

pub fn can_open_on_github(id: CommentId) -> bool {
    id.is_persisted()
}

pub fn can_start_review(has_pending_review: bool) -> bool {
    !has_pending_review
}

pub fn commit_caption(has_pending_review: bool) -> &'static str {
    if has_pending_review {
        REVIEW_COMMENT_CAPTION
    } else {
        SINGLE_COMMENT_CAPTION
    }
}

/// Snapshot of every input the gates read.
#[derive(Debug, Clone, Copy)]
pub struct GateInputs<'a> {
    pub state: &'a CommentState,
    pub current_user: &'a User,
    pub has_pending_review: bool,
    pub thread_can_post: bool,
    pub executing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub begin_edit: bool,
    pub cancel_edit: bool,
    pub commit_edit: bool,
    /// Start-review shares the commit gate.
    pub start_review: bool,
    pub open_on_github: bool,
    pub can_start_review: bool,
    pub commit_caption: &'static str,
}

impl Availability {
    pub fn compute(inputs: GateInputs<'_>) -> Self {
        let commit_edit = can_commit_edit(inputs.state, inputs.thread_can_post, inputs.executing);
        Self {
            begin_edit: can_begin_edit(inputs.state, inputs.current_user),
            cancel_edit: can_cancel_edit(inputs.state, inputs.executing),
            commit_edit,
            start_review: commit_edit,
            open_on_github: can_open_on_github(inputs.state.id()),
            can_start_review: can_start_review(inputs.has_pending_review),
            commit_caption: commit_caption(inputs.has_pending_review),
        }
    }
}
