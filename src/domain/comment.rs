use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, DomainResult, User};

/// Identity of a persisted review comment. `0` means the comment has not been posted yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl CommentId {
    pub const UNSAVED: CommentId = CommentId(0);

    pub fn is_persisted(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommentId {
    fn from(id: u64) -> Self {
        CommentId(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditState {
    /// Saved and not being edited.
    #[default]
    None,
    Editing,
    /// Not created yet; always editable.
    Placeholder,
}

/// A comment as it was loaded from the review thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: CommentId,
    pub body: String,
    pub author: User,
    pub updated_at: DateTime<Utc>,
}

/// Mutable state of a single review comment.
///
/// Every transition keeps `undo_body` present exactly while the comment is
/// [`EditState::Editing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentState {
    id: CommentId,
    body: String,
    edit_state: EditState,
    error_message: Option<String>,
    is_read_only: bool,
    updated_at: DateTime<Utc>,
    author: User,
    #[serde(skip)]
    undo_body: Option<String>,
}

impl CommentState {
    pub fn placeholder(author: User) -> Self {
        Self {
            id: CommentId::UNSAVED,
            body: String::new(),
            edit_state: EditState::Placeholder,
            error_message: None,
            is_read_only: false,
            updated_at: DateTime::<Utc>::MIN_UTC,
            author,
            undo_body: None,
        }
    }

    pub fn from_record(record: CommentRecord) -> DomainResult<Self> {
        if !record.id.is_persisted() {
            return Err(DomainError::InvalidId(format!(
                "persisted comment must have a non-zero id, got {}",
                record.id
            )));
        }
        if record.author.login.0.trim().is_empty() {
            return Err(DomainError::MissingField("author".to_string()));
        }

        Ok(Self {
            id: record.id,
            body: record.body,
            edit_state: EditState::None,
            error_message: None,
            is_read_only: false,
            updated_at: record.updated_at,
            author: record.author,
            undo_body: None,
        })
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.is_read_only
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn undo_body(&self) -> Option<&str> {
        self.undo_body.as_deref()
    }

    pub fn is_body_blank(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Replaces the body unless the comment is read-only. Returns whether the body changed.
    pub fn set_body(&mut self, body: impl Into<String>) -> bool {
        if self.is_read_only {
            return false;
        }
        let body = body.into();
        if body == self.body {
            return false;
        }
        self.body = body;
        true
    }

    pub fn set_read_only(&mut self, read_only: bool) -> bool {
        if self.is_read_only == read_only {
            return false;
        }
        self.is_read_only = read_only;
        true
    }

    /// Enters `Editing`, remembering the current body. Does nothing while already editing.
    pub fn begin_edit(&mut self) -> bool {
        if self.edit_state == EditState::Editing {
            return false;
        }
        self.undo_body = Some(self.body.clone());
        self.edit_state = EditState::Editing;
        true
    }

    /// Restores the body captured by [`begin_edit`](Self::begin_edit).
    ///
    /// A blank restored body always lands in `Placeholder`, even for a comment
    /// that was saved before the edit started.
    pub fn cancel_edit(&mut self) -> bool {
        let Some(undo) = self.undo_body.take() else {
            return false;
        };
        self.body = undo;
        self.error_message = None;
        self.edit_state = if self.is_body_blank() {
            EditState::Placeholder
        } else {
            EditState::None
        };
        true
    }

    pub fn clear_error(&mut self) -> bool {
        self.error_message.take().is_some()
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn mark_committed(&mut self, id: CommentId, at: DateTime<Utc>) {
        self.id = id;
        self.edit_state = EditState::None;
        self.undo_body = None;
        self.updated_at = at;
    }
}
