//! Editing lifecycle of a single inline pull request review comment.
//!
//! [`application::ReviewComment`] owns the comment state machine. It talks to
//! the outside world only through the traits in [`ports`]; [`adapters`] holds
//! in-memory and file-backed implementations of them.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
