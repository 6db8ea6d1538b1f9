pub mod command;
pub mod error;
pub mod gate;
pub mod review_comment;
pub mod watcher;
pub mod workflow;

pub use command::{AsyncAction, ErrorSink, Outcome};
pub use error::*;
pub use gate::Availability;
pub use review_comment::*;
pub use watcher::AvailabilityWatcher;
