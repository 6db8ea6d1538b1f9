pub mod comment;
pub mod error;
pub mod pull_request;
pub mod user;

pub use comment::*;
pub use error::*;
pub use pull_request::*;
pub use user::*;
