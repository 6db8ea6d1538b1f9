pub mod browser;
pub mod comment_thread;
pub mod config_store;
pub mod review_session;

pub use browser::*;
pub use comment_thread::*;
pub use config_store::*;
pub use review_session::*;
