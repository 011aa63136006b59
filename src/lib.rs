pub mod account;
pub mod auth;
pub mod backend;
pub mod compose;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod header;
pub mod images; // image fetch + avatar cache
pub mod models;
pub mod post;
pub mod posts;
pub mod shell;
pub mod validate;

// Re-export commonly used items for adapters / tests
pub use backend::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use error::ApiError;
pub use shell::{PageContext, Route, Shell};
