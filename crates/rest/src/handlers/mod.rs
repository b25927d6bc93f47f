//! HTTP request handlers.
//!
//! Handlers are thin: they extract the path id, caller scope and body, then
//! delegate to the [`ResourceController`](crate::controller::ResourceController).
//!
//! - [`search`] - Search for resources
//! - [`read`] - Read a resource by ID
//! - [`update`] - Update (or create) a resource
//! - [`health`] - Health check endpoint

pub mod health;
pub mod read;
pub mod search;
pub mod update;

pub use health::health_handler;
pub use read::read_handler;
pub use search::search_handler;
pub use update::update_handler;
