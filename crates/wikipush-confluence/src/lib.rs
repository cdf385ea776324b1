//! Confluence backend for wikipush.
//!
//! Provides the sync HTTP client for the Confluence Server/Data Center
//! REST API with basic authentication, the markdown-to-storage-format
//! renderer, and the [`wikipush_sync::PageStore`] implementation the
//! synchronization core writes through.

mod client;
mod error;
mod storage;
mod types;

pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use storage::{StorageRenderer, markdown_to_storage};
pub use types::{Page, SearchResults, User, Version};
