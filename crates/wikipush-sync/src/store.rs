//! Remote page store collaborator trait.
//!
//! The synchronization core never talks HTTP itself; it goes through
//! [`PageStore`], which a backend (Confluence, in-memory mock) implements.
//!
//! # Known limitation
//!
//! Lookup is by exact `(space, title)` match. Confluence does not forbid
//! duplicate titles within a space; when duplicates exist the first match
//! wins and the others are never touched.

/// A page already persisted in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    /// Opaque page identifier, stable across updates.
    pub id: String,
    /// Version counter, incremented by every update.
    pub version: u32,
}

/// Error from a remote page store operation.
///
/// Backends stringify their transport errors into this; the reconciler
/// only needs the message for logging and aggregation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    /// Create a store error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Remote hierarchical page store.
///
/// Implementations are expected to be blocking; the run coordinator
/// processes nodes strictly one at a time.
pub trait PageStore {
    /// Find a page by exact `(space, title)` match.
    ///
    /// Returns `None` when no page with that title exists in the space.
    fn find_by_title(&self, space: &str, title: &str) -> Result<Option<RemotePage>, StoreError>;

    /// Create a page, nested under `ancestors` when non-empty.
    fn create(
        &self,
        space: &str,
        title: &str,
        body: &str,
        ancestors: &[String],
    ) -> Result<RemotePage, StoreError>;

    /// Update an existing page.
    ///
    /// Implementations must read the current remote version and submit
    /// version + 1; the caller never supplies a version number.
    fn update(&self, page_id: &str, title: &str, body: &str) -> Result<RemotePage, StoreError>;
}
