//! In-memory page store for testing.
//!
//! Stores pages keyed by `(space, title)` and hands out sequential ids.
//! Builder methods inject per-title failures to exercise the
//! continue-on-failure path without a network.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::store::{PageStore, RemotePage, StoreError};

/// A page held by the mock store, with everything tests assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPage {
    /// Assigned page id.
    pub id: String,
    /// Version, starting at 1 and bumped by every update.
    pub version: u32,
    /// Last written body.
    pub body: String,
    /// Ancestor ids supplied at creation.
    pub ancestors: Vec<String>,
}

/// In-memory [`PageStore`] for tests.
///
/// # Example
///
/// ```ignore
/// use wikipush_sync::{MockPageStore, PageStore};
///
/// let store = MockPageStore::new().with_write_failure("Flaky Page");
/// let page = store.create("DOCS", "Guide", "<p>hi</p>", &[])?;
/// assert_eq!(store.page("DOCS", "Guide").unwrap().id, page.id);
/// ```
#[derive(Debug, Default)]
pub struct MockPageStore {
    pages: RwLock<HashMap<(String, String), MockPage>>,
    next_id: RwLock<u64>,
    lookup_failures: HashSet<String>,
    write_failures: HashSet<String>,
}

impl MockPageStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every lookup for the given title.
    #[must_use]
    pub fn with_lookup_failure(mut self, title: impl Into<String>) -> Self {
        self.lookup_failures.insert(title.into());
        self
    }

    /// Fail every create/update for the given title.
    #[must_use]
    pub fn with_write_failure(mut self, title: impl Into<String>) -> Self {
        self.write_failures.insert(title.into());
        self
    }

    /// Seed an existing page, as if created by an earlier run.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, space: impl Into<String>, title: impl Into<String>) -> Self {
        let id = self.assign_id();
        self.pages.write().unwrap().insert(
            (space.into(), title.into()),
            MockPage {
                id,
                version: 1,
                body: String::new(),
                ancestors: Vec::new(),
            },
        );
        self
    }

    /// Fetch a stored page for assertions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page(&self, space: &str, title: &str) -> Option<MockPage> {
        self.pages
            .read()
            .unwrap()
            .get(&(space.to_owned(), title.to_owned()))
            .cloned()
    }

    /// Number of stored pages.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    fn assign_id(&self) -> String {
        let mut next = self.next_id.write().unwrap();
        *next += 1;
        format!("page-{next}")
    }
}

impl PageStore for MockPageStore {
    fn find_by_title(&self, space: &str, title: &str) -> Result<Option<RemotePage>, StoreError> {
        if self.lookup_failures.contains(title) {
            return Err(StoreError::new(format!("injected lookup failure: {title}")));
        }
        Ok(self.page(space, title).map(|p| RemotePage {
            id: p.id,
            version: p.version,
        }))
    }

    fn create(
        &self,
        space: &str,
        title: &str,
        body: &str,
        ancestors: &[String],
    ) -> Result<RemotePage, StoreError> {
        if self.write_failures.contains(title) {
            return Err(StoreError::new(format!("injected write failure: {title}")));
        }
        let id = self.assign_id();
        self.pages.write().unwrap().insert(
            (space.to_owned(), title.to_owned()),
            MockPage {
                id: id.clone(),
                version: 1,
                body: body.to_owned(),
                ancestors: ancestors.to_vec(),
            },
        );
        Ok(RemotePage { id, version: 1 })
    }

    fn update(&self, page_id: &str, title: &str, body: &str) -> Result<RemotePage, StoreError> {
        if self.write_failures.contains(title) {
            return Err(StoreError::new(format!("injected write failure: {title}")));
        }
        let mut pages = self.pages.write().unwrap();
        let page = pages
            .values_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| StoreError::new(format!("no such page: {page_id}")))?;

        // Version bump happens store-side, mirroring the real backend
        page.version += 1;
        page.body = body.to_owned();
        Ok(RemotePage {
            id: page.id.clone(),
            version: page.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_create_then_find() {
        let store = MockPageStore::new();

        let created = store.create("DOCS", "Guide", "<p>hi</p>", &[]).unwrap();
        let found = store.find_by_title("DOCS", "Guide").unwrap().unwrap();

        assert_eq!(found, created);
    }

    #[test]
    fn test_update_bumps_version() {
        let store = MockPageStore::new();
        let created = store.create("DOCS", "Guide", "v1", &[]).unwrap();

        let updated = store.update(&created.id, "Guide", "v2").unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.version, 2);
        assert_eq!(store.page("DOCS", "Guide").unwrap().body, "v2");
    }

    #[test]
    fn test_find_in_other_space_misses() {
        let store = MockPageStore::new().with_page("DOCS", "Guide");

        assert!(store.find_by_title("OPS", "Guide").unwrap().is_none());
    }

    #[test]
    fn test_injected_failures() {
        let store = MockPageStore::new()
            .with_lookup_failure("A")
            .with_write_failure("B");

        assert!(store.find_by_title("DOCS", "A").is_err());
        assert!(store.create("DOCS", "B", "", &[]).is_err());
        assert!(store.find_by_title("DOCS", "B").unwrap().is_none());
    }
}
