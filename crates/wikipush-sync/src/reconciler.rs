//! Per-node reconciliation against the remote store.
//!
//! For each node the reconciler decides create-vs-update by title lookup,
//! resolves the ancestor reference through the run-scoped [`PageMap`], and
//! performs the write. Failures are per-node: the caller records them and
//! moves on.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ReconcileError;
use crate::node::{Node, NodeKind};
use crate::store::{PageStore, StoreError};

/// Renders file content into the store's markup format.
///
/// The markdown-to-storage transformation lives outside the core; the
/// reconciler only needs the finished body.
pub trait BodyRenderer {
    /// Render raw markdown into a page body.
    fn render_body(&self, markdown: &str) -> String;
}

/// Run-scoped mapping from node relative path to remote page id.
///
/// Populated as nodes are successfully written; consulted by later nodes
/// in the same run to resolve their ancestor. Discarded at run end.
#[derive(Debug, Default)]
pub struct PageMap(HashMap<String, String>);

impl PageMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the remote id written for a node.
    pub fn record(&mut self, relative_path: impl Into<String>, page_id: impl Into<String>) {
        self.0.insert(relative_path.into(), page_id.into());
    }

    /// Look up the remote id for a node path.
    #[must_use]
    pub fn lookup(&self, relative_path: &str) -> Option<&str> {
        self.0.get(relative_path).map(String::as_str)
    }

    /// Whether a node path has been recorded.
    #[must_use]
    pub fn contains(&self, relative_path: &str) -> bool {
        self.0.contains_key(relative_path)
    }

    /// Number of recorded nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no node has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Configuration for one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Destination space key.
    pub space: String,
    /// Prefix applied to every page title.
    pub title_prefix: String,
    /// External anchor page id for items without an internal parent.
    pub anchor_id: Option<String>,
}

/// Which write the upsert performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    /// No page with the effective title existed; one was created.
    Created,
    /// An existing page was updated in place.
    Updated,
}

/// Successful reconciliation of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Remote page id (stable across updates).
    pub page_id: String,
    /// Create or update.
    pub action: WriteAction,
}

/// Reconciles nodes one at a time against a [`PageStore`].
pub struct Reconciler<'a> {
    store: &'a dyn PageStore,
    renderer: &'a dyn BodyRenderer,
    config: ReconcileConfig,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over the given store and renderer.
    #[must_use]
    pub fn new(
        store: &'a dyn PageStore,
        renderer: &'a dyn BodyRenderer,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    /// Upsert one node, recording its remote id into `page_map` on success.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Lookup`] when the title search fails and
    /// [`ReconcileError::Write`] when the create or update fails. On error
    /// nothing is recorded in `page_map`; children of the failed node fall
    /// back to anchor-or-nothing ancestry.
    pub fn reconcile(
        &self,
        node: &Node,
        page_map: &mut PageMap,
    ) -> Result<Reconciled, ReconcileError> {
        let title = format!("{}{}", self.config.title_prefix, node.title);
        let body = self.render(node);
        let ancestors = self.resolve_ancestors(node, page_map);

        let existing = self
            .store
            .find_by_title(&self.config.space, &title)
            .map_err(|source| ReconcileError::Lookup {
                title: title.clone(),
                source,
            })?;

        let (page, action) = match existing {
            Some(remote) => {
                debug!(path = %node.relative_path, page_id = %remote.id, "updating existing page");
                let page = self
                    .store
                    .update(&remote.id, &title, &body)
                    .map_err(|source| Self::write_error(&title, source))?;
                (page, WriteAction::Updated)
            }
            None => {
                debug!(path = %node.relative_path, "creating page");
                let page = self
                    .store
                    .create(&self.config.space, &title, &body, &ancestors)
                    .map_err(|source| Self::write_error(&title, source))?;
                (page, WriteAction::Created)
            }
        };

        page_map.record(node.relative_path.clone(), page.id.clone());

        Ok(Reconciled {
            page_id: page.id,
            action,
        })
    }

    /// Render the write body for a node.
    fn render(&self, node: &Node) -> String {
        match node.kind {
            NodeKind::Folder => format!("<p>Folder: {}</p>", escape_xml(&node.title)),
            NodeKind::File => self.renderer.render_body(node.content.as_deref().unwrap_or("")),
        }
    }

    /// Resolve the ancestor id list for a node.
    ///
    /// Internal hierarchy wins: a parent written earlier in this run is the
    /// sole ancestor. The external anchor applies only to nodes with no
    /// `parent_path` at all; an orphaned or failed parent yields no
    /// ancestor.
    fn resolve_ancestors(&self, node: &Node, page_map: &PageMap) -> Vec<String> {
        if let Some(parent) = &node.parent_path {
            if let Some(id) = page_map.lookup(parent) {
                return vec![id.to_owned()];
            }
            return Vec::new();
        }

        match &self.config.anchor_id {
            Some(anchor) => vec![anchor.clone()],
            None => Vec::new(),
        }
    }

    fn write_error(title: &str, source: StoreError) -> ReconcileError {
        ReconcileError::Write {
            title: title.to_owned(),
            source,
        }
    }
}

/// Minimal XML escaping for placeholder bodies.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockPageStore;

    /// Passthrough renderer for tests.
    struct RawBody;

    impl BodyRenderer for RawBody {
        fn render_body(&self, markdown: &str) -> String {
            markdown.to_owned()
        }
    }

    fn config(prefix: &str, anchor: Option<&str>) -> ReconcileConfig {
        ReconcileConfig {
            space: "DOCS".to_owned(),
            title_prefix: prefix.to_owned(),
            anchor_id: anchor.map(str::to_owned),
        }
    }

    #[test]
    fn test_reconcile_creates_missing_page() {
        let store = MockPageStore::new();
        let reconciler = Reconciler::new(&store, &RawBody, config("", None));
        let mut page_map = PageMap::new();
        let node = Node::file("guide.md", None, "Guide", "# Guide");

        let result = reconciler.reconcile(&node, &mut page_map).unwrap();

        assert_eq!(result.action, WriteAction::Created);
        assert_eq!(page_map.lookup("guide.md"), Some(result.page_id.as_str()));
        let page = store.page("DOCS", "Guide").unwrap();
        assert_eq!(page.body, "# Guide");
        assert_eq!(page.version, 1);
    }

    #[test]
    fn test_reconcile_twice_updates_with_stable_id() {
        let store = MockPageStore::new();
        let reconciler = Reconciler::new(&store, &RawBody, config("", None));
        let node = Node::file("guide.md", None, "Guide", "# Guide");

        let mut first_map = PageMap::new();
        let first = reconciler.reconcile(&node, &mut first_map).unwrap();

        let mut second_map = PageMap::new();
        let second = reconciler.reconcile(&node, &mut second_map).unwrap();

        assert_eq!(first.action, WriteAction::Created);
        assert_eq!(second.action, WriteAction::Updated);
        assert_eq!(first.page_id, second.page_id);
        assert_eq!(store.page("DOCS", "Guide").unwrap().version, 2);
    }

    #[test]
    fn test_reconcile_applies_title_prefix() {
        let store = MockPageStore::new();
        let reconciler = Reconciler::new(&store, &RawBody, config("[Team] ", None));
        let mut page_map = PageMap::new();
        let node = Node::file("guide.md", None, "Guide", "");

        reconciler.reconcile(&node, &mut page_map).unwrap();

        assert!(store.page("DOCS", "[Team] Guide").is_some());
        assert!(store.page("DOCS", "Guide").is_none());
    }

    #[test]
    fn test_reconcile_internal_parent_wins_over_anchor() {
        let store = MockPageStore::new();
        let reconciler = Reconciler::new(&store, &RawBody, config("", Some("anchor-1")));
        let mut page_map = PageMap::new();

        let parent = Node::folder("ops", None, "ops");
        let child = Node::file("ops/guide.md", Some("ops".to_owned()), "Guide", "");

        let parent_result = reconciler.reconcile(&parent, &mut page_map).unwrap();
        reconciler.reconcile(&child, &mut page_map).unwrap();

        // Root folder hangs off the anchor, child off its folder
        assert_eq!(
            store.page("DOCS", "ops").unwrap().ancestors,
            vec!["anchor-1".to_owned()]
        );
        assert_eq!(
            store.page("DOCS", "Guide").unwrap().ancestors,
            vec![parent_result.page_id]
        );
    }

    #[test]
    fn test_reconcile_orphan_parent_gets_no_ancestor() {
        let store = MockPageStore::new();
        let reconciler = Reconciler::new(&store, &RawBody, config("", Some("anchor-1")));
        let mut page_map = PageMap::new();
        let node = Node::file("lost/guide.md", Some("lost".to_owned()), "Guide", "");

        reconciler.reconcile(&node, &mut page_map).unwrap();

        // Anchor applies only to nodes without a parent_path
        assert!(store.page("DOCS", "Guide").unwrap().ancestors.is_empty());
    }

    #[test]
    fn test_reconcile_folder_body_is_placeholder() {
        let store = MockPageStore::new();
        let reconciler = Reconciler::new(&store, &RawBody, config("", None));
        let mut page_map = PageMap::new();
        let node = Node::folder("notes", None, "release <notes>");

        reconciler.reconcile(&node, &mut page_map).unwrap();

        assert_eq!(
            store.page("DOCS", "release <notes>").unwrap().body,
            "<p>Folder: release &lt;notes&gt;</p>"
        );
    }

    #[test]
    fn test_reconcile_failure_records_nothing() {
        let store = MockPageStore::new().with_write_failure("Guide");
        let reconciler = Reconciler::new(&store, &RawBody, config("", None));
        let mut page_map = PageMap::new();
        let node = Node::file("guide.md", None, "Guide", "");

        let err = reconciler.reconcile(&node, &mut page_map).unwrap_err();

        assert!(matches!(err, ReconcileError::Write { .. }));
        assert!(page_map.is_empty());
    }

    #[test]
    fn test_reconcile_lookup_failure() {
        let store = MockPageStore::new().with_lookup_failure("Guide");
        let reconciler = Reconciler::new(&store, &RawBody, config("", None));
        let mut page_map = PageMap::new();
        let node = Node::file("guide.md", None, "Guide", "");

        let err = reconciler.reconcile(&node, &mut page_map).unwrap_err();

        assert!(matches!(err, ReconcileError::Lookup { .. }));
    }
}
