//! Run coordinator: drives one synchronization run end to end.
//!
//! A run is single-pass and strictly sequential: later nodes may resolve
//! their ancestor through [`PageMap`] entries written by earlier nodes,
//! so nodes are never reconciled concurrently. Individual failures are
//! recorded and the run continues; the aggregate is converted into an
//! error exactly once, at the run boundary.

use tracing::{error, info};

use crate::error::{ReconcileError, SyncError};
use crate::node::Node;
use crate::reconciler::{BodyRenderer, PageMap, ReconcileConfig, Reconciled, Reconciler};
use crate::sequencer::sequence;
use crate::store::PageStore;

/// Outcome of reconciling one node.
#[derive(Debug)]
pub struct NodeOutcome {
    /// Node identifier within the run.
    pub relative_path: String,
    /// Node title (before prefixing), for reporting.
    pub title: String,
    /// Success or the per-node error.
    pub result: Result<Reconciled, ReconcileError>,
}

impl NodeOutcome {
    /// Whether this node was written successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate result of a run. All nodes are attempted, always.
#[derive(Debug)]
pub struct RunReport {
    outcomes: Vec<NodeOutcome>,
    page_map: PageMap,
}

impl RunReport {
    /// Per-node outcomes in processing order.
    #[must_use]
    pub fn outcomes(&self) -> &[NodeOutcome] {
        &self.outcomes
    }

    /// The page map built during the run.
    #[must_use]
    pub fn page_map(&self) -> &PageMap {
        &self.page_map
    }

    /// Number of successfully written nodes.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed nodes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Total number of nodes attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every node was written successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Failed outcomes, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &NodeOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Convert the aggregate into a run-level result.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::PartialFailure`] when any node failed, even
    /// though every node was attempted.
    pub fn as_result(&self) -> Result<(), SyncError> {
        let failed = self.failure_count();
        if failed > 0 {
            return Err(SyncError::PartialFailure {
                failed,
                total: self.total(),
            });
        }
        Ok(())
    }
}

/// Executes a node sequence through the [`Reconciler`].
pub struct SyncRunner<'a> {
    reconciler: Reconciler<'a>,
}

impl<'a> SyncRunner<'a> {
    /// Create a runner over the given store, renderer and configuration.
    #[must_use]
    pub fn new(
        store: &'a dyn PageStore,
        renderer: &'a dyn BodyRenderer,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(store, renderer, config),
        }
    }

    /// Sequence and reconcile every node, continuing past failures.
    pub fn run(&self, nodes: Vec<Node>) -> RunReport {
        let sequenced = sequence(nodes);
        let mut page_map = PageMap::new();
        let mut outcomes = Vec::with_capacity(sequenced.len());

        for node in sequenced {
            let result = self.reconciler.reconcile(&node, &mut page_map);
            match &result {
                Ok(done) => info!(
                    path = %node.relative_path,
                    page_id = %done.page_id,
                    action = ?done.action,
                    "synced"
                ),
                Err(err) => error!(path = %node.relative_path, %err, "sync failed"),
            }
            outcomes.push(NodeOutcome {
                relative_path: node.relative_path,
                title: node.title,
                result,
            });
        }

        RunReport { outcomes, page_map }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockPageStore;
    use crate::reconciler::WriteAction;

    struct RawBody;

    impl BodyRenderer for RawBody {
        fn render_body(&self, markdown: &str) -> String {
            markdown.to_owned()
        }
    }

    fn config() -> ReconcileConfig {
        ReconcileConfig {
            space: "DOCS".to_owned(),
            title_prefix: String::new(),
            anchor_id: None,
        }
    }

    fn chain() -> Vec<Node> {
        vec![
            Node::file("a/b/c.md", Some("a/b".to_owned()), "C", "# C"),
            Node::folder("a/b", Some("a".to_owned()), "B"),
            Node::folder("a", None, "A"),
        ]
    }

    #[test]
    fn test_run_orders_parents_first() {
        let store = MockPageStore::new();
        let runner = SyncRunner::new(&store, &RawBody, config());

        let report = runner.run(chain());

        let order: Vec<_> = report
            .outcomes()
            .iter()
            .map(|o| o.relative_path.as_str())
            .collect();
        assert_eq!(order, vec!["a", "a/b", "a/b/c.md"]);
        assert!(report.is_success());

        // Hierarchy wired through the page map
        let a = store.page("DOCS", "A").unwrap();
        let b = store.page("DOCS", "B").unwrap();
        let c = store.page("DOCS", "C").unwrap();
        assert_eq!(b.ancestors, vec![a.id]);
        assert_eq!(c.ancestors, vec![b.id]);
    }

    #[test]
    fn test_run_continues_past_failure() {
        let store = MockPageStore::new().with_write_failure("N3");
        let runner = SyncRunner::new(&store, &RawBody, config());
        let nodes = (1..=5)
            .map(|i| Node::file(format!("n{i}.md"), None, format!("N{i}"), ""))
            .collect();

        let report = runner.run(nodes);

        assert_eq!(report.total(), 5);
        assert_eq!(report.success_count(), 4);
        assert_eq!(report.failure_count(), 1);

        for path in ["n1.md", "n2.md", "n4.md", "n5.md"] {
            assert!(report.page_map().contains(path), "{path} should be recorded");
        }
        assert!(!report.page_map().contains("n3.md"));

        let failed: Vec<_> = report.failures().map(|o| o.title.as_str()).collect();
        assert_eq!(failed, vec!["N3"]);
    }

    #[test]
    fn test_run_failed_parent_degrades_children() {
        let store = MockPageStore::new().with_write_failure("B");
        let runner = SyncRunner::new(&store, &RawBody, config());

        let report = runner.run(chain());

        assert_eq!(report.failure_count(), 1);
        // Child of the failed folder is still written, just without an ancestor
        assert!(store.page("DOCS", "C").unwrap().ancestors.is_empty());
    }

    #[test]
    fn test_run_as_result() {
        let store = MockPageStore::new().with_write_failure("Bad");
        let runner = SyncRunner::new(&store, &RawBody, config());
        let nodes = vec![
            Node::file("ok.md", None, "Ok", ""),
            Node::file("bad.md", None, "Bad", ""),
        ];

        let report = runner.run(nodes);
        let err = report.as_result().unwrap_err();

        assert!(matches!(
            err,
            SyncError::PartialFailure { failed: 1, total: 2 }
        ));
    }

    #[test]
    fn test_run_twice_is_idempotent() {
        let store = MockPageStore::new();
        let runner = SyncRunner::new(&store, &RawBody, config());

        let first = runner.run(chain());
        let second = runner.run(chain());

        assert!(first.is_success());
        assert!(second.is_success());
        assert_eq!(store.page_count(), 3);
        assert!(second.outcomes().iter().all(|o| matches!(
            &o.result,
            Ok(done) if done.action == WriteAction::Updated
        )));
    }

    #[test]
    fn test_run_empty_input() {
        let store = MockPageStore::new();
        let runner = SyncRunner::new(&store, &RawBody, config());

        let report = runner.run(Vec::new());

        assert_eq!(report.total(), 0);
        assert!(report.is_success());
        assert!(report.as_result().is_ok());
        assert!(report.page_map().is_empty());
    }
}
