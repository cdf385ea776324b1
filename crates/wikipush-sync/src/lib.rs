//! Synchronization core for mirroring a markdown tree into a remote
//! hierarchical page store.
//!
//! The pipeline is one-way and single-pass:
//!
//! 1. [`TreeReader`] walks the sync root and produces a flat list of
//!    [`Node`]s carrying parent-relationship metadata.
//! 2. [`sequence`] orders the nodes so every parent precedes its children
//!    (Kahn's algorithm with a depth-sort fallback on cycles).
//! 3. [`Reconciler`] upserts each node against a [`PageStore`], resolving
//!    ancestry through the run-scoped [`PageMap`].
//! 4. [`SyncRunner`] drives the sequence end-to-end, continuing past
//!    per-node failures and aggregating outcomes into a [`RunReport`].
//!
//! The remote store and the body renderer are collaborator traits
//! ([`PageStore`], [`BodyRenderer`]); [`MockPageStore`] provides an
//! in-memory store for tests.

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod node;
mod reconciler;
mod runner;
mod sequencer;
mod store;
mod tree;

pub use error::{ReadError, ReconcileError, SyncError};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPageStore;
pub use node::{Node, NodeKind};
pub use reconciler::{
    BodyRenderer, PageMap, ReconcileConfig, Reconciled, Reconciler, WriteAction,
};
pub use runner::{NodeOutcome, RunReport, SyncRunner};
pub use sequencer::sequence;
pub use store::{PageStore, RemotePage, StoreError};
pub use tree::TreeReader;
