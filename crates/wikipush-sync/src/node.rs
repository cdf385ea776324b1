//! Synchronization unit: one filesystem entry mapped to one remote page.

/// Kind of filesystem entry a node was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory, mirrored as a placeholder page.
    Folder,
    /// A markdown file, mirrored with its rendered content.
    File,
}

/// One filesystem entry scheduled for synchronization.
///
/// `relative_path` is the unique identifier within a run, `/`-separated
/// and relative to the sync root. `parent_path` references another node's
/// `relative_path`; `None` marks a root item. A `parent_path` that matches
/// no node in the run is treated as absent for ordering and ancestry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Path relative to the sync root (unique per run).
    pub relative_path: String,
    /// Relative path of the containing directory, if any.
    pub parent_path: Option<String>,
    /// Human-readable page title (before prefixing).
    pub title: String,
    /// Folder or file.
    pub kind: NodeKind,
    /// Raw markdown content (files only).
    pub content: Option<String>,
}

impl Node {
    /// Create a folder node.
    #[must_use]
    pub fn folder(
        relative_path: impl Into<String>,
        parent_path: Option<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            parent_path,
            title: title.into(),
            kind: NodeKind::Folder,
            content: None,
        }
    }

    /// Create a file node.
    #[must_use]
    pub fn file(
        relative_path: impl Into<String>,
        parent_path: Option<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            parent_path,
            title: title.into(),
            kind: NodeKind::File,
            content: Some(content.into()),
        }
    }

    /// Nesting depth, measured as the number of path separators.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative_path.matches('/').count()
    }
}
