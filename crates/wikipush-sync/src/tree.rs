//! Tree reader: walks a sync root into a flat node list.
//!
//! Every directory becomes a [`NodeKind::Folder`] node and every `*.md`
//! file a [`NodeKind::File`] node. File titles come from the first H1
//! heading, falling back to the filename with `-`/`_` replaced by spaces;
//! folder titles are derived from the directory name the same way.
//!
//! The read is pure and deterministic (entries sorted by name). Any
//! unreadable directory or file aborts the whole read; no partial tree
//! is ever returned.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ReadError;
use crate::node::Node;

/// Walks a sync root directory into a flat list of [`Node`]s.
pub struct TreeReader {
    root: PathBuf,
    include_root: bool,
    h1_regex: Regex,
}

impl TreeReader {
    /// Create a reader for the given sync root.
    ///
    /// # Panics
    ///
    /// Panics if the internal H1 regex fails to compile. This should never
    /// happen as the regex is a compile-time constant.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_root: false,
            // Regex for extracting first H1 heading
            h1_regex: Regex::new(r"(?m)^#\s+(.+)$").unwrap(),
        }
    }

    /// Emit the sync root itself as a folder node.
    ///
    /// When enabled, every top-level entry is parented to the root node
    /// instead of being a root item. Disabled by default.
    #[must_use]
    pub fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Read the complete node set rooted at the sync root.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] for any unreadable directory or file. The
    /// error is fatal: no partial node list is returned.
    pub fn read(&self) -> Result<Vec<Node>, ReadError> {
        let mut nodes = Vec::new();

        let root_name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        if self.include_root && let Some(name) = root_name {
            nodes.push(Node::folder(name.clone(), None, title_from_name(&name)));
            self.scan_directory(&self.root, Some(&name), &mut nodes)?;
        } else {
            self.scan_directory(&self.root, None, &mut nodes)?;
        }

        Ok(nodes)
    }

    /// Recursively scan one directory, appending nodes for its entries.
    fn scan_directory(
        &self,
        dir: &Path,
        prefix: Option<&str>,
        nodes: &mut Vec<Node>,
    ) -> Result<(), ReadError> {
        let entries = fs::read_dir(dir).map_err(|e| ReadError::new(dir, e))?;
        let mut entries: Vec<_> = entries
            .collect::<Result<_, _>>()
            .map_err(|e| ReadError::new(dir, e))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();

            // Keep .git and friends out of the mirror
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let relative_path = match prefix {
                Some(p) => format!("{p}/{name}"),
                None => name.clone(),
            };

            if path.is_dir() {
                nodes.push(Node::folder(
                    relative_path.clone(),
                    prefix.map(str::to_owned),
                    title_from_name(&name),
                ));
                self.scan_directory(&path, Some(&relative_path), nodes)?;
            } else if let Some(stem) = name.strip_suffix(".md") {
                let content =
                    fs::read_to_string(&path).map_err(|e| ReadError::new(&path, e))?;
                let title = self
                    .extract_title(&content)
                    .unwrap_or_else(|| title_from_name(stem));
                nodes.push(Node::file(
                    relative_path,
                    prefix.map(str::to_owned),
                    title,
                    content,
                ));
            }
        }

        Ok(())
    }

    /// Extract title from the first H1 heading, if any.
    fn extract_title(&self, content: &str) -> Option<String> {
        self.h1_regex
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
    }
}

/// Generate a title from a file or directory name.
fn title_from_name(name: &str) -> String {
    name.replace(['-', '_'], " ")
}
