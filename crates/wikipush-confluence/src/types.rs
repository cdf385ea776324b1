//! Confluence REST API types.

use serde::Deserialize;

/// Confluence page as returned by content endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    /// Version number, monotonically increasing.
    pub number: u32,
}

/// Result envelope of a CQL content search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Matching pages.
    pub results: Vec<Page>,
}

/// Authenticated Confluence user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Display name of the user.
    #[serde(rename = "displayName")]
    pub display_name: String,
}
