//! Confluence REST API client.
//!
//! Sync HTTP client for the Confluence Server/Data Center REST API with
//! basic (username + API token) authentication. Implements
//! [`wikipush_sync::PageStore`] so the synchronization core can write
//! through it.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, info};
use ureq::Agent;

use wikipush_sync::{PageStore, RemotePage, StoreError};

use crate::error::ConfluenceError;
use crate::types::{Page, SearchResults, User};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create a client with basic authentication.
    ///
    /// `token` is an API token or password; it is only ever sent in the
    /// `Authorization` header.
    #[must_use]
    pub fn new(base_url: &str, username: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let credentials = BASE64.encode(format!("{username}:{token}"));

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// Fetch the authenticated user.
    pub fn current_user(&self) -> Result<User, ConfluenceError> {
        let url = format!("{}/user/current", self.api_url());

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        parse_response(response)
    }

    /// Probe the connection, logging the outcome.
    ///
    /// Returns `true` when the API answered with a valid user.
    pub fn test_connection(&self) -> bool {
        match self.current_user() {
            Ok(user) => {
                info!("Connected to Confluence as {}", user.display_name);
                true
            }
            Err(err) => {
                error!("Failed to connect to Confluence: {err}");
                false
            }
        }
    }

    /// Find a page by exact title within a space.
    ///
    /// Duplicate titles are undefined upstream; the first match wins.
    pub fn find_page(&self, space: &str, title: &str) -> Result<Option<Page>, ConfluenceError> {
        let url = format!("{}/content/search", self.api_url());
        let cql = format!(r#"space="{space}" and title="{title}""#);

        let response = self
            .agent
            .get(&url)
            .query("cql", &cql)
            .query("expand", "version")
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let results: SearchResults = parse_response(response)?;
        Ok(results.results.into_iter().next())
    }

    /// Create a page, nested under `ancestors` when non-empty.
    pub fn create_page(
        &self,
        space: &str,
        title: &str,
        body: &str,
        ancestors: &[String],
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": space},
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            }
        });

        if !ancestors.is_empty() {
            let refs: Vec<_> = ancestors.iter().map(|id| json!({"id": id})).collect();
            payload["ancestors"] = json!(refs);
        }

        info!("Creating page \"{title}\" in space {space}");

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        parse_response(response)
    }

    /// Update an existing page.
    ///
    /// Reads the current remote version and submits version + 1; the
    /// caller never supplies a version number.
    pub fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Page, ConfluenceError> {
        let current = self.get_page(page_id, &["version"])?;
        let next_version = current.version.number + 1;

        let url = format!("{}/content/{}", self.api_url(), page_id);

        let payload = json!({
            "id": page_id,
            "type": "page",
            "title": title,
            "version": {"number": next_version},
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            }
        });

        info!(
            "Updating page {} from version {} to {}",
            page_id, current.version.number, next_version
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        parse_response(response)
    }

    /// Get page by ID with optional field expansion.
    fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError> {
        let mut url = format!("{}/content/{}", self.api_url(), page_id);

        if !expand.is_empty() {
            url.push_str("?expand=");
            url.push_str(&expand.join(","));
        }

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        parse_response(response)
    }
}

/// Check status and deserialize a JSON response body.
fn parse_response<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_string());
        return Err(ConfluenceError::Http {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}

impl PageStore for ConfluenceClient {
    fn find_by_title(&self, space: &str, title: &str) -> Result<Option<RemotePage>, StoreError> {
        let found = self
            .find_page(space, title)
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(found.map(|page| RemotePage {
            id: page.id,
            version: page.version.number,
        }))
    }

    fn create(
        &self,
        space: &str,
        title: &str,
        body: &str,
        ancestors: &[String],
    ) -> Result<RemotePage, StoreError> {
        let page = self
            .create_page(space, title, body, ancestors)
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(RemotePage {
            id: page.id,
            version: page.version.number,
        })
    }

    fn update(&self, page_id: &str, title: &str, body: &str) -> Result<RemotePage, StoreError> {
        let page = self
            .update_page(page_id, title, body)
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(RemotePage {
            id: page.id,
            version: page.version.number,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ConfluenceClient::new("https://wiki.example.com/", "user", "token");
        assert_eq!(client.base_url(), "https://wiki.example.com");
        assert_eq!(client.api_url(), "https://wiki.example.com/rest/api");
    }

    #[test]
    fn test_auth_header_is_basic() {
        let client = ConfluenceClient::new("https://wiki.example.com", "user", "token");
        // base64("user:token")
        assert_eq!(client.auth_header, "Basic dXNlcjp0b2tlbg==");
    }
}
