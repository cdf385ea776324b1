//! `wikipush check` command implementation.

use std::path::PathBuf;

use clap::Args;

use wikipush_config::Settings;
use wikipush_confluence::ConfluenceClient;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Sync root directory containing settings.json.
    directory: PathBuf,

    /// Confluence base URL (overrides the settings.json url).
    #[arg(long)]
    base_url: Option<String>,

    /// Confluence username.
    #[arg(long, env = "CONFLUENCE_USER")]
    username: String,

    /// Confluence API token or password.
    #[arg(long, env = "CONFLUENCE_TOKEN", hide_env_values = true)]
    token: String,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL can be resolved or the connection
    /// test fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let base_url = match self.base_url {
            Some(url) => url,
            None => Settings::load(&self.directory)?
                .confluence
                .url
                .ok_or_else(|| {
                    CliError::Validation(
                        "confluence URL required (--base-url or settings.json url)".to_owned(),
                    )
                })?,
        };

        let client = ConfluenceClient::new(&base_url, &self.username, &self.token);
        output.info(&format!("Testing connection to {base_url}..."));

        let user = client.current_user()?;
        output.success(&format!("Connected as {}", user.display_name));
        Ok(())
    }
}
