//! `wikipush push` command implementation.

use std::path::PathBuf;

use clap::Args;

use wikipush_config::Settings;
use wikipush_confluence::{ConfluenceClient, StorageRenderer};
use wikipush_sync::{
    Node, NodeKind, ReconcileConfig, RunReport, SyncRunner, TreeReader, sequence,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the push command.
#[derive(Args)]
pub(crate) struct PushArgs {
    /// Sync root directory containing markdown files and settings.json.
    directory: PathBuf,

    /// Confluence base URL (overrides the settings.json url).
    #[arg(long)]
    base_url: Option<String>,

    /// Confluence username.
    #[arg(long, env = "CONFLUENCE_USER")]
    username: Option<String>,

    /// Confluence API token or password.
    #[arg(long, env = "CONFLUENCE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Mirror the sync root itself as a folder page.
    #[arg(long)]
    include_root: bool,

    /// Print the ordered plan without contacting Confluence.
    #[arg(long)]
    dry_run: bool,
}

impl PushArgs {
    /// Execute the push command.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or tree cannot be read, the
    /// connection test fails, or any node fails to sync.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = Settings::load(&self.directory)?;
        output.info(&format!("Space: {}", settings.confluence.space));

        let nodes = TreeReader::new(&self.directory)
            .include_root(self.include_root)
            .read()?;

        let files = nodes.iter().filter(|n| n.kind == NodeKind::File).count();
        let folders = nodes.len() - files;
        output.info(&format!(
            "Found {files} markdown file(s) and {folders} folder(s)"
        ));

        if self.dry_run {
            print_plan(&output, sequence(nodes));
            return Ok(());
        }

        let client = self.connect(&settings, &output)?;

        let config = ReconcileConfig {
            space: settings.confluence.space.clone(),
            title_prefix: settings.page_prefix().to_owned(),
            anchor_id: settings.parent_page_id().map(str::to_owned),
        };
        match settings.parent_page_id() {
            Some(id) => output.info(&format!("Nesting root items under page {id}")),
            None => output.info("Creating root items at space top level"),
        }

        let runner = SyncRunner::new(&client, &StorageRenderer, config);
        let report = runner.run(nodes);

        print_report(&output, &report);
        report.as_result()?;

        output.success("\nSync completed successfully!");
        Ok(())
    }

    /// Build the client and verify the connection before any write.
    fn connect(&self, settings: &Settings, output: &Output) -> Result<ConfluenceClient, CliError> {
        let base_url = self
            .base_url
            .clone()
            .or_else(|| settings.confluence.url.clone())
            .ok_or_else(|| {
                CliError::Validation(
                    "confluence URL required (--base-url or settings.json url)".to_owned(),
                )
            })?;
        let username = self.username.as_deref().ok_or_else(|| {
            CliError::Validation("username required (--username or CONFLUENCE_USER)".to_owned())
        })?;
        let token = self.token.as_deref().ok_or_else(|| {
            CliError::Validation("token required (--token or CONFLUENCE_TOKEN)".to_owned())
        })?;

        let client = ConfluenceClient::new(&base_url, username, token);

        output.info(&format!("Testing connection to {base_url}..."));
        if !client.test_connection() {
            return Err(CliError::Validation(
                "could not connect to Confluence".to_owned(),
            ));
        }

        Ok(client)
    }
}

/// Print the sequenced plan without touching the remote store.
fn print_plan(output: &Output, sequenced: Vec<Node>) {
    output.highlight("\n[DRY RUN] Planned order, no changes made:");
    for node in &sequenced {
        output.info(&plan_line(node));
    }
}

fn plan_line(node: &Node) -> String {
    let kind = match node.kind {
        NodeKind::Folder => "folder",
        NodeKind::File => "file",
    };
    format!("  {kind:6} {} -> \"{}\"", node.relative_path, node.title)
}

/// Print per-failure details and the run summary.
fn print_report(output: &Output, report: &RunReport) {
    for outcome in report.failures() {
        if let Err(err) = &outcome.result {
            output.warning(&format!("  Failed: {} ({err})", outcome.relative_path));
        }
    }

    output.info("\nSync summary:");
    output.info(&format!("  Successful: {}", report.success_count()));
    output.info(&format!("  Failed:     {}", report.failure_count()));
    output.info(&format!("  Total:      {}", report.total()));
}
