///
/// This module implements the CLI interface for hn-digest: command parsing,
/// argument validation and the async entrypoint.
///
/// All thread reconstruction, rendering and pipeline logic lives in the
/// [`hn-digest-core`] crate. This module wires the network clients to it.
///
/// ## Commands
/// - `comments <STORY_ID>`: print one story's reconstructed comment tree as JSON.
/// - `digest --config <PATH>`: summarise the day's top stories into the knowledge base.
///
/// For programmatic/integration use, call [`run`] with a constructed [`Cli`].
///
/// [`hn-digest-core`]: ../../hn-digest-core/
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hn_digest_core::config::yesterday_utc;
use hn_digest_core::contract::ThreadSource;
use hn_digest_core::digest::to_json;
use hn_digest_core::ingest::parse_thread;
use hn_digest_core::synchronise::{synchronise, DigestServices};
use hn_digest_core::thread::{ReconstructPolicy, DEFAULT_MAX_CHILDREN};
use std::path::PathBuf;

use crate::fetch::WebFetcher;
use crate::hn::HackerNewsClient;
use crate::http::HttpClient;
use crate::llm::LlmClient;
use crate::load_config::load_config;
use crate::upload::OpenWebUiClient;

/// CLI for hn-digest: reconstruct Hacker News threads and publish daily digests.
#[derive(Parser)]
#[clap(
    name = "hn-digest",
    version,
    about = "Reconstruct Hacker News comment threads and publish LLM digests to a knowledge base"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the reconstructed comment tree of one story as JSON
    Comments {
        /// Hacker News item id
        story_id: u64,
        /// Maximum number of roots, and of replies under any comment
        #[clap(long, default_value_t = DEFAULT_MAX_CHILDREN)]
        max_children: usize,
        /// Depths whose comments may receive replies (repeatable; default 0)
        #[clap(long = "collect-depth")]
        collect_depths: Vec<u32>,
        /// Pretty-print the JSON output
        #[clap(long)]
        pretty: bool,
    },
    /// Digest the day's top stories into the knowledge base using the given config file
    Digest {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// UTC day to digest (YYYY-MM-DD); defaults to yesterday
        #[clap(long)]
        day: Option<NaiveDate>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Comments {
            story_id,
            max_children,
            collect_depths,
            pretty,
        } => {
            let collect_depths = if collect_depths.is_empty() {
                vec![0]
            } else {
                collect_depths
            };
            // Validate before any network traffic.
            let policy = ReconstructPolicy::new(max_children, collect_depths)?;
            tracing::info!(command = "comments", story_id, ?policy, "Fetching comment thread");

            let client = HackerNewsClient::new(HttpClient::new());
            let html = client
                .fetch_thread(story_id)
                .await
                .map_err(|e| anyhow::anyhow!("Comments fetch failed for story {story_id}: {e}"))?;
            let roots = parse_thread(&html, &policy)?;
            println!("{}", to_json(&roots, pretty)?);
            Ok(())
        }
        Commands::Digest { config, day } => {
            let config = load_config(config)?;
            let digest_config = config.digest_config(day.unwrap_or_else(yesterday_utc));
            digest_config.trace_loaded();
            tracing::info!(command = "digest", "Starting digest run");

            let http = HttpClient::new();
            let secrets = &config.secrets;
            let hn = HackerNewsClient::with_urls(
                http.clone(),
                &config.endpoints.feed_url,
                hn_digest_core::digest::HN_ITEM_BASE_URL,
            );
            let fetcher = WebFetcher::new(
                http.clone(),
                &format!("http://{}", secrets.mcp_host),
                &secrets.mcp_token,
                &config.endpoints.tavily_url,
                &secrets.tavily_api_key,
            );
            let llm = LlmClient::new(
                http.clone(),
                &format!("http://{}", secrets.litellm_host),
                &secrets.litellm_key,
                &config.endpoints.model,
            );
            let knowledge = OpenWebUiClient::new(
                http,
                &format!("http://{}", secrets.owui_host),
                &secrets.owui_token,
                &secrets.knowledge_id,
            );

            let services = DigestServices {
                feed: &hn,
                threads: &hn,
                articles: &fetcher,
                summariser: &llm,
                knowledge: &knowledge,
            };

            match synchronise(&digest_config, &services).await {
                Ok(report) => {
                    tracing::info!(command = "digest", ?report, "Digest run complete");
                    println!("Digest complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "digest", error = %e, "Digest run failed");
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}
