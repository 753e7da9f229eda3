/// `load_config` module: Loads a static YAML config and injects secrets from the environment.
///
/// This module is the only place where untrusted YAML is parsed and mapped to the
/// strongly-typed settings the pipeline runs with.
///
/// # Responsibilities
/// - Parse the YAML file into [`CliConfig`]; every section is optional and defaulted
/// - Validate the thread policy while parsing (a zero `max_children` is rejected)
/// - Read service hosts and credentials from the environment ([`Secrets`])
///
/// # Errors
/// All errors use `anyhow::Error` and name the file or variable at fault.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use hn_digest_core::config::{DigestConfig, DEFAULT_MAX_STORIES};
use hn_digest_core::thread::ReconstructPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::fetch::DEFAULT_TAVILY_URL;
use crate::hn::DEFAULT_FEED_URL;
use crate::llm::DEFAULT_MODEL;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigestSection {
    #[serde(default = "default_max_stories")]
    pub max_stories: usize,
    /// Fixed day to digest; yesterday (UTC) when absent.
    #[serde(default)]
    pub day: Option<NaiveDate>,
}

impl Default for DigestSection {
    fn default() -> Self {
        Self {
            max_stories: DEFAULT_MAX_STORIES,
            day: None,
        }
    }
}

fn default_max_stories() -> usize {
    DEFAULT_MAX_STORIES
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSection {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_tavily_url")]
    pub tavily_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for EndpointSection {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            tavily_url: default_tavily_url(),
            model: default_model(),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_tavily_url() -> String {
    DEFAULT_TAVILY_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Hosts and credentials, never read from the YAML file.
pub struct Secrets {
    pub mcp_host: String,
    pub mcp_token: String,
    pub litellm_host: String,
    pub litellm_key: String,
    pub owui_host: String,
    pub owui_token: String,
    pub knowledge_id: String,
    pub tavily_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("mcp_host", &self.mcp_host)
            .field("litellm_host", &self.litellm_host)
            .field("owui_host", &self.owui_host)
            .field("knowledge_id", &self.knowledge_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct CliConfig {
    pub digest: DigestSection,
    pub thread: ReconstructPolicy,
    pub endpoints: EndpointSection,
    pub secrets: Secrets,
}

impl CliConfig {
    /// Pipeline settings for `day`, or the configured day when set.
    pub fn digest_config(&self, day: NaiveDate) -> DigestConfig {
        DigestConfig {
            day: self.digest.day.unwrap_or(day),
            max_stories: self.digest.max_stories,
            thread: self.thread.clone(),
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(error = ?e, var = name, "Required environment variable not set");
            Err(anyhow::anyhow!("{name} environment variable not set: {e}"))
        }
    }
}

pub fn load_secrets() -> Result<Secrets> {
    let secrets = Secrets {
        mcp_host: require_env("MCP_HOST")?,
        mcp_token: require_env("MCP_TOKEN")?,
        litellm_host: require_env("LITELLM_HOST")?,
        litellm_key: require_env("LITELLM_KEY")?,
        owui_host: require_env("OWUI_HOST")?,
        owui_token: require_env("OWUI_TOKEN")?,
        knowledge_id: require_env("KNOWLEDGE_ID")?,
        tavily_api_key: require_env("TAVILY_API_KEY")?,
    };
    info!(?secrets, "Secrets loaded from environment");
    Ok(secrets)
}

/// Loads a static YAML config file (no secrets) and injects required env vars for secrets.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct RawConfig {
        #[serde(default)]
        digest: DigestSection,
        #[serde(default)]
        thread: ReconstructPolicy,
        #[serde(default)]
        endpoints: EndpointSection,
    }

    // An empty file parses as YAML null; treat it as all defaults.
    let raw: RawConfig = if config_content.trim().is_empty() {
        RawConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    let secrets = load_secrets().context("Failed to load secrets from environment")?;

    info!(
        max_stories = raw.digest.max_stories,
        max_children = raw.thread.max_children(),
        feed_url = %raw.endpoints.feed_url,
        "Config loaded and merged successfully"
    );

    Ok(CliConfig {
        digest: raw.digest,
        thread: raw.thread,
        endpoints: raw.endpoints,
        secrets,
    })
}
