//! Article content retrieval through an MCP fetch server, with Tavily extract as fallback.

use async_trait::async_trait;
use hn_digest_core::contract::{ArticleFetcher, CollaboratorError};
use serde::Deserialize;
use serde_json::json;

use crate::http::{HttpClient, HttpError, READ_LONG, READ_SHORT};

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

/// Longest article text requested from the fetch server.
const FETCH_MAX_LENGTH: usize = 50_000;

#[derive(Deserialize)]
struct TavilyExtract {
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    raw_content: String,
}

pub struct WebFetcher {
    http: HttpClient,
    mcp_base_url: String,
    mcp_token: String,
    tavily_base_url: String,
    tavily_api_key: String,
}

impl WebFetcher {
    pub fn new(
        http: HttpClient,
        mcp_base_url: &str,
        mcp_token: &str,
        tavily_base_url: &str,
        tavily_api_key: &str,
    ) -> Self {
        Self {
            http,
            mcp_base_url: mcp_base_url.trim_end_matches('/').to_string(),
            mcp_token: mcp_token.to_string(),
            tavily_base_url: tavily_base_url.trim_end_matches('/').to_string(),
            tavily_api_key: tavily_api_key.to_string(),
        }
    }

    async fn fetch_via_mcp(&self, url: &str) -> Result<String, HttpError> {
        let endpoint = format!("{}/fetch/fetch", self.mcp_base_url);
        let body = json!({
            "max_length": FETCH_MAX_LENGTH,
            "raw": false,
            "start_index": 0,
            "url": url,
        });
        let response = self
            .http
            .send("Fetch", |c| {
                c.post(&endpoint)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .bearer_auth(&self.mcp_token)
                    .json(&body)
                    .timeout(READ_SHORT)
            })
            .await?;
        response.text().await.map_err(|e| HttpError::Decode {
            label: "Fetch".to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch_via_tavily(&self, url: &str) -> Result<String, HttpError> {
        let endpoint = format!("{}/extract", self.tavily_base_url);
        let body = json!({ "urls": [url] });
        let extract: TavilyExtract = self
            .http
            .send_json("Tavily fetch", |c| {
                c.post(&endpoint)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .bearer_auth(&self.tavily_api_key)
                    .json(&body)
                    .timeout(READ_LONG)
            })
            .await?;
        extract
            .results
            .into_iter()
            .next()
            .map(|r| r.raw_content)
            .ok_or_else(|| HttpError::Decode {
                label: "Tavily fetch".to_string(),
                message: "no results".to_string(),
            })
    }
}

#[async_trait]
impl ArticleFetcher for WebFetcher {
    async fn fetch_article(&self, url: &str) -> Result<String, CollaboratorError> {
        match self.fetch_via_mcp(url).await {
            Ok(content) => Ok(content),
            Err(e @ HttpError::Status { .. }) => {
                tracing::info!(url, error = %e, "Attempting fallback...");
                Ok(self.fetch_via_tavily(url).await?)
            }
            Err(e) => Err(e.into()),
        }
    }
}
