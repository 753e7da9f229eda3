//! Hacker News access: the aggregated story timeline and raw item pages.

use async_trait::async_trait;
use hn_digest_core::contract::{CollaboratorError, Story, StoryFeed, ThreadSource};
use hn_digest_core::digest::HN_ITEM_BASE_URL;
use serde::Deserialize;

use crate::http::{HttpClient, READ_SHORT};

pub const DEFAULT_FEED_URL: &str =
    "https://api.hcker.news/api/timeline?page=1&sort_by=score&filter=top20&limit=100";

pub const USER_AGENT: &str = "hn-digest-scraper (contact: lab@waffles.space)";

#[derive(Deserialize)]
struct Timeline {
    stories: Vec<Story>,
}

pub struct HackerNewsClient {
    http: HttpClient,
    feed_url: String,
    item_base_url: String,
}

impl HackerNewsClient {
    pub fn new(http: HttpClient) -> Self {
        Self::with_urls(http, DEFAULT_FEED_URL, HN_ITEM_BASE_URL)
    }

    pub fn with_urls(http: HttpClient, feed_url: &str, item_base_url: &str) -> Self {
        Self {
            http,
            feed_url: feed_url.to_string(),
            item_base_url: item_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StoryFeed for HackerNewsClient {
    async fn top_stories(&self) -> Result<Vec<Story>, CollaboratorError> {
        tracing::info!(feed_url = %self.feed_url, "Fetching story timeline");
        let timeline: Timeline = self
            .http
            .send_json("HN stories fetch", |c| c.get(&self.feed_url).timeout(READ_SHORT))
            .await?;
        tracing::info!(count = timeline.stories.len(), "Fetched story timeline");
        Ok(timeline.stories)
    }
}

#[async_trait]
impl ThreadSource for HackerNewsClient {
    async fn fetch_thread(&self, story_id: u64) -> Result<String, CollaboratorError> {
        let url = format!("{}/item?id={}", self.item_base_url, story_id);
        tracing::info!(story_id, url = %url, "Fetching comment thread");
        let response = self
            .http
            .send("HN comments fetch", |c| {
                c.get(&url)
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .timeout(READ_SHORT)
            })
            .await?;
        Ok(response.text().await?)
    }
}
