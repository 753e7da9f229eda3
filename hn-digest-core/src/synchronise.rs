//! High-level pipeline: turns the day's top stories into markdown digests in a knowledge base.
//!
//! For each selected story the pipeline:
//!   - fetches the linked article (link posts only)
//!   - fetches the comment thread and rebuilds a bounded reply tree via [`crate::thread`]
//!   - asks the [`Summariser`] for a markdown summary of both
//!   - uploads the digest and attaches it to the [`KnowledgeBase`]
//!
//! # Error Handling
//! Listing the knowledge base or the story feed failing aborts the run. Every
//! per-story step degrades instead: a missing article or comment thread yields
//! an empty section, a failed summary yields a digest without summary, and a
//! failed upload is recorded in the report while the run moves on.

use futures::join;
use tracing::{error, info, warn};

use crate::config::DigestConfig;
use crate::contract::{ArticleFetcher, KnowledgeBase, Story, StoryFeed, Summariser, ThreadSource};
use crate::digest::{digest_filename, hn_item_url, render_comments, render_digest};
use crate::ingest::parse_thread;
use crate::thread::ReconstructPolicy;

/// The collaborators a digest run talks to.
pub struct DigestServices<'a> {
    pub feed: &'a dyn StoryFeed,
    pub threads: &'a dyn ThreadSource,
    pub articles: &'a dyn ArticleFetcher,
    pub summariser: &'a dyn Summariser,
    pub knowledge: &'a dyn KnowledgeBase,
}

#[derive(Debug, Default)]
pub struct DigestReport {
    pub uploaded: Vec<UploadedDigest>,
    /// Filenames already present in the knowledge base.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedDigest>,
}

#[derive(Debug)]
pub struct UploadedDigest {
    pub story_id: u64,
    pub title: String,
    pub filename: String,
    pub file_id: String,
}

#[derive(Debug)]
pub struct FailedDigest {
    pub story_id: u64,
    pub filename: String,
    pub reason: String,
}

/// Stories ranked on the configured day, highest score first, capped at `max_stories`.
pub fn select_stories(config: &DigestConfig, stories: Vec<Story>) -> (usize, Vec<Story>) {
    let day = config.day.format("%Y-%m-%d").to_string();
    let mut todays: Vec<Story> = stories
        .into_iter()
        .filter(|s| s.utc_day.get(..10) == Some(day.as_str()))
        .collect();
    todays.sort_by(|a, b| b.score.cmp(&a.score));
    let total = todays.len();
    todays.truncate(config.max_stories);
    (total, todays)
}

pub async fn synchronise(
    config: &DigestConfig,
    services: &DigestServices<'_>,
) -> Result<DigestReport, String> {
    info!(day = %config.day, "[DIGEST] Starting digest pipeline");

    let existing_files = match services.knowledge.list_files().await {
        Ok(files) => {
            info!(count = files.len(), "[DIGEST] Listed knowledge base files");
            files
        }
        Err(e) => {
            error!(error = ?e, "[DIGEST][ERROR] Failed to list knowledge base files");
            return Err(format!("Failed to list knowledge base files: {e:?}"));
        }
    };

    let stories = match services.feed.top_stories().await {
        Ok(stories) => stories,
        Err(e) => {
            error!(error = ?e, "[DIGEST][ERROR] Failed to fetch story feed");
            return Err(format!("Failed to fetch story feed: {e:?}"));
        }
    };
    let (total, stories) = select_stories(config, stories);
    info!(total, selected = stories.len(), "[DIGEST] Selected stories for the day");

    let mut report = DigestReport::default();

    for (i, story) in stories.iter().enumerate() {
        info!(
            story_id = story.id,
            title = %story.title,
            "[DIGEST] Processing {}/{}",
            i + 1,
            total
        );
        let filename = digest_filename(config.day, story);
        if existing_files.contains(&filename) {
            info!(filename = %filename, "[DIGEST] Skipping already uploaded");
            report.skipped.push(filename);
            continue;
        }

        let hn_link = hn_item_url(story.id);
        let resolved_url = story.url.clone().unwrap_or_else(|| hn_link.clone());

        let (page_content, comments) = join!(
            fetch_article(services.articles, story),
            fetch_comments(services.threads, story.id, &config.thread),
        );

        let summary = if !page_content.is_empty() || !comments.is_empty() {
            info!(url = %resolved_url, "[DIGEST] Generating summary");
            match services
                .summariser
                .summarise(&story.title, &page_content, &comments)
                .await
            {
                Ok(summary) => Some(summary),
                Err(e) => {
                    error!(error = ?e, story_id = story.id, "[DIGEST][ERROR] LLM summary failed");
                    None
                }
            }
        } else {
            warn!(
                story_id = story.id,
                "[DIGEST] Neither article nor comments available, digest has no summary"
            );
            None
        };

        let markdown = render_digest(story, &resolved_url, summary.as_deref());

        info!(filename = %filename, "[DIGEST][UPLOAD] Uploading digest");
        match upload(services.knowledge, &markdown, &filename).await {
            Ok(file_id) => {
                info!(file_id = %file_id, filename = %filename, "[DIGEST][UPLOAD] Digest attached to knowledge base");
                report.uploaded.push(UploadedDigest {
                    story_id: story.id,
                    title: story.title.clone(),
                    filename,
                    file_id,
                });
            }
            Err(reason) => {
                error!(filename = %filename, reason = %reason, "[DIGEST][ERROR][UPLOAD] Knowledge base upload failed");
                report.failed.push(FailedDigest {
                    story_id: story.id,
                    filename,
                    reason,
                });
            }
        }
    }

    info!(
        uploaded = report.uploaded.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "[DIGEST] Digest pipeline finished"
    );
    Ok(report)
}

async fn fetch_article(articles: &dyn ArticleFetcher, story: &Story) -> String {
    let Some(url) = story.url.as_deref() else {
        return String::new();
    };
    info!(url = %url, "[DIGEST] Fetching article content");
    match articles.fetch_article(url).await {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, url = %url, "[DIGEST][ERROR] Article fetch failed");
            String::new()
        }
    }
}

/// Rendered comment list for `story_id`, empty when the thread is unavailable.
async fn fetch_comments(
    threads: &dyn ThreadSource,
    story_id: u64,
    policy: &ReconstructPolicy,
) -> String {
    info!(story_id, "[DIGEST] Fetching comments");
    let html = match threads.fetch_thread(story_id).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = ?e, link = %hn_item_url(story_id), "[DIGEST][ERROR] Comments fetch failed");
            return String::new();
        }
    };
    match parse_thread(&html, policy) {
        Ok(roots) => render_comments(&roots),
        Err(e) => {
            error!(error = ?e, link = %hn_item_url(story_id), "[DIGEST][ERROR] Comments parse failed");
            String::new()
        }
    }
}

async fn upload(
    knowledge: &dyn KnowledgeBase,
    markdown: &str,
    filename: &str,
) -> Result<String, String> {
    let file_id = knowledge
        .upload_markdown(markdown, filename)
        .await
        .map_err(|e| format!("upload failed: {e}"))?;
    knowledge
        .attach_file(&file_id)
        .await
        .map_err(|e| format!("attach failed for file {file_id}: {e}"))?;
    Ok(file_id)
}
