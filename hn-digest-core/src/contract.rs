//! # contract: interfaces to the digest pipeline's external collaborators
//!
//! The pipeline in [`crate::synchronise`] never talks to the network itself. It
//! drives five collaborators through the traits below:
//!
//! - [`StoryFeed`]: ranked stories of the day
//! - [`ThreadSource`]: the raw item page holding a story's comment thread
//! - [`ArticleFetcher`]: readable text of the linked article
//! - [`Summariser`]: an LLM turning title, article and comments into markdown
//! - [`KnowledgeBase`]: the knowledge store the digests are uploaded to
//!
//! All methods are async and return boxed `Send + Sync` errors. Real clients
//! live in the `hn-digest` crate; tests use the `mockall` mocks generated here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::automock;

/// Error type shared by all collaborator traits.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// A story as listed by the aggregated timeline feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    /// External link; `None` for text posts (Ask HN and friends).
    #[serde(default)]
    pub url: Option<String>,
    pub score: i64,
    /// Timestamp of the story's ranking day; only the leading `YYYY-MM-DD` is used.
    pub utc_day: String,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StoryFeed: Send + Sync {
    /// Top stories in feed order.
    async fn top_stories(&self) -> Result<Vec<Story>, CollaboratorError>;
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ThreadSource: Send + Sync {
    /// Raw HTML of the item page for `story_id`.
    async fn fetch_thread(&self, story_id: u64) -> Result<String, CollaboratorError>;
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Readable content of the page at `url`.
    async fn fetch_article(&self, url: &str) -> Result<String, CollaboratorError>;
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Summariser: Send + Sync {
    /// Markdown summary of an article and its rendered comment list.
    ///
    /// `content` is empty when the article could not be fetched.
    async fn summarise(
        &self,
        title: &str,
        content: &str,
        comments: &str,
    ) -> Result<String, CollaboratorError>;
}

/// Knowledge store receiving the finished digests.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Names of the files already attached to the knowledge base.
    async fn list_files(&self) -> Result<Vec<String>, CollaboratorError>;

    /// Upload a markdown document and return the new file id.
    async fn upload_markdown(
        &self,
        markdown: &str,
        filename: &str,
    ) -> Result<String, CollaboratorError>;

    /// Attach an uploaded file to the knowledge base.
    async fn attach_file(&self, file_id: &str) -> Result<(), CollaboratorError>;
}
