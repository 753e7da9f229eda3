//! Summaries through an OpenAI-compatible chat completions endpoint (LiteLLM proxy).

use async_trait::async_trait;
use hn_digest_core::contract::{CollaboratorError, Summariser};
use serde::Deserialize;
use serde_json::json;

use crate::http::{HttpClient, HttpError, READ_LONG};

pub const DEFAULT_MODEL: &str = "gpt-5-medium-4096";

pub const SYSTEM_PROMPT: &str = concat!(
    "TITLE contains the title of the article. ",
    "CONTENT contains the main text content of the article. If this is empty, the article content could not be fetched. ",
    "COMMENTS contain top user comments on the article in numbered format. Each comment may have replies indented as bulleted list below it. ",
    "Explain the article. Include any relevant context for uncommon topics. ",
    "However, if the article is a showcase of some tool, product or service, focus on describing its uniqueness, purpose and key features instead of being detailed. ",
    "Summarize the comments separately under 'Comments' sub-heading below, highlighting interesting points or perspectives. ",
    "Make sure to include your take on the article and its comments separately below under 'LLM perspective' sub-heading. ",
    "RULES for article explanation, comment summary and LLM perspective: ",
    "Avoid redundancy, repetition, and fluff. ",
    "Ignore URLs, ads, and irrelevant information accidentally included in content. ",
    "Be concise and precise, but do not omit or compress important details. ",
    "DO NOT include title in the summary. ",
    "Respect markdown format in output and emit only in markdown format. ",
);

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

pub struct LlmClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(http: HttpClient, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

pub fn user_prompt(title: &str, content: &str, comments: &str) -> String {
    format!("TITLE: {title}\nCONTENT:\n{content}\n\nCOMMENTS:\n{comments}")
}

#[async_trait]
impl Summariser for LlmClient {
    async fn summarise(
        &self,
        title: &str,
        content: &str,
        comments: &str,
    ) -> Result<String, CollaboratorError> {
        let endpoint = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(title, content, comments) },
            ],
        });
        tracing::debug!(model = %self.model, title, "Requesting chat completion");

        let completion: ChatCompletion = self
            .http
            .send_json("LLM", |c| {
                c.post(&endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .timeout(READ_LONG)
            })
            .await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| HttpError::Decode {
                label: "LLM".to_string(),
                message: "completion has no choices".to_string(),
            })?;
        Ok(content)
    }
}
