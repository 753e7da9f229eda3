#![doc = "Knowledge base integration: bridges the core `KnowledgeBase` trait to the Open WebUI API."]
//
//! # Open WebUI knowledge base client
//!
//! [`OpenWebUiClient`] implements [`KnowledgeBase`] against an Open WebUI
//! instance: digests are uploaded as markdown files and then attached to one
//! knowledge collection, identified by `KNOWLEDGE_ID`.
//!
//! For the trait contract and its mocks, see the core crate's `contract` module.

use async_trait::async_trait;
use hn_digest_core::contract::{CollaboratorError, KnowledgeBase};
use serde::Deserialize;
use serde_json::json;

use crate::http::{HttpClient, READ_SHORT};

#[derive(Deserialize)]
struct Knowledge {
    #[serde(default)]
    files: Vec<KnowledgeFile>,
}

#[derive(Deserialize)]
struct KnowledgeFile {
    meta: FileMeta,
}

#[derive(Deserialize)]
struct FileMeta {
    name: String,
}

#[derive(Deserialize)]
struct UploadedFile {
    id: String,
}

pub struct OpenWebUiClient {
    http: HttpClient,
    base_url: String,
    token: String,
    knowledge_id: String,
}

impl OpenWebUiClient {
    pub fn new(http: HttpClient, base_url: &str, token: &str, knowledge_id: &str) -> Self {
        tracing::info!(
            base_url,
            token_set = !token.is_empty(),
            knowledge_id,
            "Initialized OpenWebUiClient"
        );
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            knowledge_id: knowledge_id.to_string(),
        }
    }
}

#[async_trait]
impl KnowledgeBase for OpenWebUiClient {
    async fn list_files(&self) -> Result<Vec<String>, CollaboratorError> {
        let endpoint = format!("{}/api/v1/knowledge/{}", self.base_url, self.knowledge_id);
        let knowledge: Knowledge = self
            .http
            .send_json("Fetch KB files", |c| {
                c.get(&endpoint)
                    .bearer_auth(&self.token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .timeout(READ_SHORT)
            })
            .await?;
        let names: Vec<String> = knowledge.files.into_iter().map(|f| f.meta.name).collect();
        tracing::info!(count = names.len(), "Fetched knowledge base files");
        Ok(names)
    }

    async fn upload_markdown(
        &self,
        markdown: &str,
        filename: &str,
    ) -> Result<String, CollaboratorError> {
        let endpoint = format!("{}/api/v1/files/", self.base_url);
        tracing::info!(filename, bytes = markdown.len(), "Uploading markdown file");
        let uploaded: UploadedFile = self
            .http
            .send_json("Upload", |c| {
                // A multipart body is consumed by sending, so every attempt builds its own.
                let part = reqwest::multipart::Part::bytes(markdown.as_bytes().to_vec())
                    .file_name(filename.to_string())
                    .mime_str("text/markdown")
                    .unwrap_or_else(|_| {
                        reqwest::multipart::Part::bytes(markdown.as_bytes().to_vec())
                            .file_name(filename.to_string())
                    });
                let form = reqwest::multipart::Form::new().part("file", part);
                c.post(&endpoint)
                    .bearer_auth(&self.token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .multipart(form)
                    .timeout(READ_SHORT)
            })
            .await?;
        tracing::info!(file_id = %uploaded.id, filename, "Uploaded markdown file");
        Ok(uploaded.id)
    }

    async fn attach_file(&self, file_id: &str) -> Result<(), CollaboratorError> {
        let endpoint = format!(
            "{}/api/v1/knowledge/{}/file/add",
            self.base_url, self.knowledge_id
        );
        self.http
            .send("Attach to KB", |c| {
                c.post(&endpoint)
                    .bearer_auth(&self.token)
                    .json(&json!({ "file_id": file_id }))
                    .timeout(READ_SHORT)
            })
            .await?;
        tracing::info!(file_id, knowledge_id = %self.knowledge_id, "Attached file to knowledge base");
        Ok(())
    }
}
