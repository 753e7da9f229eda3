//! Shared HTTP client with retry and backoff for all outbound calls.
//!
//! Connection failures and the transient statuses in [`RETRY_STATUSES`] are
//! retried with exponential backoff. Any other non-success answer is logged with
//! a clipped body and returned as [`HttpError::Status`].

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Timeout for ordinary API calls.
pub const READ_SHORT: Duration = Duration::from_secs(120);
/// Timeout for slow calls (LLM completions, content extraction).
pub const READ_LONG: Duration = Duration::from_secs(300);
/// Characters of an error body kept in logs and errors.
pub const CLIP_ERROR_CONTENT: usize = 100;

pub const RETRY_STATUSES: [u16; 5] = [429, 502, 503, 504, 524];

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
const BACKOFF_MULTIPLIER: u32 = 2;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("{label} request failed: {source}")]
    Transport {
        label: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{label} failed: {status} {body}")]
    Status {
        label: String,
        status: StatusCode,
        body: String,
    },

    #[error("{label} returned an unexpected response: {message}")]
    Decode { label: String, message: String },
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// 3 retries, backoff starting at 500ms.
    pub fn new() -> Self {
        Self::with_retry(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY)
    }

    pub fn with_retry(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            client: Client::new(),
            max_retries,
            base_delay,
        }
    }

    /// Send the request produced by `build`, rebuilding it for every attempt.
    ///
    /// `label` names the call in logs and errors (e.g. "HN comments fetch").
    pub async fn send<F>(&self, label: &str, build: F) -> Result<Response, HttpError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match build(&self.client).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if RETRY_STATUSES.contains(&status.as_u16()) && attempt < self.max_retries {
                        tracing::warn!(label, %status, attempt, "Transient status, retrying");
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        let body: String = body.chars().take(CLIP_ERROR_CONTENT).collect();
                        tracing::error!(label, %status, body = %body, "Request failed");
                        return Err(HttpError::Status {
                            label: label.to_string(),
                            status,
                            body,
                        });
                    }
                }
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt < self.max_retries => {
                    tracing::warn!(label, error = %e, attempt, "Connection failed, retrying");
                }
                Err(e) => {
                    tracing::error!(label, error = ?e, "Request could not be sent");
                    return Err(HttpError::Transport {
                        label: label.to_string(),
                        source: e,
                    });
                }
            }

            sleep(self.base_delay * BACKOFF_MULTIPLIER.pow(attempt)).await;
            attempt += 1;
        }
    }

    /// [`send`](Self::send) and decode the JSON body into `T`.
    pub async fn send_json<T, F>(&self, label: &str, build: F) -> Result<T, HttpError>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.send(label, build).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!(label, error = ?e, "Failed to decode JSON response");
            HttpError::Decode {
                label: label.to_string(),
                message: e.to_string(),
            }
        })
    }
}
