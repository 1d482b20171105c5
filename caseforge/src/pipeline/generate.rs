//! Generation client: issues a single request combining the prompt and an
//! optional uploaded-file reference to the generative-model endpoint.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use url::Url;

use crate::errors::{Error, Result};
use crate::pipeline::retry::RetryPolicy;

/// One part of the user turn sent to the model.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text { text: String },
    FileData { file_data: FileData },
}

/// Reference to a previously uploaded artifact, in the provider's wire form.
#[derive(Debug, Clone, Serialize)]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        ContentPart::FileData {
            file_data: FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            },
        }
    }
}

/// A trait for requesting a completion from a generative-model endpoint.
/// Returns the first text segment of the model's reply, trimmed. Transport
/// failures are propagated verbatim, including the response body, without
/// retry or backoff (unless a retry policy is configured, which covers
/// connection-level errors only).
#[async_trait]
pub trait GenerateContent: Send + Sync {
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String>;
}

/// The concrete implementation of `GenerateContent`.
pub struct ReqwestGenerateClient {
    client: reqwest::Client,
    generate_url: Url,
    api_key: String,
    retry: RetryPolicy,
}

impl ReqwestGenerateClient {
    pub fn new(client: reqwest::Client, generate_url: Url, api_key: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            generate_url,
            api_key,
            retry,
        }
    }
}

#[async_trait]
impl GenerateContent for ReqwestGenerateClient {
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String> {
        tracing::debug!(parts = parts.len(), "Calling generation endpoint");

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
        });

        let client = self.client.clone();
        let url = self.generate_url.clone();
        let api_key = self.api_key.clone();

        let response = self
            .retry
            .run(move || {
                let client = client.clone();
                let url = url.clone();
                let api_key = api_key.clone();
                let body = body.clone();
                async move { client.post(url).query(&[("key", api_key.as_str())]).json(&body).send().await }
            })
            .await
            .map_err(|e| Error::Other(anyhow::Error::new(e).context("Failed to reach generation endpoint")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GenerationFailed {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| Error::Other(anyhow::Error::new(e).context("Failed to decode generation response")))?;

        // First text segment of the reply; absent segments degrade to an
        // empty string, which the normalizer turns into a placeholder.
        let raw_text = data
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(raw_text)
    }
}
