//! Remote upload client: pushes an artifact to the provider's file-storage
//! endpoint and obtains an opaque reference handle.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

use crate::errors::{Error, Result};
use crate::pipeline::retry::RetryPolicy;

/// Reference handle for an uploaded artifact, owned for the lifetime of one
/// request and never cached or reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub uri: String,
}

/// A trait for uploading an artifact to remote content storage.
/// In practise this is the provider's files endpoint over http, using the
/// `reqwest` library. See `ReqwestUploadClient` for more info.
#[async_trait]
pub trait UploadFile: Send + Sync {
    async fn upload(&self, file_name: &str, mime: &str, content: Vec<u8>) -> Result<UploadedFile>;
}

/// The concrete implementation of `UploadFile`.
pub struct ReqwestUploadClient {
    client: reqwest::Client,
    upload_url: Url,
    api_key: String,
    retry: RetryPolicy,
}

impl ReqwestUploadClient {
    pub fn new(client: reqwest::Client, upload_url: Url, api_key: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            upload_url,
            api_key,
            retry,
        }
    }
}

#[async_trait]
impl UploadFile for ReqwestUploadClient {
    async fn upload(&self, file_name: &str, mime: &str, content: Vec<u8>) -> Result<UploadedFile> {
        tracing::debug!(file_name = %file_name, mime = %mime, bytes = content.len(), "Uploading artifact");

        // Only connection-level failures pass through the retry policy;
        // any HTTP response is final. The multipart form is not reusable, so
        // each attempt rebuilds it from the owned bytes.
        let client = self.client.clone();
        let url = self.upload_url.clone();
        let api_key = self.api_key.clone();
        let file_name = file_name.to_string();
        let mime = mime.to_string();

        let response = self
            .retry
            .run(move || {
                let client = client.clone();
                let url = url.clone();
                let api_key = api_key.clone();
                let file_name = file_name.clone();
                let mime = mime.clone();
                let content = content.clone();
                async move {
                    let part = Part::bytes(content).file_name(file_name).mime_str(&mime)?;
                    let form = Form::new().part("file", part);
                    client.post(url).query(&[("key", api_key.as_str())]).multipart(form).send().await
                }
            })
            .await
            .map_err(|e| Error::Other(anyhow::Error::new(e).context("Failed to reach upload endpoint")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UploadFailed {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            });
        }

        // Missing or unparseable handle is a protocol violation by the
        // provider, not a transient condition - never retried.
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let uri = body
            .pointer("/file/uri")
            .and_then(Value::as_str)
            .ok_or(Error::MissingFileUri)?;

        tracing::debug!(uri = %uri, "Upload complete");
        Ok(UploadedFile { uri: uri.to_string() })
    }
}
