//! The remote-generation pipeline.
//!
//! Control flow is strictly linear and single-shot:
//! decode → classify → upload → build prompt → generate → normalize.
//! No state survives between calls; every invocation is independent and
//! arbitrarily many may run concurrently against the remote endpoints.
//!
//! Terminal failure points: missing required inputs, missing credential,
//! upload transport failure, missing upload reference, generation transport
//! failure. Output parsing never fails terminally - it degrades to a
//! placeholder envelope (see [`normalize`]).

pub mod generate;
pub mod normalize;
pub mod prompt;
pub mod retry;
pub mod upload;

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::classify::{ContentTypeClassifier, SuffixClassifier};
use crate::config::Config;
use crate::errors::{Error, Result};
use crate::pipeline::generate::{ContentPart, GenerateContent, ReqwestGenerateClient};
use crate::pipeline::normalize::{Normalized, normalize_optimized_code, normalize_test_cases};
use crate::pipeline::retry::RetryPolicy;
use crate::pipeline::upload::{ReqwestUploadClient, UploadFile};

/// Provider clients, present only when a credential was configured.
#[derive(Clone)]
struct ProviderClients {
    uploader: Arc<dyn UploadFile>,
    generator: Arc<dyn GenerateContent>,
}

/// The request pipeline shared by all tool endpoints.
///
/// Constructed once at startup from the immutable [`Config`]; the provider
/// credential is read at process start and never re-read per request.
#[derive(Clone)]
pub struct Pipeline {
    classifier: Arc<dyn ContentTypeClassifier>,
    clients: Option<ProviderClients>,
    max_upload_bytes: Option<u64>,
}

impl Pipeline {
    /// Build the pipeline from configuration. When no API key is configured
    /// the pipeline still constructs, and each invocation fails with
    /// [`Error::MissingCredential`] after input validation - matching the
    /// per-request credential check of the original and keeping `--validate`
    /// / health endpoints usable without a key.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let clients = match &config.provider.api_key {
            Some(api_key) => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = config.provider.request_timeout {
                    builder = builder.timeout(timeout);
                }
                let client = builder.build()?;

                let retry = RetryPolicy::from_config(&config.provider.retry);
                let uploader = ReqwestUploadClient::new(
                    client.clone(),
                    config.provider.upload_url(),
                    api_key.clone(),
                    retry.clone(),
                );
                let generator =
                    ReqwestGenerateClient::new(client, config.provider.generate_url(), api_key.clone(), retry);

                Some(ProviderClients {
                    uploader: Arc::new(uploader),
                    generator: Arc::new(generator),
                })
            }
            None => None,
        };

        Ok(Self {
            classifier: Arc::new(SuffixClassifier),
            clients,
            max_upload_bytes: config.limits.max_upload_bytes,
        })
    }

    /// Construct with explicit components (used by tests to substitute seams).
    #[cfg(test)]
    fn with_components(
        classifier: Arc<dyn ContentTypeClassifier>,
        uploader: Arc<dyn UploadFile>,
        generator: Arc<dyn GenerateContent>,
        max_upload_bytes: Option<u64>,
    ) -> Self {
        Self {
            classifier,
            clients: Some(ProviderClients { uploader, generator }),
            max_upload_bytes,
        }
    }

    fn clients(&self) -> Result<&ProviderClients> {
        self.clients.as_ref().ok_or(Error::MissingCredential)
    }

    /// Generate test cases from an uploaded document.
    ///
    /// `file_content` is the base64 transport encoding of the raw bytes.
    pub async fn test_cases_from_file(&self, file_name: &str, file_content: &str) -> Result<Normalized> {
        let clients = self.clients()?;

        let content = BASE64.decode(file_content).map_err(|e| Error::BadRequest {
            message: format!("fileContent is not valid base64: {e}"),
        })?;

        if let Some(limit) = self.max_upload_bytes
            && content.len() as u64 > limit
        {
            return Err(Error::PayloadTooLarge {
                message: format!("File size exceeds maximum allowed size of {limit} bytes"),
            });
        }

        let content_type = self.classifier.classify(file_name, &content);
        tracing::info!(
            file_name = %file_name,
            content_type = ?content_type,
            bytes = content.len(),
            "Starting file test-case generation"
        );

        let uploaded = clients.uploader.upload(file_name, content_type.mime(), content).await?;

        let raw = clients
            .generator
            .generate(vec![
                ContentPart::text(prompt::file_test_cases(file_name)),
                ContentPart::file(content_type.mime(), uploaded.uri),
            ])
            .await?;

        Ok(self.finish(normalize_test_cases(&raw)))
    }

    /// Generate test cases from pasted source code. Same pipeline minus the
    /// upload stage.
    pub async fn test_cases_from_code(&self, language: &str, code: &str) -> Result<Normalized> {
        let clients = self.clients()?;

        tracing::info!(language = %language, code_bytes = code.len(), "Starting code test-case generation");

        let raw = clients
            .generator
            .generate(vec![ContentPart::text(prompt::code_test_cases(language, code))])
            .await?;

        Ok(self.finish(normalize_test_cases(&raw)))
    }

    /// Optimise pasted source code.
    pub async fn optimise_code(&self, language: &str, code: &str) -> Result<Normalized> {
        let clients = self.clients()?;

        tracing::info!(language = %language, code_bytes = code.len(), "Starting code optimisation");

        let raw = clients
            .generator
            .generate(vec![ContentPart::text(prompt::optimise_code(language, code))])
            .await?;

        Ok(self.finish(normalize_optimized_code(&raw)))
    }

    fn finish(&self, normalized: Normalized) -> Normalized {
        if normalized.is_recovered() {
            tracing::warn!("Model output was not valid JSON, returning placeholder record");
        }
        normalized
    }
}
