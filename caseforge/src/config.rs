//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `CASEFORGE_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `CASEFORGE_` override YAML values
//! 3. **GEMINI_API_KEY** - Special case: overrides `provider.api_key` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `CASEFORGE_PROVIDER__MODEL=gemini-2.5-pro` sets the `provider.model` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use caseforge::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "CASEFORGE_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Deprecated: Use `provider.api_key` instead. Populated from the raw
    /// GEMINI_API_KEY environment variable for compatibility with existing
    /// deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    /// Generative-model provider configuration
    pub provider: ProviderConfig,
    /// Resource limits for protecting system capacity
    pub limits: LimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3400,
            gemini_api_key: None,
            provider: ProviderConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Configuration for the generative-model provider (file upload + generation).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key for the provider. Read once at startup and shared read-only by
    /// all in-flight requests. When absent, tool endpoints return 500.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of the provider API
    pub base_url: Url,
    /// Model name used for all generation requests
    pub model: String,
    /// Optional timeout for outbound provider requests. When unset, no
    /// client-side timeout is applied and limits are delegated to the
    /// hosting platform.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,
    /// Retry strategy for outbound requests (connection-level failures only)
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse("https://generativelanguage.googleapis.com").expect("valid default provider URL"),
            model: "gemini-2.5-flash".to_string(),
            request_timeout: None,
            retry: RetryConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Endpoint for storing a binary artifact, returning an opaque file handle.
    pub fn upload_url(&self) -> Url {
        ensure_slash(&self.base_url)
            .join("upload/v1beta/files")
            .expect("valid upload URL")
    }

    /// Endpoint for a single generation request against the configured model.
    pub fn generate_url(&self) -> Url {
        ensure_slash(&self.base_url)
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .expect("valid generate URL")
    }
}

/// Retry configuration for outbound provider requests.
///
/// Applies only to connection-level transport errors (DNS, socket failures).
/// HTTP error responses, protocol violations, and validation errors are never
/// retried. The default of a single attempt disables retries entirely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total number of attempts (1 = no retries)
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Ceiling on the backoff delay between attempts
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum decoded upload size in bytes. Unset means no limit is
    /// enforced here and the hosting platform's limits apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<u64>,
}

/// Makes sure a url has a trailing slash.
///
/// This fixes a weird idiosyncracy in rusts 'join' method on urls, where joining URLs like
/// '/hello', 'world' gives you '/world', but '/hello/', 'world' gives you '/hello/world'.
/// Basically, call this before calling .join
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // If the raw GEMINI_API_KEY pattern was used, move it into the provider config
        if let Some(key) = config.gemini_api_key.take() {
            config.provider.api_key = Some(key);
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("CASEFORGE_").split("__"))
            // Common GEMINI_API_KEY pattern
            .merge(Env::raw().only(&["GEMINI_API_KEY"]))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.provider.retry.max_attempts == 0 {
            return Err(Error::BadRequest {
                message: "Config validation: provider.retry.max_attempts must be at least 1".to_string(),
            });
        }

        match self.provider.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::BadRequest {
                    message: format!("Config validation: unsupported provider.base_url scheme '{other}'"),
                });
            }
        }

        if self.provider.api_key.is_none() {
            // Tool endpoints will return 500 until a key is configured
            tracing::warn!("No provider API key configured (provider.api_key / GEMINI_API_KEY)");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
