//! Shared helpers for end-to-end tests.

use url::Url;

use crate::Application;
use crate::config::Config;

/// Test config pointing the provider at a local mock server.
pub fn create_test_config(provider_uri: &str) -> Config {
    let mut config = Config::default();
    config.provider.api_key = Some("test-key".to_string());
    config.provider.base_url = Url::parse(provider_uri).expect("mock server URI is a valid URL");
    config
}

/// Build a test server running the full router for the given config.
pub fn create_test_server(config: Config) -> axum_test::TestServer {
    Application::new(config).expect("Failed to create application").into_test_server()
}

/// Base64 helper for request bodies.
pub fn b64(bytes: &[u8]) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
