//! API request and response data models.
//!
//! Request fields are optional at the serde level so that missing fields
//! reach the handlers, which reply with the documented 400 `{error}` body
//! instead of a framework rejection. Response envelopes are passed through
//! from the normalizer as raw JSON; the typed shapes below document the
//! contract the prompt requests, they are not enforced on the way out.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for test-case generation from an uploaded document.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileTestGenRequest {
    /// Name of the uploaded file; the extension drives content-type
    /// classification
    pub file_name: Option<String>,
    /// Base64-encoded file content
    pub file_content: Option<String>,
    /// Model hint from the dashboard; accepted and logged, not used for
    /// routing
    pub model: Option<String>,
}

/// Request body for code-driven tools (test-case generation, optimisation).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeToolRequest {
    /// Programming language of the pasted code
    pub language: Option<String>,
    /// The source code to operate on
    pub code: Option<String>,
    /// Model hint from the dashboard; accepted and logged, not used for
    /// routing
    pub model: Option<String>,
}

/// One step of a generated test case.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub step_no: i64,
    pub action: String,
    pub expected_result: String,
}

/// A generated test case.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub test_case_id: String,
    pub title: String,
    pub description: String,
    pub preconditions: String,
    pub steps: Vec<TestStep>,
}

/// The structured output contract requested from the model. Returned
/// unmodified when the model's reply parses; substituted with a single
/// `TC_ERROR` placeholder case when it does not.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseEnvelope {
    pub test_cases: Vec<TestCase>,
}

/// Response of the code-optimisation tool.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimiseResponse {
    pub optimized_code: String,
}

/// JSON error body returned on every failure path.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Liveness probe response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
