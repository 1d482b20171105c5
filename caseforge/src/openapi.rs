//! OpenAPI documentation aggregation.

use utoipa::OpenApi;

use crate::api::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "caseforge",
        description = "AI-assisted QA tooling gateway: structured test-case generation from documents and code"
    ),
    paths(
        handlers::test_cases_from_file,
        handlers::test_cases_from_code,
        handlers::optimise_code,
        handlers::health,
    ),
    components(schemas(
        models::FileTestGenRequest,
        models::CodeToolRequest,
        models::TestCase,
        models::TestStep,
        models::TestCaseEnvelope,
        models::OptimiseResponse,
        models::ErrorResponse,
        models::HealthResponse,
    )),
    tags(
        (name = "test-cases", description = "Structured test-case generation"),
        (name = "code", description = "Code tools"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
