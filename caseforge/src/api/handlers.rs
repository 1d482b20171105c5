use axum::{Json, extract::State};
use serde_json::Value;

use crate::AppState;
use crate::api::models::{CodeToolRequest, FileTestGenRequest, HealthResponse};
use crate::errors::{Error, Result};

fn required(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[utoipa::path(
    post,
    path = "/api/v1/test-cases/from-file",
    tag = "test-cases",
    summary = "Generate test cases from a document",
    description = "Uploads the document to the generative-model provider and returns a structured testCases envelope. \
                   When the model's reply cannot be parsed as JSON, a single TC_ERROR placeholder case is returned instead.",
    request_body = FileTestGenRequest,
    responses(
        (status = 200, description = "Parsed or placeholder test-case envelope", body = crate::api::models::TestCaseEnvelope),
        (status = 400, description = "Missing or invalid input", body = crate::api::models::ErrorResponse),
        (status = 413, description = "Payload exceeds the configured limit", body = crate::api::models::ErrorResponse),
        (status = 500, description = "Missing credential or internal error", body = crate::api::models::ErrorResponse)
    )
)]
pub async fn test_cases_from_file(State(state): State<AppState>, Json(req): Json<FileTestGenRequest>) -> Result<Json<Value>> {
    let (Some(file_name), Some(file_content)) = (required(req.file_name), required(req.file_content)) else {
        return Err(Error::BadRequest {
            message: "Missing fileName or fileContent".to_string(),
        });
    };

    tracing::info!(file_name = %file_name, model = ?req.model, "Received file test-case generation request");

    let normalized = state.pipeline.test_cases_from_file(&file_name, &file_content).await?;
    Ok(Json(normalized.into_value()))
}

#[utoipa::path(
    post,
    path = "/api/v1/test-cases/from-code",
    tag = "test-cases",
    summary = "Generate test cases from pasted code",
    request_body = CodeToolRequest,
    responses(
        (status = 200, description = "Parsed or placeholder test-case envelope", body = crate::api::models::TestCaseEnvelope),
        (status = 400, description = "Missing code", body = crate::api::models::ErrorResponse),
        (status = 500, description = "Missing credential or internal error", body = crate::api::models::ErrorResponse)
    )
)]
pub async fn test_cases_from_code(State(state): State<AppState>, Json(req): Json<CodeToolRequest>) -> Result<Json<Value>> {
    let Some(code) = required(req.code) else {
        return Err(Error::BadRequest {
            message: "Missing code".to_string(),
        });
    };
    let language = required(req.language).unwrap_or_else(|| "source".to_string());

    tracing::info!(language = %language, model = ?req.model, "Received code test-case generation request");

    let normalized = state.pipeline.test_cases_from_code(&language, &code).await?;
    Ok(Json(normalized.into_value()))
}

#[utoipa::path(
    post,
    path = "/api/v1/code/optimise",
    tag = "code",
    summary = "Optimise pasted code",
    request_body = CodeToolRequest,
    responses(
        (status = 200, description = "Optimised code, or the model's raw reply when it was not structured", body = crate::api::models::OptimiseResponse),
        (status = 400, description = "Missing code", body = crate::api::models::ErrorResponse),
        (status = 500, description = "Missing credential or internal error", body = crate::api::models::ErrorResponse)
    )
)]
pub async fn optimise_code(State(state): State<AppState>, Json(req): Json<CodeToolRequest>) -> Result<Json<Value>> {
    let Some(code) = required(req.code) else {
        return Err(Error::BadRequest {
            message: "Missing code".to_string(),
        });
    };
    let language = required(req.language).unwrap_or_else(|| "source".to_string());

    tracing::info!(language = %language, model = ?req.model, "Received code optimisation request");

    let normalized = state.pipeline.optimise_code(&language, &code).await?;
    Ok(Json(normalized.into_value()))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Liveness probe",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
