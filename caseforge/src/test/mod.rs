//! End-to-end tests: full router against mocked provider endpoints.

pub mod utils;

use axum::http::StatusCode;
use serde_json::{Value, json};
use utils::{b64, create_test_config, create_test_server};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UPLOAD_PATH: &str = "/upload/v1beta/files";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn generation_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": text}],
            }
        }]
    })
}

async fn mount_upload_ok(server: &MockServer, uri: &str) {
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"file": {"uri": uri}})))
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn missing_fields_fail_before_any_network_call() {
    let provider = MockServer::start().await;
    // No mock is mounted on purpose: any outbound call would 404 the mock
    // server and the expect(0) below would catch it.
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&provider).await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"model": "gemini"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "Missing fileName or fileContent"}));
}

#[test_log::test(tokio::test)]
async fn file_pipeline_embeds_uri_and_mime_in_generation_request() {
    let provider = MockServer::start().await;
    mount_upload_ok(&provider, "mem://abc").await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    {},
                    {"file_data": {"mime_type": "application/pdf", "file_uri": "mem://abc"}},
                ],
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(generation_reply("```json\n{\"testCases\":[{\"testCaseId\":\"TC_01\"}]}\n```")),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({
            "fileName": "spec.pdf",
            "fileContent": b64(&[0x25, 0x50, 0x44, 0x46]),
            "model": "gemini",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"testCases": [{"testCaseId": "TC_01"}]}));
}

#[test_log::test(tokio::test)]
async fn upload_failure_is_mirrored_and_generation_is_never_called() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(413).set_body_string("Request entity too large"))
        .expect(1)
        .mount(&provider)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_reply("{}")))
        .expect(0)
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"fileName": "big.pdf", "fileContent": b64(b"%PDF")}))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "Upload failed: Request entity too large"}));
}

#[test_log::test(tokio::test)]
async fn generation_failure_is_mirrored_with_body_verbatim() {
    let provider = MockServer::start().await;
    mount_upload_ok(&provider, "mem://abc").await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("model overloaded"))
        .expect(1)
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"fileName": "spec.pdf", "fileContent": b64(b"%PDF")}))
        .await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "model overloaded"}));
}

#[test_log::test(tokio::test)]
async fn missing_upload_uri_is_a_500_protocol_error() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"file": {}})))
        .expect(1)
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"fileName": "spec.pdf", "fileContent": b64(b"%PDF")}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "File upload failed, no URI returned"}));
}

#[test_log::test(tokio::test)]
async fn empty_test_case_list_passes_through_unmodified() {
    let provider = MockServer::start().await;
    mount_upload_ok(&provider, "mem://abc").await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_reply("{\"testCases\":[]}")))
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"fileName": "spec.pdf", "fileContent": b64(b"%PDF")}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"testCases": []}));
}

#[test_log::test(tokio::test)]
async fn unparseable_model_output_recovers_to_placeholder() {
    let provider = MockServer::start().await;
    mount_upload_ok(&provider, "mem://abc").await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_reply("Sorry, here are the test cases in prose...")))
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"fileName": "spec.pdf", "fileContent": b64(b"%PDF")}))
        .await;

    // Recovered, not an error
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let cases = body["testCases"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["testCaseId"], "TC_ERROR");
    assert!(cases[0]["description"].as_str().unwrap().chars().count() <= 200);
}

#[test_log::test(tokio::test)]
async fn missing_credential_returns_500_without_network() {
    let provider = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&provider).await;

    let mut config = create_test_config(&provider.uri());
    config.provider.api_key = None;
    let server = create_test_server(config);

    let response = server
        .post("/api/v1/test-cases/from-file")
        .json(&json!({"fileName": "spec.pdf", "fileContent": b64(b"%PDF")}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "Missing provider API key"}));
}

#[test_log::test(tokio::test)]
async fn code_test_cases_skip_the_upload_stage() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(generation_reply("{\"testCases\":[{\"testCaseId\":\"TC_01\"}]}")),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/test-cases/from-code")
        .json(&json!({"language": "Python", "code": "def add(a, b): return a + b", "model": "gpt-4o"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"testCases": [{"testCaseId": "TC_01"}]}));
}

#[test_log::test(tokio::test)]
async fn code_tools_require_code() {
    let provider = MockServer::start().await;
    let server = create_test_server(create_test_config(&provider.uri()));

    for route in ["/api/v1/test-cases/from-code", "/api/v1/code/optimise"] {
        let response = server.post(route).json(&json!({"language": "Go", "code": "  "})).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body, json!({"error": "Missing code"}));
    }
}

#[test_log::test(tokio::test)]
async fn optimise_recovers_bare_code_replies() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_reply("```\nlet x = 1;\n```")))
        .expect(1)
        .mount(&provider)
        .await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .post("/api/v1/code/optimise")
        .json(&json!({"language": "Rust", "code": "let x=1;"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"optimizedCode": "let x = 1;"}));
}

#[test_log::test(tokio::test)]
async fn cors_preflight_short_circuits() {
    let provider = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&provider).await;

    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server
        .method(axum::http::Method::OPTIONS, "/api/v1/test-cases/from-file")
        .add_header(axum::http::header::ORIGIN, axum::http::HeaderValue::from_static("https://dashboard.example.com"))
        .add_header(
            axum::http::HeaderName::from_static("access-control-request-method"),
            axum::http::HeaderValue::from_static("POST"),
        )
        .await;

    assert!(response.status_code().is_success());
    let allow_origin = response.maybe_header("access-control-allow-origin");
    assert_eq!(allow_origin.as_ref().and_then(|v| v.to_str().ok()), Some("*"));
}

#[test_log::test(tokio::test)]
async fn health_probe_is_up() {
    let provider = MockServer::start().await;
    let server = create_test_server(create_test_config(&provider.uri()));

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"status": "ok"}));
}
