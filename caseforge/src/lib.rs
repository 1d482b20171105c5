//! # caseforge: AI-assisted QA tooling gateway
//!
//! `caseforge` is the HTTP backend for a browser dashboard of AI-assisted QA
//! tools. Its canonical operation generates structured test cases from an
//! uploaded document: the service decodes the artifact, pushes it to the
//! generative-model provider's file-storage endpoint, issues a single
//! generation request referencing the stored file, and normalizes the
//! model's raw reply into a structured JSON envelope.
//!
//! ## Request Flow
//!
//! Every tool endpoint is a strictly linear, single-shot pipeline:
//!
//! ```text
//! decode input → classify content type → upload artifact
//!     → build prompt → call generation endpoint → normalize reply
//! ```
//!
//! There is no branching, no fan-out, and no state shared between requests.
//! Upstream transport failures are surfaced to the caller with the
//! originating status code and body; the single recovered failure is the
//! output-parse error, which degrades to a placeholder record so the
//! response envelope is always well-formed (see [`pipeline::normalize`]).
//!
//! ## Core Components
//!
//! The **API layer** ([`api`]) exposes the tool endpoints under `/api/v1/*`
//! with permissive CORS for the browser dashboard, plus a `/health` probe
//! and OpenAPI docs at `/docs`.
//!
//! The **pipeline** ([`pipeline`]) owns the outbound provider clients behind
//! trait seams ([`pipeline::upload::UploadFile`],
//! [`pipeline::generate::GenerateContent`]) and the pluggable content-type
//! classifier ([`classify::ContentTypeClassifier`]).
//!
//! Configuration ([`config`]) is loaded once at startup; the provider
//! credential is immutable after that and shared read-only by all in-flight
//! requests.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use caseforge::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = caseforge::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     caseforge::telemetry::init_telemetry();
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod classify;
pub mod config;
pub mod errors;
mod openapi;
pub mod pipeline;
pub mod telemetry;

#[cfg(test)]
mod test;

use axum::http::{HeaderName, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::openapi::ApiDoc;
use crate::pipeline::Pipeline;

/// Application state shared across all request handlers.
///
/// Holds the immutable configuration and the request pipeline (provider
/// clients plus classifier). Both are constructed once at startup; nothing
/// here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,
}

/// Create the permissive CORS layer for the browser dashboard.
///
/// Any origin may POST/GET; the pre-flight OPTIONS request is answered by
/// this layer without reaching a handler.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Build the main application router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/test-cases/from-file", post(api::handlers::test_cases_from_file))
        .route("/api/v1/test-cases/from-code", post(api::handlers::test_cases_from_code))
        .route("/api/v1/code/optimise", post(api::handlers::optimise_code))
        .route("/health", get(api::handlers::health))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(create_cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The assembled application.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] builds the pipeline and router from
///    configuration
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts
///    handling requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests
///    drain and the server exits
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub fn new(config: Config) -> anyhow::Result<Self> {
        tracing::debug!("Starting caseforge with configuration: {:#?}", config);

        let pipeline = Pipeline::from_config(&config)?;
        let state = AppState {
            config: config.clone(),
            pipeline,
        };
        let router = build_router(state);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "caseforge listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
