//! API layer for HTTP request handling and data models.
//!
//! This module contains the tool endpoints, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Test cases** (`/api/v1/test-cases/*`): document- and code-driven
//!   structured test-case generation
//! - **Code tools** (`/api/v1/code/*`): code optimisation
//! - **Health** (`/health`): liveness probe
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
