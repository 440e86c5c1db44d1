//! Query API endpoints
//!
//! ## Endpoints
//!
//! - `POST /query` - `{"text": "..."}` → `{"response": "..."}`
//! - `POST /query/explain` - same input, full resolution (intent, stage, response)
//! - `GET /health` - liveness

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::resolver::{IntentResolver, Query};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

/// Resolved response; empty when the intent has no canned reply
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

async fn resolve_request(
    resolver: &IntentResolver,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Query, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected query body: {}", rejection);
        api_error(StatusCode::BAD_REQUEST, "Invalid request")
    })?;

    resolver.resolve(&request.text).await.map_err(|e| {
        let status = resolve_status(&e);
        if e.is_timeout() {
            tracing::warn!(error = %e, "Query resolution timed out");
        } else {
            tracing::error!(error = %e, "Query resolution failed");
        }
        api_error(status, e.public_message())
    })
}

fn resolve_status(err: &ResolveError) -> StatusCode {
    if err.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// POST /query
pub async fn handle_query(
    State(resolver): State<Arc<IntentResolver>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = resolve_request(&resolver, payload).await?;
    Ok(Json(QueryResponse {
        response: query.response,
    }))
}

/// POST /query/explain
pub async fn explain_query(
    State(resolver): State<Arc<IntentResolver>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<Query>, ApiError> {
    resolve_request(&resolver, payload).await.map(Json)
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn create_query_router(resolver: Arc<IntentResolver>) -> Router {
    Router::new()
        .route("/query", post(handle_query))
        .route("/query/explain", post(explain_query))
        .route("/health", get(health))
        .with_state(resolver)
}
