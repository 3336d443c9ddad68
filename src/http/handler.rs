//! Request handlers.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::request::{request_id, visitor_from_headers};
use crate::http::response::{ApiError, CorsJson, VisitorCountBody};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Count one visit and return the updated total.
pub async fn count_visit(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let visitor = visitor_from_headers(&headers);

    match state.counter.record_visit(&visitor).await {
        Ok(visitor_count) => {
            tracing::info!(
                request_id = %request_id,
                ip = %visitor.ip,
                visitor_count,
                "Visit counted"
            );
            metrics::record_request(200, start_time);
            CorsJson(StatusCode::OK, VisitorCountBody { visitor_count }).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                ip = %visitor.ip,
                operation = e.operation(),
                error = %e,
                "Store operation failed"
            );
            metrics::record_store_error(e.operation());
            metrics::record_request(500, start_time);
            ApiError(e).into_response()
        }
    }
}

/// Liveness probe. Does not touch the store.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
