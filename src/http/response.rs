//! Response shaping.
//!
//! Every counter response is JSON and carries `Access-Control-Allow-Origin: *`,
//! success or failure.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::observability::metrics;
use crate::store::StoreError;

/// Success body: `{"visitor_count": <n>}`.
#[derive(Debug, Serialize)]
pub struct VisitorCountBody {
    pub visitor_count: i64,
}

/// Failure body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// JSON response with the permissive CORS header.
pub struct CorsJson<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for CorsJson<T> {
    fn into_response(self) -> Response {
        (
            self.0,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
            Json(self.1),
        )
            .into_response()
    }
}

/// A store failure surfaced to the caller.
///
/// The store's message is returned verbatim.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        CorsJson(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                error: self.0.to_string(),
            },
        )
        .into_response()
    }
}

/// Give the bare 408 produced by the timeout layer the same JSON and CORS
/// shape as every other counter response. Other responses pass through.
pub async fn timeout_as_json(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!("Request timed out");
    metrics::record_timeout();
    CorsJson(
        StatusCode::REQUEST_TIMEOUT,
        ErrorBody {
            error: "request timed out".to_string(),
        },
    )
    .into_response()
}
