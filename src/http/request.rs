//! Request inspection.
//!
//! # Responsibilities
//! - Identify the visitor (client IP, user agent) from request headers
//! - Read the request ID assigned by the request-id layer
//!
//! # Design Decisions
//! - Header names are case-insensitive; values that are not visible ASCII count as absent
//! - Missing values become the literal "unknown"

use axum::http::{header, HeaderMap};

use crate::visits::model::{Visitor, UNKNOWN};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header value as a string, if present and visible ASCII.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// First hop of an `X-Forwarded-For` value.
pub fn client_ip(forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Build the visitor identity from request headers.
pub fn visitor_from_headers(headers: &HeaderMap) -> Visitor {
    Visitor {
        ip: client_ip(header_str(headers, X_FORWARDED_FOR)),
        user_agent: header_str(headers, header::USER_AGENT.as_str())
            .unwrap_or(UNKNOWN)
            .to_string(),
    }
}

pub fn request_id(headers: &HeaderMap) -> &str {
    header_str(headers, X_REQUEST_ID).unwrap_or(UNKNOWN)
}
