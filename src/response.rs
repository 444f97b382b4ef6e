//! Response bodies and CORS headers shared by the sync endpoint.

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, X-User-Id, X-Auth-Token, X-Session-Id";
/// Preflight cache lifetime: 24 hours.
pub const MAX_AGE_SECS: &str = "86400";

pub const SAVED_MESSAGE: &str = "Data saved successfully";

#[derive(Serialize)]
pub struct SaveAck {
    pub success: bool,
    pub message: &'static str,
}

/// `{"error": ...}` body for requests that never reach a handler.
#[derive(Serialize)]
pub struct RouteError {
    pub error: &'static str,
}

pub fn saved() -> (StatusCode, Json<SaveAck>) {
    (
        StatusCode::OK,
        Json(SaveAck {
            success: true,
            message: SAVED_MESSAGE,
        }),
    )
}

pub fn method_not_allowed() -> (StatusCode, Json<RouteError>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(RouteError {
            error: "Method not allowed",
        }),
    )
}

pub fn not_found() -> (StatusCode, Json<RouteError>) {
    (StatusCode::NOT_FOUND, Json(RouteError { error: "Not found" }))
}

/// 200 with empty body and the CORS preflight headers.
pub fn preflight() -> Response {
    let headers: [(HeaderName, HeaderValue); 5] = [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
        (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
        (header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS)),
        (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
    ];
    (StatusCode::OK, headers).into_response()
}
