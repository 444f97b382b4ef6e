//! Router assembly.

pub mod common;
pub mod sync;

pub use common::common_routes;
pub use sync::sync_routes;

use crate::handlers::not_found;
use crate::response::ALLOW_ORIGIN;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Full application: sync endpoint on `/` plus common routes. Every response allows any origin
/// and carries a JSON body; unknown paths get a JSON 404.
pub fn app(state: AppState) -> Router {
    let max_body = state.settings.max_body_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(sync_routes(state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
}
