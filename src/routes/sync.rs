//! Sync endpoint: one path, dispatched by method. Anything other than GET, POST or OPTIONS gets 405.
//! HEAD is listed explicitly since axum would otherwise answer it with the GET handler.

use crate::handlers::{handle_preflight, handle_read, handle_write, method_not_allowed};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn sync_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handle_read)
                .post(handle_write)
                .options(handle_preflight)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}
