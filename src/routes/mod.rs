//! Router assembly.

mod clinic;
mod common;

pub use clinic::clinic_routes;
pub use common::common_routes_with_ready;

use crate::state::AppState;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Full application: common routes, `/api` resources and uploaded files.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.dir.clone());
    let upload_prefix = state.uploads.url_prefix.clone();
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api", clinic_routes(state))
        .nest_service(&upload_prefix, uploads)
        .layer(TraceLayer::new_for_http())
}
