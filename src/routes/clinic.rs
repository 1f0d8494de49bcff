//! Resource routes, mounted under `/api`.

use crate::error::AppError;
use crate::handlers::{appointments, auth, bookings, doctors, drugs, queue};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

pub fn clinic_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route(
            "/doctors/:id",
            get(doctors::read).put(doctors::update).delete(doctors::remove),
        )
        .merge(avatar_routes(state.uploads.max_bytes))
        .route(
            "/appointments/:id",
            get(appointments::read)
                .put(appointments::update)
                .patch(appointments::change_status)
                .delete(appointments::remove),
        )
        .route("/appointment-queue", get(queue::list).post(queue::arrange))
        .route("/appointment-queue/current", get(queue::current))
        .route("/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/bookings/:id",
            get(bookings::read)
                .put(bookings::update)
                .patch(bookings::change_status),
        )
        .route("/drugs", get(drugs::list))
        .route("/drugs/:id", get(drugs::read))
        .with_state(state)
}

/// Avatar upload with its own body cap; the cap only applies to this route.
fn avatar_routes(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route("/doctors/:id/avatar", post(doctors::upload_avatar))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(RequestBodyLimitLayer::new(max_upload))
        .layer(middleware::map_response(oversized_as_envelope))
}

/// `RequestBodyLimitLayer` answers 413 with a plain-text body; callers expect the envelope.
async fn oversized_as_envelope(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge(doctors::PHOTO_TOO_LARGE.into()).into_response();
    }
    response
}
