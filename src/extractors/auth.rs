//! Resolve the calling doctor from `Authorization: Bearer <token>`.

use crate::error::AppError;
use crate::model::Doctor;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// The authenticated, active doctor making the request. Role checks use this row, not the token claims.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Doctor);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(AppError::unauthorized)?;
        let claims = state.tokens.verify(token)?;
        let doctor = state
            .store
            .find_doctor(claims.sub)
            .await?
            .filter(|d| d.active)
            .ok_or_else(AppError::unauthorized)?;
        Ok(AuthUser(doctor))
    }
}
