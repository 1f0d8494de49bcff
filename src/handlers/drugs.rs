//! Drug catalogue lookups.

use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::model::Drug;
use crate::response::{Envelope, ACTION_SUCCESS};
use crate::service::validation::parse_id;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use std::collections::HashMap;

/// GET /api/drugs?search=
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Envelope<Vec<Drug>>, AppError> {
    let search = params.get("search").map(|s| s.trim()).filter(|s| !s.is_empty());
    let rows = state.store.list_drugs(search).await?;
    Ok(Envelope::many("All drugs", rows))
}

/// GET /api/drugs/:id
pub async fn read(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Envelope<Drug>, AppError> {
    let id = parse_id(&raw_id)?;
    let drug = state
        .store
        .find_drug(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Drug not found".into()))?;
    Ok(Envelope::ok(ACTION_SUCCESS).with_data(drug))
}
