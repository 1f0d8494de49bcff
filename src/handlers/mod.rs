//! HTTP handlers for the clinic resources.

pub mod appointments;
pub mod auth;
pub mod bookings;
pub mod doctors;
pub mod drugs;
pub mod queue;

use crate::error::AppError;
use crate::model::{Doctor, Reference};
use crate::service::validation::parse_ref_id;
use crate::store::ClinicStore;

/// Doctor row or `NotFound(msg)`.
pub(crate) async fn load_doctor(store: &dyn ClinicStore, id: i64, msg: &str) -> Result<Doctor, AppError> {
    store
        .find_doctor(id)
        .await?
        .ok_or_else(|| AppError::NotFound(msg.to_string()))
}

/// Resolve an optional foreign-key field: absent stays `None`, present must name an existing row.
pub(crate) async fn optional_reference(
    store: &dyn ClinicStore,
    raw: Option<String>,
    reference: Reference,
    msg: &str,
) -> Result<Option<i64>, AppError> {
    match raw {
        None => Ok(None),
        Some(raw) => required_reference(store, &raw, reference, msg).await.map(Some),
    }
}

pub(crate) async fn required_reference(
    store: &dyn ClinicStore,
    raw: &str,
    reference: Reference,
    msg: &str,
) -> Result<i64, AppError> {
    let missing = || AppError::NotFound(msg.to_string());
    let id = parse_ref_id(raw).ok_or_else(missing)?;
    if store.exists(reference, id).await? {
        Ok(id)
    } else {
        Err(missing())
    }
}
