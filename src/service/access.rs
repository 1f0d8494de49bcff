//! Role gates and appointment ownership.

use crate::error::AppError;
use crate::model::{Appointment, Doctor, Role};
use crate::store::ClinicStore;

pub const ADMIN_ONLY: &str = "You are not admin & you can't do this action !";
pub const STAFF_ONLY: &str = "You don't have permission to do this action !";

/// Reject with `Forbidden(msg)` unless the actor's role is in `allowed`.
pub fn require_role(actor: &Doctor, allowed: &[Role], msg: &str) -> Result<(), AppError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(msg.to_string()))
    }
}

pub fn is_staff(actor: &Doctor) -> bool {
    matches!(actor.role, Role::Admin | Role::Supporter)
}

/// Members may only act on their own appointments.
pub async fn check_ownership(
    store: &dyn ClinicStore,
    actor: &Doctor,
    appointment: &Appointment,
) -> Result<(), AppError> {
    if actor.role != Role::Member || appointment.doctor_id == actor.id {
        return Ok(());
    }
    let owner = store
        .find_doctor(appointment.doctor_id)
        .await?
        .map(|d| d.name)
        .unwrap_or_else(|| format!("#{}", appointment.doctor_id));
    Err(AppError::Forbidden(format!(
        "This appointment belongs to doctor {}. You can't do this action !",
        owner
    )))
}
