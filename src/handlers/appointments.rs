//! Appointment handlers: read, edit, status change, delete.

use super::{load_doctor, required_reference};
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::model::{Appointment, AppointmentChanges, AppointmentStatus, Reference, Role, DONE_NOT_DELETABLE};
use crate::response::{Envelope, ACTION_SUCCESS};
use crate::service::validation::{
    check_phone, is_vietnamese_name, parse_datetime, parse_date, parse_id, parse_ref_id,
};
use crate::service::{check_ownership, field_string, require_role, RequestValidator};
use crate::state::AppState;
use axum::extract::{Path, State};

async fn load(state: &AppState, id: i64) -> Result<Appointment, AppError> {
    state
        .store
        .find_appointment(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Appointment is not available".into()))
}

/// GET /api/appointments/:id
pub async fn read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Envelope<Appointment>, AppError> {
    let id = parse_id(&raw_id)?;
    let appointment = load(&state, id).await?;
    check_ownership(state.store.as_ref(), &actor, &appointment).await?;
    Ok(Envelope::ok(ACTION_SUCCESS).with_data(appointment))
}

/// PUT /api/appointments/:id
pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Appointment>, AppError> {
    let id = parse_id(&raw_id)?;
    let store = state.store.as_ref();
    let appointment = load(&state, id).await?;
    check_ownership(store, &actor, &appointment).await?;
    let today = state.clock.today();
    appointment.ensure_editable(today)?;

    RequestValidator::require(&body, &["doctor_id", "patient_id", "patient_name", "patient_phone"])?;

    let doctor_not_found = || AppError::NotFound("Doctor is not available".into());
    let doctor_id = field_string(&body, "doctor_id")
        .as_deref()
        .and_then(parse_ref_id)
        .ok_or_else(doctor_not_found)?;
    load_doctor(store, doctor_id, "Doctor is not available").await?;
    if actor.role == Role::Member && doctor_id != actor.id {
        return Err(AppError::Forbidden(
            "You can't assign this appointment to another doctor !".into(),
        ));
    }

    let patient_id = required_reference(
        store,
        &field_string(&body, "patient_id").unwrap_or_default(),
        Reference::Patient,
        "Patient is not available",
    )
    .await?;

    let patient_name = field_string(&body, "patient_name").unwrap_or_default();
    if !is_vietnamese_name(&patient_name) {
        return Err(AppError::Validation(
            "( Patient name ) Vietnamese name only has letters and space".into(),
        ));
    }
    let patient_phone = field_string(&body, "patient_phone").unwrap_or_default();
    check_phone(&patient_phone, "Patient phone number", "Patient phone number")?;

    let patient_birthday = match field_string(&body, "patient_birthday") {
        None => None,
        Some(raw) => {
            let birthday = parse_date(&raw)
                .ok_or_else(|| AppError::Validation("Invalid birthday format".into()))?;
            if birthday >= state.clock.today() {
                return Err(AppError::Validation("Patient birthday must be before today !".into()));
            }
            Some(birthday)
        }
    };

    let appointment_time = match field_string(&body, "appointment_time") {
        None => None,
        Some(raw) => {
            let at = parse_datetime(&raw)
                .ok_or_else(|| AppError::Validation("Invalid appointment time format".into()))?;
            if at <= state.clock.now() {
                return Err(AppError::Validation("Appointment time must be later than now !".into()));
            }
            Some(at)
        }
    };

    let changes = AppointmentChanges {
        doctor_id,
        patient_id,
        patient_name,
        patient_phone,
        patient_birthday,
        patient_reason: field_string(&body, "patient_reason"),
        appointment_time,
    };
    let updated = store.update_appointment(id, today, &changes).await?;
    tracing::info!(appointment_id = id, by = actor.id, "appointment updated");
    Ok(Envelope::ok("Appointment has been updated successfully !").with_data(updated))
}

/// PATCH /api/appointments/:id with `{status}`: processing → done | cancelled.
pub async fn change_status(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Appointment>, AppError> {
    let id = parse_id(&raw_id)?;
    let appointment = load(&state, id).await?;
    check_ownership(state.store.as_ref(), &actor, &appointment).await?;

    let raw = field_string(&body, "status")
        .ok_or_else(|| AppError::Validation("Missing new status".into()))?;
    let status = raw
        .parse::<AppointmentStatus>()
        .ok()
        .filter(|s| matches!(s, AppointmentStatus::Done | AppointmentStatus::Cancelled))
        .ok_or_else(|| {
            AppError::Validation(
                "The new status of appointment is not valid. Valid values: done, cancelled !".into(),
            )
        })?;
    let today = state.clock.today();
    appointment.ensure_editable(today)?;

    let updated = state.store.set_appointment_status(id, today, status).await?;
    tracing::info!(appointment_id = id, status = %status, by = actor.id, "appointment status changed");
    Ok(Envelope::ok("The status of appointment has been updated successfully !").with_data(updated))
}

/// DELETE /api/appointments/:id: admin only, never a finished appointment.
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Envelope<()>, AppError> {
    require_role(
        &actor,
        &[Role::Admin],
        "You are member or supporter & you can't do this action !",
    )?;
    let id = parse_id(&raw_id)?;
    let appointment = load(&state, id).await?;
    if appointment.status == AppointmentStatus::Done {
        return Err(AppError::Conflict(DONE_NOT_DELETABLE.into()));
    }
    state.store.delete_appointment(id).await?;
    tracing::info!(appointment_id = id, by = actor.id, "appointment deleted");
    Ok(Envelope::ok("Appointment is deleted successfully !"))
}
