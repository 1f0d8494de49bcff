//! Daily appointment queue: listing, manual arrangement, current/next lookup.

use super::load_doctor;
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::model::{Appointment, AppointmentStatus, QueueView, Role};
use crate::response::Envelope;
use crate::service::validation::{parse_flexible_date, parse_ref_id};
use crate::service::{field_string, is_staff, require_role};
use crate::sql::{Direction, Page, SortOrder};
use crate::state::AppState;
use crate::store::AppointmentFilter;
use axum::extract::{Query, State};
use serde_json::Value;
use std::collections::HashMap;

pub const ORDER_COLUMNS: &[&str] = &[
    "id",
    "patient_name",
    "patient_phone",
    "position",
    "appointment_time",
    "date",
    "status",
    "created_at",
];

fn queue_order() -> SortOrder {
    SortOrder::by("position", Direction::Asc).then("id", Direction::Asc)
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// GET /api/appointment-queue
pub async fn list(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Envelope<Vec<Appointment>>, AppError> {
    let mut msg = String::from("All appointments");

    let date = match param(&params, "date") {
        Some(raw) => {
            let date = parse_flexible_date(raw)
                .ok_or_else(|| AppError::Validation("Date is not valid".into()))?;
            msg.push_str(&format!(" at {}", raw));
            date
        }
        None => state.clock.today(),
    };

    let doctor_id = match param(&params, "doctor_id") {
        Some(raw) if is_staff(&actor) => {
            let missing = || AppError::NotFound("Doctor is not available".into());
            let id = parse_ref_id(raw).ok_or_else(missing)?;
            let doctor = load_doctor(state.store.as_ref(), id, "Doctor is not available").await?;
            msg.push_str(&format!(" - doctor ID: {} - {}", doctor.id, doctor.name));
            doctor.id
        }
        _ => actor.id,
    };

    let filter = AppointmentFilter {
        doctor_id,
        date,
        search: param(&params, "search").map(str::to_string),
        status: param(&params, "status").map(str::to_string),
        order: SortOrder::resolve(
            param(&params, "order[column]"),
            param(&params, "order[dir]"),
            ORDER_COLUMNS,
            "position",
            queue_order(),
        ),
        page: Page::from_raw(param(&params, "length"), param(&params, "start")),
    };
    let rows = state.store.list_appointments(&filter).await?;
    Ok(Envelope::many(msg, rows))
}

/// Positive integer ids from a JSON array; numeric strings are accepted, anything else is skipped.
/// `None` when the queue is not an array.
fn parse_queue(value: &Value) -> Option<Vec<i64>> {
    let ids = value
        .as_array()?
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_i64().filter(|n| *n > 0),
            Value::String(s) => parse_ref_id(s),
            _ => None,
        })
        .collect();
    Some(ids)
}

fn queue_is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// POST /api/appointment-queue with `{doctor_id, queue: [ids]}`: reorder today's queue.
pub async fn arrange(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(body): JsonBody,
) -> Result<Envelope<()>, AppError> {
    require_role(
        &actor,
        &[Role::Admin, Role::Supporter],
        "Only admin, supporter can arrange appointments",
    )?;
    let raw_doctor = field_string(&body, "doctor_id")
        .ok_or_else(|| AppError::Validation("Missing field: doctor_id".into()))?;
    if queue_is_missing(body.get("queue")) {
        return Err(AppError::Validation("Missing field: queue".into()));
    }

    let missing = || AppError::NotFound("Doctor is not available !".into());
    let doctor_id = parse_ref_id(&raw_doctor).ok_or_else(missing)?;
    let doctor = load_doctor(state.store.as_ref(), doctor_id, "Doctor is not available !").await?;
    if !doctor.active {
        return Err(AppError::Conflict(
            "This doctor account was deactivated. No need this action !".into(),
        ));
    }

    let ids = body
        .get("queue")
        .and_then(parse_queue)
        .ok_or_else(|| AppError::Validation("Queue's format is not valid.".into()))?;
    let changed = state
        .store
        .arrange_queue(doctor_id, state.clock.today(), &ids)
        .await?;
    tracing::info!(doctor_id, requested = ids.len(), changed, by = actor.id, "queue arranged");
    Ok(Envelope::ok("Appointments have been updated their positions"))
}

/// GET /api/appointment-queue/current
pub async fn current(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Envelope<QueueView>, AppError> {
    let doctor = if actor.role == Role::Member {
        actor
    } else {
        let raw = param(&params, "doctor_id").ok_or_else(|| AppError::Validation("Missing doctor ID".into()))?;
        let missing = || AppError::NotFound("Doctor is not available".into());
        let id = parse_ref_id(raw).ok_or_else(missing)?;
        load_doctor(state.store.as_ref(), id, "Doctor is not available").await?
    };

    let filter = AppointmentFilter {
        doctor_id: doctor.id,
        date: state.clock.today(),
        search: None,
        status: Some(AppointmentStatus::Processing.to_string()),
        order: queue_order(),
        page: Page::default(),
    };
    let view = QueueView::from_ordered(state.store.list_appointments(&filter).await?);
    let position = |a: &Option<Appointment>| {
        a.as_ref()
            .map(|a| a.position.to_string())
            .unwrap_or_else(|| "none".into())
    };
    let msg = format!(
        "Doctor {} : current {} - next {}",
        doctor.name,
        position(&view.current),
        position(&view.next)
    );
    Ok(Envelope::ok(msg).with_data(view))
}
