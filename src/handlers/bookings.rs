//! Booking handlers: list, create, read, edit and the verify/cancel transition.

use super::{load_doctor, optional_reference, required_reference};
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::model::{Booking, BookingInput, BookingStatus, Reference, Role, VerifiedBooking, ONLY_PROCESSING};
use crate::response::{Envelope, ACTION_SUCCESS};
use crate::service::access::STAFF_ONLY;
use crate::service::validation::{
    check_phone, is_address, is_vietnamese_name, parse_date, parse_gender, parse_id, parse_ref_id, parse_time,
};
use crate::service::{field_string, is_staff, require_role, Body, RequestValidator};
use crate::sql::{Direction, Page, SortOrder};
use crate::state::AppState;
use crate::store::BookingFilter;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;

const STAFF: &[Role] = &[Role::Admin, Role::Supporter];

pub const ORDER_COLUMNS: &[&str] = &[
    "id",
    "booking_name",
    "name",
    "appointment_date",
    "appointment_time",
    "status",
    "created_at",
];

const REQUIRED: &[&str] = &[
    "service_id",
    "booking_name",
    "booking_phone",
    "name",
    "appointment_time",
    "appointment_date",
];

fn invalid(msg: &str) -> AppError {
    AppError::Validation(msg.to_string())
}

/// Apply the booking field rules in order and build the row input.
async fn validate_booking(state: &AppState, body: &Body) -> Result<BookingInput, AppError> {
    let store = state.store.as_ref();
    RequestValidator::require(body, REQUIRED)?;

    let service_id = required_reference(
        store,
        &field_string(body, "service_id").unwrap_or_default(),
        Reference::Service,
        "Service is not available",
    )
    .await?;
    let doctor_id = match field_string(body, "doctor_id") {
        None => None,
        Some(raw) => {
            let missing = || AppError::NotFound("Doctor is not available".into());
            let id = parse_ref_id(&raw).ok_or_else(missing)?;
            Some(load_doctor(store, id, "Doctor is not available").await?.id)
        }
    };
    let patient_id = optional_reference(
        store,
        field_string(body, "patient_id"),
        Reference::Patient,
        "Patient is not available",
    )
    .await?;

    let booking_name = field_string(body, "booking_name").unwrap_or_default();
    if !is_vietnamese_name(&booking_name) {
        return Err(invalid("( Booking name ) Vietnamese name only has letters and space"));
    }
    let booking_phone = field_string(body, "booking_phone").unwrap_or_default();
    check_phone(&booking_phone, "Booking phone", "Booking number")?;
    let name = field_string(body, "name").unwrap_or_default();
    if !is_vietnamese_name(&name) {
        return Err(invalid("( Name ) Vietnamese name only has letters and space"));
    }

    let gender = field_string(body, "gender").map(|g| parse_gender(&g)).transpose()?;
    let birthday = match field_string(body, "birthday") {
        None => None,
        Some(raw) => {
            let birthday = parse_date(&raw).ok_or_else(|| invalid("Birthday is not valid"))?;
            if birthday >= state.clock.today() {
                return Err(invalid("Birthday must be before today !"));
            }
            Some(birthday)
        }
    };
    let address = field_string(body, "address");
    if let Some(a) = &address {
        if !is_address(a) {
            return Err(invalid("Address only accepts letters, space & number"));
        }
    }

    let appointment_date = parse_date(&field_string(body, "appointment_date").unwrap_or_default())
        .ok_or_else(|| invalid("Appointment date is not valid"))?;
    let appointment_time = parse_time(&field_string(body, "appointment_time").unwrap_or_default())
        .ok_or_else(|| invalid("Appointment time is not valid"))?;
    if appointment_date.and_time(appointment_time) <= state.clock.now() {
        return Err(invalid("Appointment time must be later than now !"));
    }

    Ok(BookingInput {
        service_id,
        doctor_id,
        patient_id,
        booking_name,
        booking_phone,
        name,
        gender,
        birthday,
        address,
        reason: field_string(body, "reason"),
        appointment_date,
        appointment_time,
    })
}

fn congratulation(booking: &Booking, verb: &str) -> String {
    format!(
        "Congratulation, {}! This booking at {} {} has been {} successfully.",
        booking.booking_name,
        booking.appointment_time.format("%H:%M"),
        booking.appointment_date,
        verb
    )
}

async fn load(state: &AppState, id: i64, msg: &str) -> Result<Booking, AppError> {
    state
        .store
        .find_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFound(msg.to_string()))
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// GET /api/bookings
pub async fn list(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Envelope<Vec<Booking>>, AppError> {
    // Unparsable numeric filters match nothing rather than being ignored.
    let id_filter = |key: &str| param(&params, key).map(|raw| parse_ref_id(raw).unwrap_or(0));
    let doctor_id = if is_staff(&actor) {
        id_filter("doctor_id")
    } else {
        Some(actor.id)
    };
    let appointment_date = match param(&params, "appointment_date") {
        None => None,
        Some(raw) => Some(parse_date(raw).ok_or_else(|| invalid("Appointment date is not valid"))?),
    };

    let filter = BookingFilter {
        doctor_id,
        service_id: id_filter("service_id"),
        status: param(&params, "status").map(str::to_string),
        appointment_date,
        search: param(&params, "search").map(str::to_string),
        order: SortOrder::resolve(
            param(&params, "order[column]"),
            param(&params, "order[dir]"),
            ORDER_COLUMNS,
            "id",
            SortOrder::by("id", Direction::Desc),
        ),
        page: Page::from_raw(param(&params, "length"), param(&params, "start")),
    };
    let rows = state.store.list_bookings(&filter).await?;
    Ok(Envelope::many("All bookings", rows))
}

/// POST /api/bookings
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Booking>, AppError> {
    require_role(&actor, STAFF, STAFF_ONLY)?;
    let input = validate_booking(&state, &body).await?;
    let booking = state.store.insert_booking(&input).await?;
    tracing::info!(booking_id = booking.id, by = actor.id, "booking created");
    Ok(Envelope::created(congratulation(&booking, "created")).with_data(booking))
}

/// GET /api/bookings/:id
pub async fn read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Envelope<Booking>, AppError> {
    require_role(&actor, STAFF, STAFF_ONLY)?;
    let id = parse_id(&raw_id)?;
    let booking = load(&state, id, "Booking is not available").await?;
    Ok(Envelope::ok(ACTION_SUCCESS).with_data(booking))
}

/// PUT /api/bookings/:id: only while the booking is processing.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Booking>, AppError> {
    require_role(&actor, STAFF, STAFF_ONLY)?;
    let id = parse_id(&raw_id)?;
    let current = load(&state, id, "This booking does not exist !").await?;
    current.ensure_processing()?;
    let input = validate_booking(&state, &body).await?;
    let booking = state.store.update_booking(id, &input).await?;
    tracing::info!(booking_id = id, by = actor.id, "booking updated");
    Ok(Envelope::ok(congratulation(&booking, "updated")).with_data(booking))
}

/// PATCH /api/bookings/:id with `{newStatus}`: processing → verified | cancelled.
pub async fn change_status(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    require_role(&actor, STAFF, STAFF_ONLY)?;
    let id = parse_id(&raw_id)?;
    let current = load(&state, id, "This booking does not exist !").await?;

    let raw = field_string(&body, "newStatus")
        .ok_or_else(|| invalid("New status is required to continue !"))?;
    let target = raw
        .parse::<BookingStatus>()
        .ok()
        .filter(|s| *s != BookingStatus::Processing)
        .ok_or_else(|| invalid("Booking is only updated when its new status is verified or cancelled !"))?;
    if current.status != BookingStatus::Processing {
        return Err(AppError::Conflict(ONLY_PROCESSING.into()));
    }

    let response = match target {
        BookingStatus::Cancelled => {
            let booking = state.store.set_booking_status(id, BookingStatus::Cancelled).await?;
            tracing::info!(booking_id = id, by = actor.id, "booking cancelled");
            Envelope::ok("Booking has been cancelled successfully !")
                .with_data(booking)
                .into_response()
        }
        _ => {
            if current.doctor_id.is_none() {
                return Err(invalid(
                    "Booking does not have a doctor yet. Please, assign one before verifying !",
                ));
            }
            let verified: VerifiedBooking = state.store.verify_booking(id).await?;
            tracing::info!(
                booking_id = id,
                appointment_id = verified.appointment.id,
                by = actor.id,
                "booking verified"
            );
            Envelope::ok(
                "Booking has been verified successfully ! VERIFIED this booking will create a new appointment",
            )
            .with_data(verified)
            .into_response()
        }
    };
    Ok(response)
}
