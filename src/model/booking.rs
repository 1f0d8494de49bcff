use super::{Appointment, BookingStatus};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub service_id: i64,
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub booking_name: String,
    pub booking_phone: String,
    /// Name of the person to be examined; may differ from who booked.
    pub name: String,
    /// 0 female, 1 male.
    pub gender: Option<i16>,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub reason: Option<String>,
    pub appointment_date: NaiveDate,
    #[serde(serialize_with = "serialize_hour_minute")]
    pub appointment_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status transitions start from `processing` only.
pub const ONLY_PROCESSING: &str =
    "You don't have permission to do this action. Only booking's status is processing can do this action !";

impl Booking {
    /// Edits are allowed while the booking is still processing.
    pub fn ensure_processing(&self) -> Result<(), AppError> {
        if self.status == BookingStatus::Processing {
            return Ok(());
        }
        Err(AppError::Conflict(format!(
            "Booking's status is {} now ! You can't do this action !",
            self.status
        )))
    }
}

fn serialize_hour_minute<S: serde::Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&t.format("%H:%M"))
}

/// Validated booking body used for both create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingInput {
    pub service_id: i64,
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub booking_name: String,
    pub booking_phone: String,
    pub name: String,
    pub gender: Option<i16>,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub reason: Option<String>,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

/// Result of verifying a booking: the booking and the appointment it produced.
#[derive(Clone, Debug, Serialize)]
pub struct VerifiedBooking {
    pub booking: Booking,
    pub appointment: Appointment,
}
