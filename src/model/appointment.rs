use super::AppointmentStatus;
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub booking_id: Option<i64>,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_birthday: Option<NaiveDate>,
    pub patient_reason: Option<String>,
    pub date: NaiveDate,
    pub appointment_time: Option<NaiveDateTime>,
    pub status: AppointmentStatus,
    /// Manually arranged order in the doctor's daily queue.
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A finished appointment may not be deleted.
pub const DONE_NOT_DELETABLE: &str = "Appointment's status is done now. You can not delete!";

impl Appointment {
    /// Only today's processing appointments may change.
    pub fn ensure_editable(&self, today: NaiveDate) -> Result<(), AppError> {
        if self.status != AppointmentStatus::Processing {
            return Err(AppError::Conflict(format!(
                "Appointment's status is {} ! You can't do this action !",
                self.status
            )));
        }
        if self.date != today {
            return Err(AppError::Conflict(format!(
                "Today is {} but this appointment's is {} ! You can't do this action !",
                today, self.date
            )));
        }
        Ok(())
    }
}

/// Validated PUT body for an appointment. Optional fields keep the stored value when `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppointmentChanges {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_birthday: Option<NaiveDate>,
    pub patient_reason: Option<String>,
    pub appointment_time: Option<NaiveDateTime>,
}

/// Today's processing queue of one doctor, split by position.
#[derive(Clone, Debug, Serialize)]
pub struct QueueView {
    pub current: Option<Appointment>,
    pub next: Option<Appointment>,
    pub waiting: Vec<Appointment>,
}

impl QueueView {
    /// `rows` must already be ordered by position.
    pub fn from_ordered(rows: Vec<Appointment>) -> Self {
        let mut iter = rows.into_iter();
        let current = iter.next();
        let next = iter.next();
        QueueView {
            current,
            next,
            waiting: iter.collect(),
        }
    }
}
