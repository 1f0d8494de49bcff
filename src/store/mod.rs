//! Storage seam between handlers and the database.

mod postgres;

pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{
    Appointment, AppointmentChanges, AppointmentStatus, Booking, BookingInput, BookingStatus, Doctor,
    DoctorChanges, Drug, Reference, VerifiedBooking,
};
use crate::sql::{Page, SortOrder};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Filters for one doctor's appointments on one day.
#[derive(Clone, Debug)]
pub struct AppointmentFilter {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub search: Option<String>,
    /// Raw status text; a value that is no known status matches nothing.
    pub status: Option<String>,
    pub order: SortOrder,
    pub page: Page,
}

#[derive(Clone, Debug)]
pub struct BookingFilter {
    pub doctor_id: Option<i64>,
    pub service_id: Option<i64>,
    pub status: Option<String>,
    pub appointment_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub order: SortOrder,
    pub page: Page,
}

/// Outcome of removing a doctor account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoctorRemoval {
    /// Had appointments: account deactivated, processing appointments cancelled.
    Deactivated,
    /// No appointments: row deleted.
    Deleted,
}

#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn exists(&self, reference: Reference, id: i64) -> Result<bool, AppError>;

    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>, AppError>;

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, AppError>;

    async fn update_doctor(&self, id: i64, changes: &DoctorChanges) -> Result<Doctor, AppError>;

    async fn set_doctor_avatar(&self, id: i64, avatar: &str) -> Result<(), AppError>;

    /// Deactivate or delete in one transaction depending on whether the doctor has appointments.
    async fn remove_doctor(&self, id: i64) -> Result<DoctorRemoval, AppError>;

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, AppError>;

    /// Applies only while the row is processing and dated `today`; otherwise `Conflict`.
    async fn update_appointment(
        &self,
        id: i64,
        today: NaiveDate,
        changes: &AppointmentChanges,
    ) -> Result<Appointment, AppError>;

    /// Same guard as [`ClinicStore::update_appointment`].
    async fn set_appointment_status(
        &self,
        id: i64,
        today: NaiveDate,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError>;

    /// `Conflict` when the appointment is done.
    async fn delete_appointment(&self, id: i64) -> Result<(), AppError>;

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError>;

    /// Assign position `i + 1` to `ids[i]` where it belongs to the doctor on `date`. Returns rows changed.
    async fn arrange_queue(&self, doctor_id: i64, date: NaiveDate, ids: &[i64]) -> Result<u64, AppError>;

    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, AppError>;

    async fn insert_booking(&self, input: &BookingInput) -> Result<Booking, AppError>;

    /// Applies only while the booking is processing; otherwise `Conflict`.
    async fn update_booking(&self, id: i64, input: &BookingInput) -> Result<Booking, AppError>;

    /// Moves a processing booking to `status`; any other current status is a `Conflict`.
    async fn set_booking_status(&self, id: i64, status: BookingStatus) -> Result<Booking, AppError>;

    /// Create the patient if needed, queue an appointment and mark the booking verified, atomically.
    async fn verify_booking(&self, id: i64) -> Result<VerifiedBooking, AppError>;

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;

    async fn find_drug(&self, id: i64) -> Result<Option<Drug>, AppError>;

    async fn list_drugs(&self, search: Option<&str>) -> Result<Vec<Drug>, AppError>;
}
