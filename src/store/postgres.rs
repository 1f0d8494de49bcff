//! PostgreSQL implementation of [`ClinicStore`].

use super::{AppointmentFilter, BookingFilter, ClinicStore, DoctorRemoval};
use crate::error::AppError;
use crate::model::{
    Appointment, AppointmentChanges, AppointmentStatus, Booking, BookingInput, BookingStatus, Doctor,
    DoctorChanges, Drug, Reference, VerifiedBooking, DONE_NOT_DELETABLE, ONLY_PROCESSING,
};
use crate::sql::{Direction, ListQuery, QueryBuf, SortOrder};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

const DOCTOR_SELECT: &str = "SELECT d.id, d.email, d.phone, d.password_hash, d.name, d.description, d.price, \
     d.role, d.avatar, d.active, d.speciality_id, d.room_id, s.name AS speciality_name, r.name AS room_name, \
     d.created_at, d.updated_at \
     FROM doctors d \
     LEFT JOIN specialities s ON s.id = d.speciality_id \
     LEFT JOIN rooms r ON r.id = d.room_id";

const APPOINTMENT_COLUMNS: &str = "id, doctor_id, patient_id, booking_id, patient_name, patient_phone, \
     patient_birthday, patient_reason, date, appointment_time, status, position, created_at, updated_at";

const BOOKING_COLUMNS: &str = "id, service_id, doctor_id, patient_id, booking_name, booking_phone, name, \
     gender, birthday, address, reason, appointment_date, appointment_time, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_list<T>(&self, buf: QueryBuf) -> Result<Vec<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %buf.sql, params = ?buf.params, "list query");
        let mut q = sqlx::query_as::<_, T>(&buf.sql);
        for p in buf.params {
            q = q.bind(p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }
}

const APPOINTMENT_MISSING: &str = "Appointment is not available";
const BOOKING_MISSING: &str = "This booking does not exist !";

fn not_found(msg: &str) -> AppError {
    AppError::NotFound(msg.to_string())
}

impl PgStore {
    /// Why a guarded appointment write matched no row.
    async fn appointment_conflict(&self, id: i64, today: NaiveDate) -> AppError {
        match self.find_appointment(id).await {
            Ok(Some(current)) => current
                .ensure_editable(today)
                .err()
                .unwrap_or_else(|| not_found(APPOINTMENT_MISSING)),
            Ok(None) => not_found(APPOINTMENT_MISSING),
            Err(e) => e,
        }
    }

    /// Why a guarded booking write matched no row. `conflict` builds the error from the current row.
    async fn booking_conflict(&self, id: i64, conflict: impl FnOnce(&Booking) -> AppError) -> AppError {
        match self.find_booking(id).await {
            Ok(Some(current)) => conflict(&current),
            Ok(None) => not_found(BOOKING_MISSING),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn exists(&self, reference: Reference, id: i64) -> Result<bool, AppError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", reference.table());
        let (found,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(found)
    }

    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>, AppError> {
        let sql = format!("{} WHERE d.id = $1", DOCTOR_SELECT);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, AppError> {
        let sql = format!("{} WHERE lower(d.email) = lower($1)", DOCTOR_SELECT);
        Ok(sqlx::query_as(&sql).bind(email).fetch_optional(&self.pool).await?)
    }

    async fn update_doctor(&self, id: i64, changes: &DoctorChanges) -> Result<Doctor, AppError> {
        let res = sqlx::query(
            "UPDATE doctors SET phone = $2, name = $3, role = $4, \
             description = COALESCE($5, description), price = COALESCE($6, price), \
             speciality_id = COALESCE($7, speciality_id), room_id = COALESCE($8, room_id), \
             active = COALESCE($9, active), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&changes.phone)
        .bind(&changes.name)
        .bind(changes.role)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.speciality_id)
        .bind(changes.room_id)
        .bind(changes.active)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(not_found("Doctor is not available"));
        }
        self.find_doctor(id)
            .await?
            .ok_or_else(|| not_found("Doctor is not available"))
    }

    async fn set_doctor_avatar(&self, id: i64, avatar: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE doctors SET avatar = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(avatar)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_doctor(&self, id: i64) -> Result<DoctorRemoval, AppError> {
        let mut tx = self.pool.begin().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments WHERE doctor_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let outcome = if count > 0 {
            sqlx::query("UPDATE doctors SET active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "UPDATE appointments SET status = $2, updated_at = NOW() WHERE doctor_id = $1 AND status = $3",
            )
            .bind(id)
            .bind(AppointmentStatus::Cancelled)
            .bind(AppointmentStatus::Processing)
            .execute(&mut *tx)
            .await?;
            DoctorRemoval::Deactivated
        } else {
            sqlx::query("DELETE FROM doctors WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DoctorRemoval::Deleted
        };
        tx.commit().await?;
        Ok(outcome)
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, AppError> {
        let sql = format!("SELECT {} FROM appointments WHERE id = $1", APPOINTMENT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn update_appointment(
        &self,
        id: i64,
        today: NaiveDate,
        changes: &AppointmentChanges,
    ) -> Result<Appointment, AppError> {
        let sql = format!(
            "UPDATE appointments SET doctor_id = $2, patient_id = $3, patient_name = $4, patient_phone = $5, \
             patient_birthday = COALESCE($6, patient_birthday), patient_reason = COALESCE($7, patient_reason), \
             appointment_time = COALESCE($8, appointment_time), updated_at = NOW() \
             WHERE id = $1 AND status = $9 AND date = $10 RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        let updated: Option<Appointment> = sqlx::query_as(&sql)
            .bind(id)
            .bind(changes.doctor_id)
            .bind(changes.patient_id)
            .bind(&changes.patient_name)
            .bind(&changes.patient_phone)
            .bind(changes.patient_birthday)
            .bind(&changes.patient_reason)
            .bind(changes.appointment_time)
            .bind(AppointmentStatus::Processing)
            .bind(today)
            .fetch_optional(&self.pool)
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => Err(self.appointment_conflict(id, today).await),
        }
    }

    async fn set_appointment_status(
        &self,
        id: i64,
        today: NaiveDate,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        let sql = format!(
            "UPDATE appointments SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status = $3 AND date = $4 RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        let updated: Option<Appointment> = sqlx::query_as(&sql)
            .bind(id)
            .bind(status)
            .bind(AppointmentStatus::Processing)
            .bind(today)
            .fetch_optional(&self.pool)
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => Err(self.appointment_conflict(id, today).await),
        }
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM appointments WHERE id = $1 AND status <> $2")
            .bind(id)
            .bind(AppointmentStatus::Done)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() > 0 {
            return Ok(());
        }
        match self.find_appointment(id).await? {
            Some(_) => Err(AppError::Conflict(DONE_NOT_DELETABLE.into())),
            None => Err(not_found(APPOINTMENT_MISSING)),
        }
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let mut q = ListQuery::new(format!("SELECT {} FROM appointments", APPOINTMENT_COLUMNS));
        q.eq("doctor_id", filter.doctor_id).eq("date", filter.date);
        if let Some(term) = &filter.search {
            q.search(&["patient_name", "patient_phone"], term);
        }
        if let Some(status) = &filter.status {
            q.eq("status", status.as_str());
        }
        q.order_by(filter.order.clone()).page(filter.page);
        self.fetch_list(q.finish()).await
    }

    async fn arrange_queue(&self, doctor_id: i64, date: NaiveDate, ids: &[i64]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut changed = 0;
        for (i, id) in ids.iter().enumerate() {
            let res = sqlx::query(
                "UPDATE appointments SET position = $1, updated_at = NOW() \
                 WHERE id = $2 AND doctor_id = $3 AND date = $4",
            )
            .bind(i as i32 + 1)
            .bind(*id)
            .bind(doctor_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;
            changed += res.rows_affected();
        }
        tx.commit().await?;
        Ok(changed)
    }

    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, AppError> {
        let sql = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn insert_booking(&self, input: &BookingInput) -> Result<Booking, AppError> {
        let sql = format!(
            "INSERT INTO bookings (service_id, doctor_id, patient_id, booking_name, booking_phone, name, \
             gender, birthday, address, reason, appointment_date, appointment_time, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING {}",
            BOOKING_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(input.service_id)
            .bind(input.doctor_id)
            .bind(input.patient_id)
            .bind(&input.booking_name)
            .bind(&input.booking_phone)
            .bind(&input.name)
            .bind(input.gender)
            .bind(input.birthday)
            .bind(&input.address)
            .bind(&input.reason)
            .bind(input.appointment_date)
            .bind(input.appointment_time)
            .bind(BookingStatus::Processing)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_booking(&self, id: i64, input: &BookingInput) -> Result<Booking, AppError> {
        let sql = format!(
            "UPDATE bookings SET service_id = $2, doctor_id = COALESCE($3, doctor_id), \
             patient_id = COALESCE($4, patient_id), booking_name = $5, booking_phone = $6, name = $7, \
             gender = COALESCE($8, gender), birthday = COALESCE($9, birthday), \
             address = COALESCE($10, address), reason = COALESCE($11, reason), \
             appointment_date = $12, appointment_time = $13, updated_at = NOW() \
             WHERE id = $1 AND status = $14 RETURNING {}",
            BOOKING_COLUMNS
        );
        let updated: Option<Booking> = sqlx::query_as(&sql)
            .bind(id)
            .bind(input.service_id)
            .bind(input.doctor_id)
            .bind(input.patient_id)
            .bind(&input.booking_name)
            .bind(&input.booking_phone)
            .bind(&input.name)
            .bind(input.gender)
            .bind(input.birthday)
            .bind(&input.address)
            .bind(&input.reason)
            .bind(input.appointment_date)
            .bind(input.appointment_time)
            .bind(BookingStatus::Processing)
            .fetch_optional(&self.pool)
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => Err(self
                .booking_conflict(id, |b| {
                    b.ensure_processing()
                        .err()
                        .unwrap_or_else(|| not_found(BOOKING_MISSING))
                })
                .await),
        }
    }

    async fn set_booking_status(&self, id: i64, status: BookingStatus) -> Result<Booking, AppError> {
        let sql = format!(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 AND status = $3 RETURNING {}",
            BOOKING_COLUMNS
        );
        let updated: Option<Booking> = sqlx::query_as(&sql)
            .bind(id)
            .bind(status)
            .bind(BookingStatus::Processing)
            .fetch_optional(&self.pool)
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => Err(self
                .booking_conflict(id, |_| AppError::Conflict(ONLY_PROCESSING.into()))
                .await),
        }
    }

    async fn verify_booking(&self, id: i64) -> Result<VerifiedBooking, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM bookings WHERE id = $1 FOR UPDATE", BOOKING_COLUMNS);
        let booking: Booking = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found(BOOKING_MISSING))?;
        if booking.status != BookingStatus::Processing {
            return Err(AppError::Conflict(ONLY_PROCESSING.into()));
        }
        let doctor_id = booking.doctor_id.ok_or_else(|| {
            AppError::Validation("Booking does not have a doctor yet. Please, assign one before verifying !".into())
        })?;

        let patient_id = match booking.patient_id {
            Some(pid) => pid,
            None => {
                let (pid,): (i64,) = sqlx::query_as(
                    "INSERT INTO patients (name, phone, gender, birthday, address) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING id",
                )
                .bind(&booking.name)
                .bind(&booking.booking_phone)
                .bind(booking.gender)
                .bind(booking.birthday)
                .bind(&booking.address)
                .fetch_one(&mut *tx)
                .await?;
                pid
            }
        };

        let (position,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM appointments WHERE doctor_id = $1 AND date = $2",
        )
        .bind(doctor_id)
        .bind(booking.appointment_date)
        .fetch_one(&mut *tx)
        .await?;

        let sql = format!(
            "INSERT INTO appointments (doctor_id, patient_id, booking_id, patient_name, patient_phone, \
             patient_birthday, patient_reason, date, appointment_time, status, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        let appointment: Appointment = sqlx::query_as(&sql)
            .bind(doctor_id)
            .bind(patient_id)
            .bind(booking.id)
            .bind(&booking.name)
            .bind(&booking.booking_phone)
            .bind(booking.birthday)
            .bind(&booking.reason)
            .bind(booking.appointment_date)
            .bind(booking.appointment_date.and_time(booking.appointment_time))
            .bind(AppointmentStatus::Processing)
            .bind(position)
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!(
            "UPDATE bookings SET status = $2, patient_id = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        );
        let booking: Booking = sqlx::query_as(&sql)
            .bind(id)
            .bind(BookingStatus::Verified)
            .bind(patient_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(VerifiedBooking { booking, appointment })
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let mut q = ListQuery::new(format!("SELECT {} FROM bookings", BOOKING_COLUMNS));
        if let Some(doctor_id) = filter.doctor_id {
            q.eq("doctor_id", doctor_id);
        }
        if let Some(service_id) = filter.service_id {
            q.eq("service_id", service_id);
        }
        if let Some(status) = &filter.status {
            q.eq("status", status.as_str());
        }
        if let Some(date) = filter.appointment_date {
            q.eq("appointment_date", date);
        }
        if let Some(term) = &filter.search {
            q.search(&["booking_name", "name", "booking_phone"], term);
        }
        q.order_by(filter.order.clone()).page(filter.page);
        self.fetch_list(q.finish()).await
    }

    async fn find_drug(&self, id: i64) -> Result<Option<Drug>, AppError> {
        Ok(sqlx::query_as("SELECT id, name FROM drugs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_drugs(&self, search: Option<&str>) -> Result<Vec<Drug>, AppError> {
        let mut q = ListQuery::new("SELECT id, name FROM drugs");
        if let Some(term) = search {
            q.search(&["name"], term);
        }
        q.order_by(SortOrder::by("id", Direction::Asc));
        self.fetch_list(q.finish()).await
    }
}
