//! Shared fixtures: an in-memory store seeded with a small clinic, a frozen clock and request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clinic_backend::model::{
    Appointment, AppointmentChanges, AppointmentStatus, Booking, BookingInput, BookingStatus, Doctor,
    DoctorChanges, Drug, Reference, Role, VerifiedBooking, DONE_NOT_DELETABLE, ONLY_PROCESSING,
};
use clinic_backend::sql::{Direction, Page, SortOrder};
use clinic_backend::store::{AppointmentFilter, BookingFilter, ClinicStore, DoctorRemoval};
use clinic_backend::{app, AppError, AppState, FixedClock, Settings};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, OnceLock};
use tower::ServiceExt;

pub const ADMIN: i64 = 1;
pub const MEMBER: i64 = 2;
pub const SUPPORTER: i64 = 3;
pub const INACTIVE: i64 = 4;
/// Member without any appointment history.
pub const NEWCOMER: i64 = 5;

pub const ADMIN_PASSWORD: &str = "matkhau123";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
}

pub fn yesterday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 9).unwrap()
}

pub fn now() -> NaiveDateTime {
    today().and_hms_opt(9, 0, 0).unwrap()
}

fn stamp() -> DateTime<Utc> {
    now().and_utc()
}

fn admin_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| clinic_backend::auth::hash_password(ADMIN_PASSWORD).unwrap())
        .clone()
}

#[derive(Default)]
struct Tables {
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    bookings: Vec<Booking>,
    drugs: Vec<Drug>,
    patients: Vec<i64>,
    services: Vec<i64>,
    specialities: Vec<(i64, String)>,
    rooms: Vec<(i64, String)>,
    next_id: i64,
}

impl Tables {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn with_names(&self, mut d: Doctor) -> Doctor {
        d.speciality_name = d
            .speciality_id
            .and_then(|id| self.specialities.iter().find(|(s, _)| *s == id))
            .map(|(_, n)| n.clone());
        d.room_name = d
            .room_id
            .and_then(|id| self.rooms.iter().find(|(r, _)| *r == id))
            .map(|(_, n)| n.clone());
        d
    }
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
}

fn doctor(id: i64, name: &str, email: &str, role: Role, active: bool) -> Doctor {
    Doctor {
        id,
        email: email.into(),
        phone: Some(format!("090000000{}", id)),
        password_hash: None,
        name: name.into(),
        description: None,
        price: 200_000,
        role,
        avatar: None,
        active,
        speciality_id: None,
        room_id: None,
        speciality_name: None,
        room_name: None,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

fn appointment(
    id: i64,
    doctor_id: i64,
    patient_id: i64,
    name: &str,
    date: NaiveDate,
    status: AppointmentStatus,
    position: i32,
) -> Appointment {
    Appointment {
        id,
        doctor_id,
        patient_id,
        booking_id: None,
        patient_name: name.into(),
        patient_phone: format!("091234500{}", id),
        patient_birthday: None,
        patient_reason: Some("Khám tổng quát".into()),
        date,
        appointment_time: None,
        status,
        position,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

fn booking(id: i64, doctor_id: Option<i64>, name: &str, status: BookingStatus) -> Booking {
    Booking {
        id,
        service_id: 1,
        doctor_id,
        patient_id: None,
        booking_name: name.into(),
        booking_phone: format!("098765432{}", id),
        name: name.into(),
        gender: Some(1),
        birthday: NaiveDate::from_ymd_opt(1990, 1, 1),
        address: Some("12 Lê Lợi".into()),
        reason: Some("Đau đầu".into()),
        appointment_date: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
        appointment_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        status,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

impl MemoryStore {
    pub fn seeded() -> Self {
        let mut admin = doctor(ADMIN, "Nguyễn Văn An", "admin@clinic.vn", Role::Admin, true);
        admin.password_hash = Some(admin_hash());
        admin.speciality_id = Some(1);
        admin.room_id = Some(1);

        let doctors = vec![
            admin,
            doctor(MEMBER, "Trần Thị Bình", "binh@clinic.vn", Role::Member, true),
            doctor(SUPPORTER, "Lê Văn Cường", "cuong@clinic.vn", Role::Supporter, true),
            doctor(INACTIVE, "Phạm Minh Đức", "duc@clinic.vn", Role::Member, false),
            doctor(NEWCOMER, "Hoàng Văn Em", "em@clinic.vn", Role::Member, true),
        ];
        let appointments = vec![
            appointment(1, MEMBER, 1, "Nguyễn Thị Hoa", today(), AppointmentStatus::Processing, 2),
            appointment(2, MEMBER, 2, "Lê Văn Nam", today(), AppointmentStatus::Processing, 1),
            appointment(3, ADMIN, 3, "Đỗ Văn Phúc", today(), AppointmentStatus::Processing, 1),
            appointment(4, MEMBER, 1, "Nguyễn Thị Hoa", yesterday(), AppointmentStatus::Processing, 1),
            appointment(5, MEMBER, 2, "Lê Văn Nam", today(), AppointmentStatus::Done, 3),
            appointment(6, MEMBER, 3, "Đỗ Văn Phúc", today(), AppointmentStatus::Cancelled, 4),
            appointment(7, INACTIVE, 1, "Nguyễn Thị Hoa", yesterday(), AppointmentStatus::Done, 1),
        ];
        let bookings = vec![
            booking(1, Some(MEMBER), "Nguyễn Văn Bảo", BookingStatus::Processing),
            booking(2, None, "Trương Thị Cúc", BookingStatus::Processing),
            booking(3, Some(SUPPORTER), "Vũ Văn Dũng", BookingStatus::Verified),
        ];
        let drugs = vec![
            Drug { id: 1, name: "Paracetamol".into() },
            Drug { id: 2, name: "Amoxicillin".into() },
            Drug { id: 3, name: "Ibuprofen".into() },
        ];
        MemoryStore {
            tables: Mutex::new(Tables {
                doctors,
                appointments,
                bookings,
                drugs,
                patients: vec![1, 2, 3],
                services: vec![1],
                specialities: vec![(1, "Tim mạch".into())],
                rooms: vec![(1, "Phòng 101".into())],
                next_id: 100,
            }),
        }
    }

    pub fn appointment(&self, id: i64) -> Option<Appointment> {
        let t = self.tables.lock().unwrap();
        t.appointments.iter().find(|a| a.id == id).cloned()
    }

    pub fn doctor(&self, id: i64) -> Option<Doctor> {
        let t = self.tables.lock().unwrap();
        t.doctors.iter().find(|d| d.id == id).cloned()
    }

    pub fn booking(&self, id: i64) -> Option<Booking> {
        let t = self.tables.lock().unwrap();
        t.bookings.iter().find(|b| b.id == id).cloned()
    }

    pub fn patient_count(&self) -> usize {
        self.tables.lock().unwrap().patients.len()
    }
}

fn not_found(msg: &str) -> AppError {
    AppError::NotFound(msg.to_string())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// LIMIT / OFFSET over an already ordered list.
fn paged<T>(page: &Page, rows: Vec<T>) -> Vec<T> {
    let iter = rows.into_iter().skip(page.offset as usize);
    match page.limit {
        Some(n) => iter.take(n as usize).collect(),
        None => iter.collect(),
    }
}

fn sort_by<T>(rows: &mut [T], order: &SortOrder, cmp: impl Fn(&T, &T, &str) -> Ordering) {
    rows.sort_by(|a, b| {
        order
            .0
            .iter()
            .map(|(col, dir)| match dir {
                Direction::Asc => cmp(a, b, col),
                Direction::Desc => cmp(a, b, col).reverse(),
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

fn cmp_appointment(a: &Appointment, b: &Appointment, col: &str) -> Ordering {
    match col {
        "id" => a.id.cmp(&b.id),
        "patient_name" => a.patient_name.cmp(&b.patient_name),
        "patient_phone" => a.patient_phone.cmp(&b.patient_phone),
        "position" => a.position.cmp(&b.position),
        "appointment_time" => a.appointment_time.cmp(&b.appointment_time),
        "date" => a.date.cmp(&b.date),
        "status" => a.status.as_str().cmp(b.status.as_str()),
        "created_at" => a.created_at.cmp(&b.created_at),
        _ => Ordering::Equal,
    }
}

fn cmp_booking(a: &Booking, b: &Booking, col: &str) -> Ordering {
    match col {
        "id" => a.id.cmp(&b.id),
        "booking_name" => a.booking_name.cmp(&b.booking_name),
        "name" => a.name.cmp(&b.name),
        "appointment_date" => a.appointment_date.cmp(&b.appointment_date),
        "appointment_time" => a.appointment_time.cmp(&b.appointment_time),
        "status" => a.status.as_str().cmp(b.status.as_str()),
        "created_at" => a.created_at.cmp(&b.created_at),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn exists(&self, reference: Reference, id: i64) -> Result<bool, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(match reference {
            Reference::Patient => t.patients.contains(&id),
            Reference::Service => t.services.contains(&id),
            Reference::Speciality => t.specialities.iter().any(|(s, _)| *s == id),
            Reference::Room => t.rooms.iter().any(|(r, _)| *r == id),
        })
    }

    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.doctors.iter().find(|d| d.id == id).cloned().map(|d| t.with_names(d)))
    }

    async fn find_doctor_by_email(&self, email: &str) -> Result<Option<Doctor>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.doctors
            .iter()
            .find(|d| d.email.eq_ignore_ascii_case(email))
            .cloned()
            .map(|d| t.with_names(d)))
    }

    async fn update_doctor(&self, id: i64, changes: &DoctorChanges) -> Result<Doctor, AppError> {
        let mut t = self.tables.lock().unwrap();
        let d = t
            .doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found("Doctor is not available"))?;
        d.phone = Some(changes.phone.clone());
        d.name = changes.name.clone();
        d.role = changes.role;
        if let Some(v) = &changes.description {
            d.description = Some(v.clone());
        }
        if let Some(v) = changes.price {
            d.price = v;
        }
        if let Some(v) = changes.speciality_id {
            d.speciality_id = Some(v);
        }
        if let Some(v) = changes.room_id {
            d.room_id = Some(v);
        }
        if let Some(v) = changes.active {
            d.active = v;
        }
        let d = d.clone();
        Ok(t.with_names(d))
    }

    async fn set_doctor_avatar(&self, id: i64, avatar: &str) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(d) = t.doctors.iter_mut().find(|d| d.id == id) {
            d.avatar = Some(avatar.to_string());
        }
        Ok(())
    }

    async fn remove_doctor(&self, id: i64) -> Result<DoctorRemoval, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.appointments.iter().any(|a| a.doctor_id == id) {
            if let Some(d) = t.doctors.iter_mut().find(|d| d.id == id) {
                d.active = false;
            }
            for a in t.appointments.iter_mut().filter(|a| a.doctor_id == id) {
                if a.status == AppointmentStatus::Processing {
                    a.status = AppointmentStatus::Cancelled;
                }
            }
            Ok(DoctorRemoval::Deactivated)
        } else {
            t.doctors.retain(|d| d.id != id);
            for b in t.bookings.iter_mut().filter(|b| b.doctor_id == Some(id)) {
                b.doctor_id = None;
            }
            Ok(DoctorRemoval::Deleted)
        }
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, AppError> {
        Ok(self.appointment(id))
    }

    async fn update_appointment(
        &self,
        id: i64,
        today: NaiveDate,
        changes: &AppointmentChanges,
    ) -> Result<Appointment, AppError> {
        let mut t = self.tables.lock().unwrap();
        let a = t
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Appointment is not available"))?;
        a.ensure_editable(today)?;
        a.doctor_id = changes.doctor_id;
        a.patient_id = changes.patient_id;
        a.patient_name = changes.patient_name.clone();
        a.patient_phone = changes.patient_phone.clone();
        if let Some(v) = changes.patient_birthday {
            a.patient_birthday = Some(v);
        }
        if let Some(v) = &changes.patient_reason {
            a.patient_reason = Some(v.clone());
        }
        if let Some(v) = changes.appointment_time {
            a.appointment_time = Some(v);
        }
        Ok(a.clone())
    }

    async fn set_appointment_status(
        &self,
        id: i64,
        today: NaiveDate,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        let mut t = self.tables.lock().unwrap();
        let a = t
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Appointment is not available"))?;
        a.ensure_editable(today)?;
        a.status = status;
        Ok(a.clone())
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        match t.appointments.iter().find(|a| a.id == id) {
            None => return Err(not_found("Appointment is not available")),
            Some(a) if a.status == AppointmentStatus::Done => {
                return Err(AppError::Conflict(DONE_NOT_DELETABLE.into()))
            }
            Some(_) => {}
        }
        t.appointments.retain(|a| a.id != id);
        Ok(())
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<Appointment> = t
            .appointments
            .iter()
            .filter(|a| a.doctor_id == filter.doctor_id && a.date == filter.date)
            .filter(|a| {
                filter.search.as_deref().map_or(true, |s| {
                    contains_ci(&a.patient_name, s) || contains_ci(&a.patient_phone, s)
                })
            })
            .filter(|a| filter.status.as_deref().map_or(true, |s| a.status.as_str() == s))
            .cloned()
            .collect();
        sort_by(&mut rows, &filter.order, cmp_appointment);
        Ok(paged(&filter.page, rows))
    }

    async fn arrange_queue(&self, doctor_id: i64, date: NaiveDate, ids: &[i64]) -> Result<u64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let mut changed = 0;
        for (i, id) in ids.iter().enumerate() {
            if let Some(a) = t
                .appointments
                .iter_mut()
                .find(|a| a.id == *id && a.doctor_id == doctor_id && a.date == date)
            {
                a.position = i as i32 + 1;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, AppError> {
        Ok(self.booking(id))
    }

    async fn insert_booking(&self, input: &BookingInput) -> Result<Booking, AppError> {
        let mut t = self.tables.lock().unwrap();
        let id = t.allocate();
        let row = Booking {
            id,
            service_id: input.service_id,
            doctor_id: input.doctor_id,
            patient_id: input.patient_id,
            booking_name: input.booking_name.clone(),
            booking_phone: input.booking_phone.clone(),
            name: input.name.clone(),
            gender: input.gender,
            birthday: input.birthday,
            address: input.address.clone(),
            reason: input.reason.clone(),
            appointment_date: input.appointment_date,
            appointment_time: input.appointment_time,
            status: BookingStatus::Processing,
            created_at: stamp(),
            updated_at: stamp(),
        };
        t.bookings.push(row.clone());
        Ok(row)
    }

    async fn update_booking(&self, id: i64, input: &BookingInput) -> Result<Booking, AppError> {
        let mut t = self.tables.lock().unwrap();
        let b = t
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("This booking does not exist !"))?;
        b.ensure_processing()?;
        b.service_id = input.service_id;
        b.doctor_id = input.doctor_id.or(b.doctor_id);
        b.patient_id = input.patient_id.or(b.patient_id);
        b.booking_name = input.booking_name.clone();
        b.booking_phone = input.booking_phone.clone();
        b.name = input.name.clone();
        b.gender = input.gender.or(b.gender);
        b.birthday = input.birthday.or(b.birthday);
        b.address = input.address.clone().or(b.address.take());
        b.reason = input.reason.clone().or(b.reason.take());
        b.appointment_date = input.appointment_date;
        b.appointment_time = input.appointment_time;
        Ok(b.clone())
    }

    async fn set_booking_status(&self, id: i64, status: BookingStatus) -> Result<Booking, AppError> {
        let mut t = self.tables.lock().unwrap();
        let b = t
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("This booking does not exist !"))?;
        if b.status != BookingStatus::Processing {
            return Err(AppError::Conflict(ONLY_PROCESSING.into()));
        }
        b.status = status;
        Ok(b.clone())
    }

    async fn verify_booking(&self, id: i64) -> Result<VerifiedBooking, AppError> {
        let mut t = self.tables.lock().unwrap();
        let booking = t
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| not_found("This booking does not exist !"))?;
        let doctor_id = booking
            .doctor_id
            .ok_or_else(|| AppError::Validation("Booking does not have a doctor yet. Please, assign one before verifying !".into()))?;
        let patient_id = match booking.patient_id {
            Some(p) => p,
            None => {
                let p = t.allocate();
                t.patients.push(p);
                p
            }
        };
        let position = t
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.date == booking.appointment_date)
            .map(|a| a.position)
            .max()
            .unwrap_or(0)
            + 1;
        let appointment = Appointment {
            id: t.allocate(),
            doctor_id,
            patient_id,
            booking_id: Some(booking.id),
            patient_name: booking.name.clone(),
            patient_phone: booking.booking_phone.clone(),
            patient_birthday: booking.birthday,
            patient_reason: booking.reason.clone(),
            date: booking.appointment_date,
            appointment_time: Some(booking.appointment_date.and_time(booking.appointment_time)),
            status: AppointmentStatus::Processing,
            position,
            created_at: stamp(),
            updated_at: stamp(),
        };
        t.appointments.push(appointment.clone());
        let b = t
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("This booking does not exist !"))?;
        b.status = BookingStatus::Verified;
        b.patient_id = Some(patient_id);
        Ok(VerifiedBooking {
            booking: b.clone(),
            appointment,
        })
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<Booking> = t
            .bookings
            .iter()
            .filter(|b| filter.doctor_id.map_or(true, |d| b.doctor_id == Some(d)))
            .filter(|b| filter.service_id.map_or(true, |s| b.service_id == s))
            .filter(|b| filter.status.as_deref().map_or(true, |s| b.status.as_str() == s))
            .filter(|b| filter.appointment_date.map_or(true, |d| b.appointment_date == d))
            .filter(|b| {
                filter.search.as_deref().map_or(true, |s| {
                    contains_ci(&b.booking_name, s) || contains_ci(&b.name, s) || contains_ci(&b.booking_phone, s)
                })
            })
            .cloned()
            .collect();
        sort_by(&mut rows, &filter.order, cmp_booking);
        Ok(paged(&filter.page, rows))
    }

    async fn find_drug(&self, id: i64) -> Result<Option<Drug>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.drugs.iter().find(|d| d.id == id).cloned())
    }

    async fn list_drugs(&self, search: Option<&str>) -> Result<Vec<Drug>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.drugs
            .iter()
            .filter(|d| search.map_or(true, |s| contains_ci(&d.name, s)))
            .cloned()
            .collect())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

fn scratch_dir() -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let n = SEQ.fetch_add(1, AtomicOrdering::SeqCst);
    std::env::temp_dir().join(format!("clinic-backend-test-{}-{}", std::process::id(), n))
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Seeded app with extra environment entries layered over the test defaults.
    pub fn with_env(extra: &[(&str, &str)]) -> Self {
        let upload_dir = scratch_dir();
        let dir = upload_dir.to_string_lossy().to_string();
        let settings = Settings::from_lookup(|key| {
            if let Some((_, v)) = extra.iter().find(|(k, _)| *k == key) {
                return Some(v.to_string());
            }
            match key {
                "JWT_SECRET" => Some("test-secret".to_string()),
                "UPLOAD_DIR" => Some(dir.clone()),
                _ => None,
            }
        })
        .unwrap();
        let store = Arc::new(MemoryStore::seeded());
        let state = AppState::new(store.clone(), Arc::new(FixedClock(now())), &settings);
        TestApp {
            router: app(state.clone()),
            store,
            state,
            upload_dir,
        }
    }

    pub fn token(&self, doctor_id: i64) -> String {
        let doctor = self.store.doctor(doctor_id).unwrap();
        self.state.tokens.issue(&doctor).unwrap()
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// JSON request as `as_doctor` (`None` sends no credentials).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        as_doctor: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = as_doctor {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(id)));
        }
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, as_doctor: i64) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(as_doctor), None).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Assert a failure envelope with the given message.
pub fn assert_fail(body: &Value, msg: &str) {
    assert_eq!(body["result"], 0, "body: {}", body);
    assert_eq!(body["msg"], msg, "body: {}", body);
}

pub fn assert_ok(body: &Value, msg: &str) {
    assert_eq!(body["result"], 1, "body: {}", body);
    assert_eq!(body["msg"], msg, "body: {}", body);
}
