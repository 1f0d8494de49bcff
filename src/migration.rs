//! Database bootstrap: create the database if missing, then the clinic tables.
//! Statements run in dependency order and are idempotent (IF NOT EXISTS).

use crate::error::AppError;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const DDL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS specialities (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS rooms (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        location TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS services (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        price BIGINT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS doctors (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        phone TEXT,
        password_hash TEXT,
        name TEXT NOT NULL,
        description TEXT,
        price BIGINT NOT NULL DEFAULT 0,
        role TEXT NOT NULL DEFAULT 'member' CHECK (role IN ('admin', 'member', 'supporter')),
        avatar TEXT,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        speciality_id BIGINT REFERENCES specialities (id) ON DELETE SET NULL,
        room_id BIGINT REFERENCES rooms (id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS patients (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT,
        gender SMALLINT,
        birthday DATE,
        address TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS bookings (
        id BIGSERIAL PRIMARY KEY,
        service_id BIGINT NOT NULL REFERENCES services (id),
        doctor_id BIGINT REFERENCES doctors (id) ON DELETE SET NULL,
        patient_id BIGINT REFERENCES patients (id) ON DELETE SET NULL,
        booking_name TEXT NOT NULL,
        booking_phone TEXT NOT NULL,
        name TEXT NOT NULL,
        gender SMALLINT CHECK (gender IN (0, 1)),
        birthday DATE,
        address TEXT,
        reason TEXT,
        appointment_date DATE NOT NULL,
        appointment_time TIME NOT NULL,
        status TEXT NOT NULL DEFAULT 'processing' CHECK (status IN ('processing', 'verified', 'cancelled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS appointments (
        id BIGSERIAL PRIMARY KEY,
        doctor_id BIGINT NOT NULL REFERENCES doctors (id),
        patient_id BIGINT NOT NULL REFERENCES patients (id),
        booking_id BIGINT REFERENCES bookings (id) ON DELETE SET NULL,
        patient_name TEXT NOT NULL,
        patient_phone TEXT NOT NULL,
        patient_birthday DATE,
        patient_reason TEXT,
        date DATE NOT NULL,
        appointment_time TIMESTAMP,
        status TEXT NOT NULL DEFAULT 'processing' CHECK (status IN ('processing', 'done', 'cancelled')),
        position INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS appointments_doctor_date_idx ON appointments (doctor_id, date, position)",
    "CREATE INDEX IF NOT EXISTS bookings_status_idx ON bookings (status, appointment_date)",
    r#"CREATE TABLE IF NOT EXISTS drugs (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
];

/// Create all clinic tables and indexes. Seeds nothing.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for stmt in DDL {
        sqlx::query(stmt).execute(pool).await?;
    }
    tracing::info!(statements = DDL.len(), "schema ready");
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_db_name(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn = opts.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn split_db_name(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let db_name = url
        .get(path_start..)
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("")
        .trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
