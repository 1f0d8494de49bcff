//! Clinic backend: doctors, appointments, the daily queue, bookings and drugs over PostgreSQL.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists};
pub use response::Envelope;
pub use routes::{app, clinic_routes, common_routes_with_ready};
pub use state::AppState;
pub use store::{ClinicStore, PgStore};
