//! Process settings read from the environment (after `.env` is loaded).

use crate::error::ConfigError;
use chrono::FixedOffset;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Secret used when `JWT_SECRET` is unset in debug builds only.
const DEV_JWT_SECRET: &str = "clinic-backend-development-secret-change-me";

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// Clinic timezone as whole hours east of UTC.
    pub utc_offset: FixedOffset,
    pub upload_dir: PathBuf,
    pub upload_url_prefix: String,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = match get("JWT_SECRET") {
            Some(s) => s,
            None if cfg!(debug_assertions) => DEV_JWT_SECRET.to_string(),
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let offset_hours: i32 = parse_or(get("CLINIC_UTC_OFFSET"), "CLINIC_UTC_OFFSET", 7)?;
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| ConfigError::Invalid {
            key: "CLINIC_UTC_OFFSET",
            value: offset_hours.to_string(),
        })?;

        let jwt_ttl_hours: i64 = parse_or(get("JWT_TTL_HOURS"), "JWT_TTL_HOURS", 24)?;
        if jwt_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_HOURS",
                value: jwt_ttl_hours.to_string(),
            });
        }

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/clinic".into()),
            bind_addr: parse_or(get("BIND_ADDR"), "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_ttl_hours,
            utc_offset,
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("uploads")),
            upload_url_prefix: get("UPLOAD_URL_PREFIX")
                .map(|p| p.trim_end_matches('/').to_string())
                .filter(|p| p.starts_with('/') && p.len() > 1)
                .unwrap_or_else(|| "/uploads".into()),
            max_upload_bytes: parse_or(get("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
