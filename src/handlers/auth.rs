//! Login and current-account handlers.

use crate::auth::verify_password;
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::model::Doctor;
use crate::response::{Envelope, ACTION_SUCCESS};
use crate::service::{field_string, RequestValidator};
use crate::state::AppState;
use axum::extract::State;
use serde::Serialize;

const BAD_CREDENTIALS: &str = "The email or password you entered is incorrect !";

#[derive(Serialize)]
pub struct LoginData {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub doctor: Doctor,
}

/// POST /api/login: exchange email + password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<LoginData>, AppError> {
    RequestValidator::require(&body, &["email", "password"])?;
    let email = field_string(&body, "email").unwrap_or_default();
    let password = match body.get("password").and_then(|v| v.as_str()) {
        Some(p) => p.to_string(),
        None => field_string(&body, "password").unwrap_or_default(),
    };

    let doctor = state
        .store
        .find_doctor_by_email(&email)
        .await?
        .filter(|d| d.active);
    let verified = match doctor.as_ref().and_then(|d| d.password_hash.as_deref()) {
        Some(hash) => verify_password(&password, hash)?,
        None => false,
    };
    let doctor = match doctor {
        Some(d) if verified => d,
        _ => {
            tracing::warn!(email = %email, "rejected login");
            return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }
    };

    let access_token = state.tokens.issue(&doctor)?;
    tracing::info!(doctor_id = doctor.id, role = %doctor.role, "login");
    Ok(Envelope::ok("Login successfully !").with_data(LoginData {
        access_token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_seconds(),
        doctor,
    }))
}

/// GET /api/me
pub async fn me(AuthUser(actor): AuthUser) -> Envelope<Doctor> {
    Envelope::ok(ACTION_SUCCESS).with_data(actor)
}
