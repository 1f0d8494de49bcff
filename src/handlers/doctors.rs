//! Doctor account handlers: read, update, avatar upload, deactivate/delete.

use super::{load_doctor, optional_reference};
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::model::{Doctor, DoctorChanges, Reference, Role};
use crate::response::{Envelope, ACTION_SUCCESS};
use crate::service::access::ADMIN_ONLY;
use crate::service::validation::{check_phone, is_vietnamese_name, parse_active, parse_id, parse_price};
use crate::service::{field_string, require_role, RequestValidator};
use crate::state::AppState;
use crate::store::DoctorRemoval;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;

pub const PHOTO_TOO_LARGE: &str = "Photo is too large !";
const ROLE_INVALID: &str = "Role is not valid. There are 2 valid values: admin, member, supporter !";
const ALREADY_DEACTIVATED: &str = "This doctor account was deactivated. No need this action !";
const AVATAR_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// GET /api/doctors/:id
pub async fn read(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Envelope<Doctor>, AppError> {
    let id = parse_id(&raw_id)?;
    let doctor = load_doctor(state.store.as_ref(), id, "Doctor is not available").await?;
    Ok(Envelope::ok(ACTION_SUCCESS).with_data(doctor))
}

/// PUT /api/doctors/:id: admin only. Absent optional fields keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Doctor>, AppError> {
    require_role(&actor, &[Role::Admin], ADMIN_ONLY)?;
    let id = parse_id(&raw_id)?;
    let store = state.store.as_ref();
    load_doctor(store, id, "Doctor is not available. Try again !").await?;

    RequestValidator::require(&body, &["phone", "name", "role"])?;
    let phone = field_string(&body, "phone").unwrap_or_default();
    check_phone(&phone, "This", "Phone number")?;
    let name = field_string(&body, "name").unwrap_or_default();
    if !is_vietnamese_name(&name) {
        return Err(AppError::Validation("Vietnamese name only has letters and space".into()));
    }
    let price = field_string(&body, "price").map(|p| parse_price(&p)).transpose()?;
    let role: Role = field_string(&body, "role")
        .unwrap_or_default()
        .parse()
        .map_err(|_| AppError::Validation(ROLE_INVALID.into()))?;
    let speciality_id = optional_reference(
        store,
        field_string(&body, "speciality_id"),
        Reference::Speciality,
        "Speciality is not available.",
    )
    .await?;
    let room_id = optional_reference(
        store,
        field_string(&body, "room_id"),
        Reference::Room,
        "Room is not available.",
    )
    .await?;
    let active = field_string(&body, "active").map(|a| parse_active(&a)).transpose()?;

    let changes = DoctorChanges {
        phone,
        name,
        role,
        description: field_string(&body, "description"),
        price,
        speciality_id,
        room_id,
        active,
    };
    let doctor = store.update_doctor(id, &changes).await?;
    tracing::info!(doctor_id = id, by = actor.id, "doctor updated");
    Ok(Envelope::ok("Doctor account is updated successfully !").with_data(doctor))
}

/// POST /api/doctors/:id/avatar: multipart field `file`, jpeg/jpg/png only.
pub async fn upload_avatar(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Envelope<()>, AppError> {
    require_role(&actor, &[Role::Admin], ADMIN_ONLY)?;
    let id = parse_id(&raw_id)?;
    let doctor = load_doctor(state.store.as_ref(), id, "Doctor is not available. Try again !").await?;
    if !doctor.active {
        return Err(AppError::Conflict(
            "Doctor have been deactivated so that you can not do this action".into(),
        ));
    }

    let no_photo = || AppError::Validation("Photo is not received !".into());
    let read_failed = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(PHOTO_TOO_LARGE.into())
        } else {
            AppError::BadRequest(e.body_text())
        }
    };
    let mut multipart = multipart.map_err(|_| no_photo())?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(read_failed)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(read_failed)?;
        upload = Some((file_name, bytes));
        break;
    }
    let (file_name, bytes) = upload.filter(|(_, b)| !b.is_empty()).ok_or_else(no_photo)?;

    let ext = avatar_extension(&file_name)
        .ok_or_else(|| AppError::Validation("Only jpeg,jpg,png files are allowed".into()))?;
    let stored_name = format!("avatar_doctor_{}_{}.{}", id, chrono::Utc::now().timestamp(), ext);
    tokio::fs::create_dir_all(&state.uploads.dir).await?;
    tokio::fs::write(state.uploads.dir.join(&stored_name), &bytes).await?;

    let url = format!("{}/{}", state.uploads.url_prefix, stored_name);
    state.store.set_doctor_avatar(id, &url).await?;
    tracing::info!(doctor_id = id, size = bytes.len(), "avatar stored");
    Ok(Envelope::ok("Avatar has been updated successfully !").with_url(url))
}

/// Lowercased extension when it is an accepted image type.
fn avatar_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    AVATAR_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// DELETE /api/doctors/:id: deactivates a doctor with appointment history, deletes one without.
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Envelope<()>, AppError> {
    require_role(&actor, &[Role::Admin], ADMIN_ONLY)?;
    let id = parse_id(&raw_id)?;
    if id == actor.id {
        return Err(AppError::BadRequest("You can not deactivate yourself !".into()));
    }
    let doctor = load_doctor(state.store.as_ref(), id, "Doctor is not available !").await?;
    if !doctor.active {
        return Err(AppError::Conflict(ALREADY_DEACTIVATED.into()));
    }

    let env = match state.store.remove_doctor(id).await? {
        DoctorRemoval::Deactivated => {
            Envelope::ok("Doctor is deactivated successfully").with_kind("deactivated")
        }
        DoctorRemoval::Deleted => Envelope::ok("Doctor is deleted successfully !").with_kind("delete"),
    };
    tracing::info!(doctor_id = id, by = actor.id, kind = ?env.kind, "doctor removed");
    Ok(env)
}
