use axum::extract::{Json, Path, Query, State};

use crate::{
    AppState,
    database::repositories::{DownloadRepository, ProjectRepository, UserRepository},
    error::AppError,
    utils::hash_password,
};

use super::model::{ProfileQuery, ProfileResponse, UpdateProfileRequest, UserResponse};

/// Partial profile update: pseudo and/or password. Other identity fields
/// (email, matricule) are fixed at activation time.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserRepository::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unknown user".into()))?;

    let pseudo = match req.pseudo.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("Pseudo cannot be empty".into())),
        Some(pseudo) => pseudo.to_string(),
        None => user.pseudo.clone(),
    };

    if !pseudo.eq_ignore_ascii_case(&user.pseudo) {
        if let Some(other) = UserRepository::find_by_pseudo(&state.pool, &pseudo).await? {
            if other.id != user.id {
                return Err(AppError::Conflict("Pseudo already in use".into()));
            }
        }
    }

    let password_hash = match req.password.as_deref() {
        Some("") => return Err(AppError::Validation("Password cannot be empty".into())),
        Some(password) => hash_password(password)?,
        None => user.password_hash.clone(),
    };

    let updated =
        UserRepository::update_profile(&state.pool, &user.id, &pseudo, &password_hash).await?;

    Ok(Json(UserResponse {
        user: updated.into(),
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = query
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Missing user_id parameter".into()))?;

    let user = UserRepository::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unknown user".into()))?;

    let project_count = ProjectRepository::count_by_author(&state.pool, &user.id).await?;
    let download_count = DownloadRepository::count_for_user(&state.pool, &user.id).await?;

    Ok(Json(ProfileResponse {
        user: user.into(),
        project_count,
        download_count,
    }))
}
