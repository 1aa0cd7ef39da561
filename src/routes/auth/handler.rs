use axum::extract::{Json, State};

use crate::{
    AppState,
    database::models::{ActionKind, NewActivity},
    database::repositories::{ActivityRepository, UserRepository},
    error::AppError,
    utils::verify_password,
};

use super::model::{LoginRequest, LoginResponse};

/// Identifier may be an email or pseudo (case-insensitive) or an exact
/// matricule. Unknown identifier and wrong password answer identically.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let identifier = req.identifier.trim();
    if identifier.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let user = UserRepository::find_by_identifier(&state.pool, identifier)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    ActivityRepository::insert(
        &state.pool,
        &NewActivity {
            actor_id: Some(user.id.clone()),
            actor_name: user.pseudo.clone(),
            action: ActionKind::Login,
            details: format!("{} logged in", user.pseudo),
        },
    )
    .await?;

    let role = user.role();
    Ok(Json(LoginResponse {
        user: user.into(),
        redirect_to: role.redirect_target(),
    }))
}
