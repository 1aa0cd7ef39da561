use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    activation::{generate_code, normalize_email, normalize_matricule, role_for_matricule},
    database::models::{ActionKind, NewActivity, NewUser},
    database::repositories::{ActivityRepository, UserRepository},
    error::AppError,
    mail::{ACTIVATION_SUBJECT, activation_body},
    utils::hash_password,
};

use super::model::{
    ActivationRequest, ActivationResponse, MessageResponse, SendCodeRequest, VerifyCodeRequest,
};

/// Step one of the handshake: mail a fresh 6-digit code. Delivery is
/// attempted before the code is stored, so a failed send leaves no live code.
pub async fn send_code(
    State(state): State<AppState>,
    Json(req): Json<SendCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&req.email);
    let matricule = normalize_matricule(&req.matricule);

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if role_for_matricule(&matricule).is_none() {
        return Err(AppError::Validation(
            "Invalid matricule: expected AD-<digits> or MAT-<digits>".into(),
        ));
    }

    let code = generate_code();
    state
        .mailer
        .send(&email, ACTIVATION_SUBJECT, &activation_body(&code))
        .await?;

    state.codes.put(&email, code, matricule).await;
    tracing::info!("activation code issued for {}", email);

    Ok(Json(MessageResponse {
        message: "Code sent".into(),
    }))
}

/// Read-only probe: checks the submitted code without consuming it.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&req.email);

    let pending = state
        .codes
        .get(&email)
        .await
        .ok_or_else(|| AppError::NotFound("No pending code for this email".into()))?;

    if pending.code != req.code.trim() {
        return Err(AppError::Validation("Incorrect code".into()));
    }

    Ok(Json(MessageResponse {
        message: "Code verified".into(),
    }))
}

/// Final step: provisions the user and consumes the pending code. The user
/// row and its Registration activity commit as one transaction.
pub async fn activate(
    State(state): State<AppState>,
    Json(req): Json<ActivationRequest>,
) -> Result<(StatusCode, Json<ActivationResponse>), AppError> {
    let email = normalize_email(&req.email);
    let matricule = normalize_matricule(&req.matricule);
    let pseudo = req.pseudo.trim().to_string();

    let role = role_for_matricule(&matricule).ok_or_else(|| {
        AppError::Validation("Invalid matricule: expected AD-<digits> or MAT-<digits>".into())
    })?;
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if pseudo.is_empty() {
        return Err(AppError::Validation("Pseudo is required".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }

    if UserRepository::find_duplicate(&state.pool, &email, &matricule, &pseudo)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Email, matricule or pseudo already in use".into(),
        ));
    }

    let new_user = NewUser {
        id: Uuid::new_v4().to_string(),
        matricule: matricule.clone(),
        email: email.clone(),
        pseudo: pseudo.clone(),
        password_hash: hash_password(&req.password)?,
        role,
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepository::insert(&mut *tx, &new_user).await?;
    ActivityRepository::insert(
        &mut *tx,
        &NewActivity {
            actor_id: Some(user.id.clone()),
            actor_name: user.pseudo.clone(),
            action: ActionKind::Registration,
            details: format!("Account activated for {}", user.matricule),
        },
    )
    .await?;
    tx.commit().await?;

    // The pending code is consumed only once the account really exists.
    state.codes.remove(&email).await;

    Ok((
        StatusCode::CREATED,
        Json(ActivationResponse {
            message: "Account created".into(),
            role,
        }),
    ))
}
