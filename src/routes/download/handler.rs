use axum::{
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    database::models::{ActionKind, NewActivity},
    database::repositories::{ActivityRepository, DownloadRepository, ProjectRepository, UserRepository},
    error::AppError,
};

use super::model::{
    DownloadQuery, MyDownloadsResponse, RecordDownloadRequest, RecordDownloadResponse,
};

/// Streams a project archive as a forced attachment. When the requesting
/// user is known, one ledger row and one Download activity are appended per
/// request; a missing blob appends nothing.
pub async fn download_file(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let project = ProjectRepository::find_by_id(&state.pool, &project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unknown project".into()))?;

    let archive_name = project
        .archive_path
        .as_deref()
        .ok_or_else(|| AppError::NotFound("This project has no archive".into()))?;

    // Read before any bookkeeping so a vanished blob leaves no ledger row.
    let bytes = state.archives.read(archive_name).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound("Archive file is missing".into())
        } else {
            AppError::Storage(e)
        }
    })?;

    let requester = match query.user_id.as_deref().filter(|id| !id.is_empty()) {
        Some(user_id) => UserRepository::find_by_id(&state.pool, user_id).await?,
        None => None,
    };

    if let Some(user) = requester {
        let mut tx = state.pool.begin().await?;
        DownloadRepository::insert(&mut *tx, &user.id, &project.id).await?;
        ActivityRepository::insert(
            &mut *tx,
            &NewActivity {
                actor_id: Some(user.id.clone()),
                actor_name: user.pseudo.clone(),
                action: ActionKind::Download,
                details: format!("Downloaded \"{}\"", project.title),
            },
        )
        .await?;
        tx.commit().await?;
    }

    // Hand back the original name, without the collision prefix.
    let attachment_name = archive_name
        .split_once('_')
        .map(|(_, rest)| rest)
        .unwrap_or(archive_name);

    let response = (
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{attachment_name}\""),
            ),
        ],
        bytes,
    )
        .into_response();
    Ok(response)
}

/// Explicit ledger append for downloads performed out of band.
pub async fn record_download(
    State(state): State<AppState>,
    Json(req): Json<RecordDownloadRequest>,
) -> Result<(StatusCode, Json<RecordDownloadResponse>), AppError> {
    if req.user_id.is_empty() || req.project_id.is_empty() {
        return Err(AppError::Validation(
            "user_id and project_id are required".into(),
        ));
    }

    ProjectRepository::find_by_id(&state.pool, &req.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unknown project".into()))?;

    let download = DownloadRepository::insert(&state.pool, &req.user_id, &req.project_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordDownloadResponse {
            download: download.into(),
        }),
    ))
}

pub async fn my_downloads(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MyDownloadsResponse>, AppError> {
    let downloads = DownloadRepository::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(MyDownloadsResponse {
        downloads: downloads.into_iter().map(Into::into).collect(),
    }))
}
