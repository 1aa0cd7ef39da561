use axum::extract::{Json, Path, State};

use crate::{
    AppState,
    database::models::{ActionKind, NewActivity},
    database::repositories::{
        ActivityRepository, DownloadRepository, ProjectRepository, UserRepository,
    },
    error::AppError,
    routes::project::model::Project,
};

use super::model::{ActivitiesResponse, Activity, DeletedResponse, ProjectsResponse, UsersResponse};

pub async fn list_activities(
    State(state): State<AppState>,
) -> Result<Json<ActivitiesResponse>, AppError> {
    let activities = ActivityRepository::list_all(&state.pool).await?;
    Ok(Json(ActivitiesResponse {
        activities: activities.into_iter().map(Activity::from).collect(),
    }))
}

pub async fn clear_activities(
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, AppError> {
    let removed = ActivityRepository::clear(&state.pool).await?;
    tracing::info!("activity log cleared ({removed} entries)");
    Ok(Json(DeletedResponse {
        message: "Activity log cleared".into(),
        removed,
    }))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let removed = ActivityRepository::delete_by_id(&state.pool, &activity_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Unknown activity".into()));
    }
    Ok(Json(DeletedResponse {
        message: "Activity deleted".into(),
        removed,
    }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = UserRepository::list_all(&state.pool).await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = ProjectRepository::list_all(&state.pool).await?;
    Ok(Json(ProjectsResponse {
        projects: projects.into_iter().map(Project::from).collect(),
    }))
}

/// Cascade: the project row and its ledger rows go in one transaction along
/// with a Deletion activity; earlier activity entries that mention the
/// project stay. The blob is removed after commit.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let project = ProjectRepository::find_by_id(&state.pool, &project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unknown project".into()))?;

    let mut tx = state.pool.begin().await?;
    let ledger_rows = DownloadRepository::delete_for_project(&mut *tx, &project.id).await?;
    ProjectRepository::delete(&mut *tx, &project.id).await?;
    ActivityRepository::insert(
        &mut *tx,
        &NewActivity {
            actor_id: None,
            actor_name: "admin".into(),
            action: ActionKind::Deletion,
            details: format!("Deleted project \"{}\"", project.title),
        },
    )
    .await?;
    tx.commit().await?;

    if let Some(archive_name) = &project.archive_path {
        if let Err(e) = state.archives.remove(archive_name).await {
            tracing::warn!("archive {} not removed: {}", archive_name, e);
        }
    }

    tracing::info!(
        "deleted project {} and {} ledger rows",
        project.id,
        ledger_rows
    );
    Ok(Json(DeletedResponse {
        message: "Project deleted".into(),
        removed: ledger_rows + 1,
    }))
}
