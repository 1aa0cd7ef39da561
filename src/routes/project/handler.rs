use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    database::models::{ActionKind, NewActivity, NewProject, UserRecord},
    database::repositories::{ActivityRepository, ProjectRepository, UserRepository},
    error::AppError,
    storage::StoredArchive,
};

use super::model::{CreateProjectResponse, Project, ProjectsResponse, SearchQuery};

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = ProjectRepository::list_all(&state.pool).await?;
    Ok(Json(ProjectsResponse {
        projects: projects.into_iter().map(Project::from).collect(),
    }))
}

pub async fn list_by_author(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let projects = ProjectRepository::list_by_author(&state.pool, &user_id).await?;
    Ok(Json(ProjectsResponse {
        projects: projects.into_iter().map(Project::from).collect(),
    }))
}

pub async fn search_projects(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let title = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let tech = query
        .tech
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let projects = ProjectRepository::search(&state.pool, title, tech).await?;
    Ok(Json(ProjectsResponse {
        projects: projects.into_iter().map(Project::from).collect(),
    }))
}

/// Multipart upload. The archive blob is written first; if the database
/// transaction then fails the blob is removed again, so no project ever
/// half-exists.
pub async fn create_project(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateProjectResponse>), AppError> {
    let mut title: Option<String> = None;
    let mut description = String::new();
    let mut technologies: Vec<String> = Vec::new();
    let mut category: Option<String> = None;
    let mut author_id: Option<String> = None;
    let mut author_name = String::new();
    let mut archive: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "description" => description = read_text(field).await?,
            "technologies" => {
                let tech = read_text(field).await?;
                if !tech.trim().is_empty() {
                    technologies.push(tech.trim().to_string());
                }
            }
            "category" => category = Some(read_text(field).await?).filter(|c| !c.is_empty()),
            "author_id" => author_id = Some(read_text(field).await?).filter(|a| !a.is_empty()),
            "author_name" => author_name = read_text(field).await?,
            "file" => {
                let file_name = field.file_name().unwrap_or("archive").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable archive field: {e}")))?;
                if !bytes.is_empty() {
                    archive = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Title is required".into()))?;

    let author = match &author_id {
        Some(id) => UserRepository::find_by_id(&state.pool, id).await?,
        None => None,
    };
    if author_name.trim().is_empty() {
        if let Some(user) = &author {
            author_name = user.pseudo.clone();
        }
    }

    let stored: Option<StoredArchive> = match &archive {
        Some((file_name, bytes)) => Some(state.archives.save(file_name, bytes).await?),
        None => None,
    };

    let new_project = NewProject {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        technologies,
        category,
        author_id,
        author_name: author_name.trim().to_string(),
        archive_size: stored
            .as_ref()
            .map(|s| s.size_label.clone())
            .unwrap_or_else(|| "0 B".into()),
        archive_path: stored.as_ref().map(|s| s.file_name.clone()),
    };

    let project = match persist_project(&state, &new_project, author.as_ref()).await {
        Ok(project) => project,
        Err(err) => {
            if let Some(stored) = &stored {
                if let Err(cleanup) = state.archives.remove(&stored.file_name).await {
                    tracing::warn!("orphan archive {} not removed: {}", stored.file_name, cleanup);
                }
            }
            return Err(err);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateProjectResponse {
            message: "Project created".into(),
            project_id: project.id,
        }),
    ))
}

async fn persist_project(
    state: &AppState,
    new_project: &NewProject,
    author: Option<&UserRecord>,
) -> Result<crate::database::models::ProjectRecord, AppError> {
    let mut tx = state.pool.begin().await?;
    let project = ProjectRepository::insert(&mut *tx, new_project).await?;
    if let Some(author) = author {
        ActivityRepository::insert(
            &mut *tx,
            &NewActivity {
                actor_id: Some(author.id.clone()),
                actor_name: author.pseudo.clone(),
                action: ActionKind::NewProject,
                details: format!("Uploaded project \"{}\"", project.title),
            },
        )
        .await?;
    }
    tx.commit().await?;
    Ok(project)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Unreadable form field: {e}")))
}
