use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, patch, post},
};
use serde::Serialize;

use crate::{
    AppState,
    database::repositories::{
        ActivityRepository, DownloadRepository, ProjectRepository, UserRepository,
    },
    error::AppError,
};

pub mod activation;
pub mod admin;
pub mod auth;
pub mod download;
pub mod project;
pub mod user;

/// Full API surface; shared between `main` and the integration tests.
pub fn router(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes();

    Router::new()
        // activation handshake
        .route("/api/send-code", post(activation::handler::send_code))
        .route("/api/verify-code", post(activation::handler::verify_code))
        .route("/api/activation", post(activation::handler::activate))
        // authentication
        .route("/api/login", post(auth::handler::login))
        // project catalog
        .route(
            "/api/projects",
            get(project::handler::list_projects).post(project::handler::create_project),
        )
        .route(
            "/api/projects/user/{user_id}",
            get(project::handler::list_by_author),
        )
        .route("/api/projects/search", get(project::handler::search_projects))
        // download ledger
        .route(
            "/api/download-file/{project_id}",
            get(download::handler::download_file),
        )
        .route(
            "/api/record-download",
            post(download::handler::record_download),
        )
        .route("/api/my-downloads/{user_id}", get(download::handler::my_downloads))
        // profile
        .route("/api/users/{user_id}", patch(user::handler::update_profile))
        .route("/api/user/profile", get(user::handler::profile))
        // admin surface
        .route(
            "/api/admin/activities",
            get(admin::handler::list_activities).delete(admin::handler::clear_activities),
        )
        .route(
            "/api/admin/activity/{activity_id}",
            delete(admin::handler::delete_activity),
        )
        .route("/api/admin/users", get(admin::handler::list_users))
        .route("/api/admin/projects", get(admin::handler::list_projects))
        .route(
            "/api/admin/project/{project_id}",
            delete(admin::handler::delete_project),
        )
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum::middleware::from_fn(crate::middleware::log_errors))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthCounts {
    users: i64,
    projects: i64,
    downloads: i64,
    activities: i64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    counts: HealthCounts,
}

async fn health(State(state): State<AppState>) -> Result<axum::Json<HealthResponse>, AppError> {
    let counts = HealthCounts {
        users: UserRepository::count(&state.pool).await?,
        projects: ProjectRepository::count(&state.pool).await?,
        downloads: DownloadRepository::count(&state.pool).await?,
        activities: ActivityRepository::count(&state.pool).await?,
    };
    Ok(axum::Json(HealthResponse {
        status: "ok",
        counts,
    }))
}
