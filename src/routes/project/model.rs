use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::ProjectRecord;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub archive_size: String,
    pub has_archive: bool,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        let technologies = record.technologies();
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            technologies,
            category: record.category,
            author_id: record.author_id,
            author_name: record.author_name,
            created_at: record.created_at,
            archive_size: record.archive_size,
            has_archive: record.archive_path.is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub message: String,
    pub project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub tech: Option<String>,
}
