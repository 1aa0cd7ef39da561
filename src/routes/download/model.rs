use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::DownloadRecord;
use crate::database::repositories::DownloadedProjectRecord;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordDownloadRequest {
    pub user_id: String,
    pub project_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEvent {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub downloaded_at: DateTime<Utc>,
}

impl From<DownloadRecord> for DownloadEvent {
    fn from(record: DownloadRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            project_id: record.project_id,
            downloaded_at: record.downloaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordDownloadResponse {
    pub download: DownloadEvent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedProject {
    pub project_id: String,
    pub title: String,
    pub technologies: Vec<String>,
    pub author_name: String,
    pub archive_size: String,
    pub created_at: DateTime<Utc>,
    pub downloaded_at: DateTime<Utc>,
}

impl From<DownloadedProjectRecord> for DownloadedProject {
    fn from(record: DownloadedProjectRecord) -> Self {
        let technologies = record.technologies();
        Self {
            project_id: record.project_id,
            title: record.title,
            technologies,
            author_name: record.author_name,
            archive_size: record.archive_size,
            created_at: record.created_at,
            downloaded_at: record.downloaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MyDownloadsResponse {
    pub downloads: Vec<DownloadedProject>,
}
