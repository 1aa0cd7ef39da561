use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// JSON array of technology names, stored as text.
    pub technologies: String,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub archive_size: String,
    pub archive_path: Option<String>,
}

impl ProjectRecord {
    pub fn technologies(&self) -> Vec<String> {
        serde_json::from_str(&self.technologies).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct NewProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub author_name: String,
    pub archive_size: String,
    pub archive_path: Option<String>,
}
