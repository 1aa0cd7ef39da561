use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::ActivityRecord;
use crate::routes::project::model::Project;
use crate::routes::user::model::PublicUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id,
            actor_id: record.actor_id,
            actor_name: record.actor_name,
            action: record.action,
            details: record.details,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub removed: u64,
}
