use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activation::Role;
use crate::database::models::UserRecord;

/// User fields safe to hand back to clients. The password hash never leaves
/// the row record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub matricule: String,
    pub email: String,
    pub pseudo: String,
    pub role: Role,
    pub registered_at: DateTime<Utc>,
}

impl From<UserRecord> for PublicUser {
    fn from(record: UserRecord) -> Self {
        let role = record.role();
        Self {
            id: record.id,
            matricule: record.matricule,
            email: record.email,
            pseudo: record.pseudo,
            role,
            registered_at: record.registered_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub pseudo: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub project_count: i64,
    pub download_count: i64,
}
