use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::activation::Role;

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub matricule: String,
    pub email: String,
    pub pseudo: String,
    pub password_hash: String,
    pub role: String,
    pub registered_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }
}

/// Insert payload for a freshly activated account.
#[derive(Debug)]
pub struct NewUser {
    pub id: String,
    pub matricule: String,
    pub email: String,
    pub pseudo: String,
    pub password_hash: String,
    pub role: Role,
}
