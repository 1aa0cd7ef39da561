use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Audit actions recorded in the activity trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Registration,
    Login,
    NewProject,
    Download,
    Deletion,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Registration => "Registration",
            ActionKind::Login => "Login",
            ActionKind::NewProject => "NewProject",
            ActionKind::Download => "Download",
            ActionKind::Deletion => "Deletion",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ActivityRecord {
    pub id: String,
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewActivity {
    pub actor_id: Option<String>,
    pub actor_name: String,
    pub action: ActionKind,
    pub details: String,
}
