use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Append-only ledger row. References are weak: the user or project may be
/// deleted while the row persists.
#[derive(Debug, Clone, FromRow)]
pub struct DownloadRecord {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub downloaded_at: DateTime<Utc>,
}
