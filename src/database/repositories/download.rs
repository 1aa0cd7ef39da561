use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::sqlite::SqliteExecutor;
use uuid::Uuid;

use crate::database::models::DownloadRecord;

/// Ledger row joined to its surviving project, with the author name resolved
/// against the users table and falling back to the denormalized snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct DownloadedProjectRecord {
    pub project_id: String,
    pub title: String,
    pub technologies: String,
    pub author_name: String,
    pub archive_size: String,
    pub created_at: DateTime<Utc>,
    pub downloaded_at: DateTime<Utc>,
}

impl DownloadedProjectRecord {
    pub fn technologies(&self) -> Vec<String> {
        serde_json::from_str(&self.technologies).unwrap_or_default()
    }
}

pub struct DownloadRepository;

impl DownloadRepository {
    /// Appends one ledger row. Repeat downloads are never deduplicated.
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        executor: E,
        user_id: &str,
        project_id: &str,
    ) -> Result<DownloadRecord, sqlx::Error> {
        sqlx::query_as::<_, DownloadRecord>(
            r#"
            INSERT INTO downloads (id, user_id, project_id, downloaded_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(project_id)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    /// Rows whose project has since been deleted drop out through the join.
    pub async fn list_for_user<'e, E: SqliteExecutor<'e>>(
        executor: E,
        user_id: &str,
    ) -> Result<Vec<DownloadedProjectRecord>, sqlx::Error> {
        sqlx::query_as::<_, DownloadedProjectRecord>(
            r#"
            SELECT
                p.id AS project_id,
                p.title,
                p.technologies,
                COALESCE(u.pseudo, p.author_name) AS author_name,
                p.archive_size,
                p.created_at,
                d.downloaded_at
            FROM downloads d
            JOIN projects p ON p.id = d.project_id
            LEFT JOIN users u ON u.id = p.author_id
            WHERE d.user_id = ?1
            ORDER BY d.downloaded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    pub async fn delete_for_project<'e, E: SqliteExecutor<'e>>(
        executor: E,
        project_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM downloads WHERE project_id = ?1")
            .bind(project_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads")
            .fetch_one(executor)
            .await
    }

    pub async fn count_for_user<'e, E: SqliteExecutor<'e>>(
        executor: E,
        user_id: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }
}
