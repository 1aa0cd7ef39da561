use chrono::Utc;
use sqlx::sqlite::SqliteExecutor;
use uuid::Uuid;

use crate::database::models::{ActivityRecord, NewActivity};

pub struct ActivityRepository;

impl ActivityRepository {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        executor: E,
        activity: &NewActivity,
    ) -> Result<ActivityRecord, sqlx::Error> {
        sqlx::query_as::<_, ActivityRecord>(
            r#"
            INSERT INTO activities (id, actor_id, actor_name, action, details, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&activity.actor_id)
        .bind(&activity.actor_name)
        .bind(activity.action.as_str())
        .bind(&activity.details)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    pub async fn list_all<'e, E: SqliteExecutor<'e>>(
        executor: E,
    ) -> Result<Vec<ActivityRecord>, sqlx::Error> {
        sqlx::query_as::<_, ActivityRecord>("SELECT * FROM activities ORDER BY created_at DESC")
            .fetch_all(executor)
            .await
    }

    pub async fn delete_by_id<'e, E: SqliteExecutor<'e>>(
        executor: E,
        activity_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activities WHERE id = ?1")
            .bind(activity_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn clear<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activities").execute(executor).await?;
        Ok(result.rows_affected())
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
            .fetch_one(executor)
            .await
    }
}
