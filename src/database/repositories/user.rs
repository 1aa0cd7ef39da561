use chrono::Utc;
use sqlx::sqlite::SqliteExecutor;

use crate::database::models::{NewUser, UserRecord};

pub struct UserRepository;

impl UserRepository {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        executor: E,
        new_user: &NewUser,
    ) -> Result<UserRecord, sqlx::Error> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, matricule, email, pseudo, password_hash, role, registered_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(&new_user.id)
        .bind(&new_user.matricule)
        .bind(&new_user.email)
        .bind(&new_user.pseudo)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        tracing::info!("registered user {} ({})", user.pseudo, user.matricule);
        Ok(user)
    }

    pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
        executor: E,
        user_id: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Any existing user claiming the email, matricule or pseudo of a
    /// would-be account. Email and pseudo are matched case-insensitively.
    pub async fn find_duplicate<'e, E: SqliteExecutor<'e>>(
        executor: E,
        email: &str,
        matricule: &str,
        pseudo: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT * FROM users
            WHERE email = lower(?1) OR matricule = ?2 OR lower(pseudo) = lower(?3)
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(matricule)
        .bind(pseudo)
        .fetch_optional(executor)
        .await
    }

    /// Login lookup: email or pseudo case-insensitively, matricule exactly.
    pub async fn find_by_identifier<'e, E: SqliteExecutor<'e>>(
        executor: E,
        identifier: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT * FROM users
            WHERE email = lower(?1) OR lower(pseudo) = lower(?1) OR matricule = ?1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_pseudo<'e, E: SqliteExecutor<'e>>(
        executor: E,
        pseudo: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE lower(pseudo) = lower(?1)")
            .bind(pseudo)
            .fetch_optional(executor)
            .await
    }

    /// Profile update; the caller resolves which fields actually change and
    /// passes the final values.
    pub async fn update_profile<'e, E: SqliteExecutor<'e>>(
        executor: E,
        user_id: &str,
        pseudo: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET pseudo = ?1, password_hash = ?2
            WHERE id = ?3
            RETURNING *
            "#,
        )
        .bind(pseudo)
        .bind(password_hash)
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    pub async fn list_all<'e, E: SqliteExecutor<'e>>(
        executor: E,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY registered_at DESC")
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await
    }
}
