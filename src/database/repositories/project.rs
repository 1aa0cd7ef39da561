use chrono::Utc;
use sqlx::sqlite::SqliteExecutor;

use crate::database::models::{NewProject, ProjectRecord};

pub struct ProjectRepository;

impl ProjectRepository {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        executor: E,
        new_project: &NewProject,
    ) -> Result<ProjectRecord, sqlx::Error> {
        let technologies =
            serde_json::to_string(&new_project.technologies).unwrap_or_else(|_| "[]".into());

        let project = sqlx::query_as::<_, ProjectRecord>(
            r#"
            INSERT INTO projects
                (id, title, description, technologies, category,
                 author_id, author_name, created_at, archive_size, archive_path)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING *
            "#,
        )
        .bind(&new_project.id)
        .bind(&new_project.title)
        .bind(&new_project.description)
        .bind(technologies)
        .bind(&new_project.category)
        .bind(&new_project.author_id)
        .bind(&new_project.author_name)
        .bind(Utc::now())
        .bind(&new_project.archive_size)
        .bind(&new_project.archive_path)
        .fetch_one(executor)
        .await?;

        tracing::info!("created project {} ({})", project.title, project.id);
        Ok(project)
    }

    pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
        executor: E,
        project_id: &str,
    ) -> Result<Option<ProjectRecord>, sqlx::Error> {
        sqlx::query_as::<_, ProjectRecord>("SELECT * FROM projects WHERE id = ?1")
            .bind(project_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list_all<'e, E: SqliteExecutor<'e>>(
        executor: E,
    ) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        sqlx::query_as::<_, ProjectRecord>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(executor)
            .await
    }

    pub async fn list_by_author<'e, E: SqliteExecutor<'e>>(
        executor: E,
        author_id: &str,
    ) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        sqlx::query_as::<_, ProjectRecord>(
            "SELECT * FROM projects WHERE author_id = ?1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(executor)
        .await
    }

    /// Title substring filter runs in SQL (`instr` sidesteps LIKE wildcard
    /// semantics); the technology membership test runs on the decoded set.
    pub async fn search<'e, E: SqliteExecutor<'e>>(
        executor: E,
        title_query: Option<&str>,
        technology: Option<&str>,
    ) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectRecord>(
            r#"
            SELECT * FROM projects
            WHERE ?1 IS NULL OR instr(lower(title), lower(?1)) > 0
            ORDER BY created_at DESC
            "#,
        )
        .bind(title_query)
        .fetch_all(executor)
        .await?;

        let filtered = match technology {
            Some(tech) if !tech.is_empty() => projects
                .into_iter()
                .filter(|p| {
                    p.technologies()
                        .iter()
                        .any(|t| t.eq_ignore_ascii_case(tech))
                })
                .collect(),
            _ => projects,
        };
        Ok(filtered)
    }

    pub async fn delete<'e, E: SqliteExecutor<'e>>(
        executor: E,
        project_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?1")
            .bind(project_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(executor)
            .await
    }

    pub async fn count_by_author<'e, E: SqliteExecutor<'e>>(
        executor: E,
        author_id: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE author_id = ?1")
            .bind(author_id)
            .fetch_one(executor)
            .await
    }
}
