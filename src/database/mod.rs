//! SQLite pool setup and schema bootstrap.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        matricule     TEXT NOT NULL UNIQUE,
        email         TEXT NOT NULL UNIQUE,
        pseudo        TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL,
        registered_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id           TEXT PRIMARY KEY,
        title        TEXT NOT NULL,
        description  TEXT NOT NULL DEFAULT '',
        technologies TEXT NOT NULL DEFAULT '[]',
        category     TEXT,
        author_id    TEXT,
        author_name  TEXT NOT NULL DEFAULT '',
        created_at   TIMESTAMP NOT NULL,
        archive_size TEXT NOT NULL DEFAULT '0 B',
        archive_path TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS downloads (
        id            TEXT PRIMARY KEY,
        user_id       TEXT NOT NULL,
        project_id    TEXT NOT NULL,
        downloaded_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS activities (
        id         TEXT PRIMARY KEY,
        actor_id   TEXT,
        actor_name TEXT NOT NULL,
        action     TEXT NOT NULL,
        details    TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMP NOT NULL
    )
    "#,
];

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
