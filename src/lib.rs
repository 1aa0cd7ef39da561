use std::sync::Arc;

use sqlx::SqlitePool;

use activation::CodeStore;
use config::Config;
use mail::Mailer;
use storage::ArchiveStore;

pub mod activation;
pub mod config;
pub mod database;
pub mod error;
pub mod mail;
pub mod middleware;
pub mod routes;
pub mod storage;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub codes: Arc<CodeStore>,
    pub mailer: Arc<dyn Mailer>,
    pub archives: ArchiveStore,
}
