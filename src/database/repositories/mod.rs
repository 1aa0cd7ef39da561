// SQL operations per aggregate. Inserts and deletes take any executor so
// handlers can run them inside one transaction.

pub mod activity;
pub mod download;
pub mod project;
pub mod user;

pub use activity::ActivityRepository;
pub use download::{DownloadRepository, DownloadedProjectRecord};
pub use project::ProjectRepository;
pub use user::UserRepository;
