// Row records, one module per table.

pub mod activity;
pub mod download;
pub mod project;
pub mod user;

pub use activity::{ActionKind, ActivityRecord, NewActivity};
pub use download::DownloadRecord;
pub use project::{NewProject, ProjectRecord};
pub use user::{NewUser, UserRecord};
