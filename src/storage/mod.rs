//! Archive blob storage. Uploaded archives land in an `archives/` directory
//! under randomized names; served images keep their own `images/` directory.

use std::io;
use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ArchiveStore {
    archives_dir: PathBuf,
    images_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct StoredArchive {
    /// Generated file name, the handle persisted on the project row.
    pub file_name: String,
    pub size_label: String,
}

impl ArchiveStore {
    pub async fn init(upload_dir: &str) -> io::Result<Self> {
        let root = PathBuf::from(upload_dir);
        let store = Self {
            archives_dir: root.join("archives"),
            images_dir: root.join("images"),
        };
        tokio::fs::create_dir_all(&store.archives_dir).await?;
        tokio::fs::create_dir_all(&store.images_dir).await?;
        Ok(store)
    }

    pub fn images_dir(&self) -> &PathBuf {
        &self.images_dir
    }

    /// Writes the archive under `<uuid>_<sanitized name>`, which also rules
    /// out collisions and path traversal through the client-supplied name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<StoredArchive> {
        let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name));
        tokio::fs::write(self.archives_dir.join(&file_name), bytes).await?;
        Ok(StoredArchive {
            file_name,
            size_label: human_size(bytes.len() as u64),
        })
    }

    pub async fn read(&self, file_name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.archives_dir.join(sanitize_file_name(file_name))).await
    }

    pub async fn exists(&self, file_name: &str) -> bool {
        tokio::fs::try_exists(self.archives_dir.join(sanitize_file_name(file_name)))
            .await
            .unwrap_or(false)
    }

    pub async fn remove(&self, file_name: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.archives_dir.join(sanitize_file_name(file_name))).await
    }
}

/// Keeps only `[A-Za-z0-9._-]`, dropping directory components outright.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>();
    let trimmed = base.trim_matches('.').to_string();
    if trimmed.is_empty() {
        "archive".to_string()
    } else {
        trimmed
    }
}

/// Human-readable size label, megabytes with one decimal as soon as the
/// archive is big enough to matter.
pub fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
