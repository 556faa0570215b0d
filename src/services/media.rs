use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::config;

/// Where a stored image lives on disk.
pub fn media_path(filename: &str) -> PathBuf {
    config::config().storage.media_root.join(filename)
}

pub async fn ensure_media_root() -> std::io::Result<()> {
    fs::create_dir_all(&config::config().storage.media_root).await
}

/// Storage name for an upload: random stem plus a sanitized extension.
///
/// The client-supplied name never reaches the filesystem, only its
/// extension does, and only when it is plain ASCII.
pub fn unique_filename(original: Option<&str>) -> String {
    let stem = Uuid::new_v4().to_string();

    match extension_of(original) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

fn extension_of(original: Option<&str>) -> Option<String> {
    let ext = Path::new(original?).extension()?.to_str()?;

    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

/// Best-effort removal of stored images; files already gone are fine.
pub async fn delete_images(filenames: &[String]) {
    for filename in filenames {
        let path = media_path(filename);

        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not delete media file {}: {}", path.display(), e);
            }
        }
    }
}
