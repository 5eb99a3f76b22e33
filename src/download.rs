/// Saving the generated picture to disk
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Every result is saved under this name
pub const RESULT_FILE_NAME: &str = "rcb-profile-picture.png";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not save {path}: {message}")]
pub struct DownloadError {
    pub path: String,
    pub message: String,
}

/// Write `bytes` to `<dir>/rcb-profile-picture.png`, replacing any earlier save
pub async fn save_result(dir: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, DownloadError> {
    let path = dir.join(RESULT_FILE_NAME);
    let fail = |path: &Path, e: std::io::Error| DownloadError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    tokio::fs::create_dir_all(&dir).await.map_err(|e| fail(&dir, e))?;
    tokio::fs::write(&path, &bytes).await.map_err(|e| fail(&path, e))?;

    info!(path = %path.display(), size = bytes.len(), "result saved");
    Ok(path)
}
