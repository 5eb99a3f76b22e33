/// Photo intake: validation and loading of the user's image file
///
/// Only JPEG, PNG and GIF files up to 5 MB are accepted, judged by extension
/// and size, before any bytes are read.
use image::ImageFormat;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::state::data::UploadedImage;

/// Largest accepted upload (5 MB)
pub const MAX_UPLOAD_BYTES: u64 = 5_242_880;

/// Extensions offered by the picker and accepted from drops
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{file}: only JPG, PNG and GIF images are supported")]
    UnsupportedType { file: String },

    #[error("{file}: {size} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit")]
    TooLarge { file: String, size: u64 },

    #[error("{file}: {message}")]
    Io { file: String, message: String },
}

/// Check the extension allow-list and size limit.
/// Returns the MIME type the file will be sent with.
pub fn validate(path: &Path, size: u64) -> Result<&'static str, UploadError> {
    let file = display_name(path);

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| UploadError::UnsupportedType { file: file.clone() })?;

    let mime = ImageFormat::from_extension(&extension)
        .map(|format| format.to_mime_type())
        .ok_or_else(|| UploadError::UnsupportedType { file: file.clone() })?;

    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { file, size });
    }

    Ok(mime)
}

/// Validate `path` from its metadata, then read it
pub async fn load(path: &Path) -> Result<UploadedImage, UploadError> {
    let file_name = display_name(path);
    let io_error = |e: std::io::Error| UploadError::Io { file: file_name.clone(), message: e.to_string() };

    let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
    if !metadata.is_file() {
        return Err(UploadError::Io { file: file_name.clone(), message: "not a regular file".to_string() });
    }
    validate(path, metadata.len())?;

    let bytes = tokio::fs::read(path).await.map_err(io_error)?;

    // The file may have grown between the two calls
    let mime = validate(path, bytes.len() as u64)?;

    info!(file = %file_name, size = bytes.len(), mime, "image accepted");

    Ok(UploadedImage { file_name, mime, bytes })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
