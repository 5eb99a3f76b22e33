/// Shared data structures for the session state
///
/// These structs represent the data model that flows between
/// the backend client and the UI layer. None of it outlives the session.
use serde::Deserialize;

/// A themed background offered by the backend catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackgroundOption {
    /// File name on the server (e.g., "stadium.png"), unique within the catalog
    pub name: String,
    /// `data:` URL or URL of a preview thumbnail
    pub preview: String,
}

impl BackgroundOption {
    /// Label shown under the thumbnail: the name up to its first dot
    pub fn label(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

/// The photo picked by the user, already validated
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// File name only (e.g., "photo.jpg"), sent along with the multipart part
    pub file_name: String,
    /// MIME type inferred from the extension
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Keep the bytes out of log lines
impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// The composited picture returned by the backend
#[derive(Clone, PartialEq, Eq)]
pub struct ResultImage {
    /// The `result` reference exactly as the backend sent it
    pub source: String,
    /// Resolved image bytes
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ResultImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // data: references can be megabytes long
        let source: String = self.source.chars().take(48).collect();
        f.debug_struct("ResultImage")
            .field("source", &source)
            .field("size", &self.bytes.len())
            .finish()
    }
}
