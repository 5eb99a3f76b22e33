/// User-facing notifications raised by the session
///
/// The session only decides *what* to tell the user; the toast stack in
/// `ui::toast` decides how long it stays on screen.

/// Severity of a notification, drives the toast color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notification {
    /// The background catalog could not be fetched
    pub fn catalog_failed() -> Self {
        Notification {
            level: Level::Error,
            title: "Error",
            description: "Failed to load background images",
        }
    }

    /// Generate was pressed without a photo or a background
    pub fn missing_input() -> Self {
        Notification {
            level: Level::Warning,
            title: "Missing information",
            description: "Please upload an image and select a background",
        }
    }

    pub fn processing_succeeded() -> Self {
        Notification {
            level: Level::Success,
            title: "Success",
            description: "Your profile picture has been generated!",
        }
    }

    pub fn processing_failed() -> Self {
        Notification {
            level: Level::Error,
            title: "Error",
            description: "Failed to process your image",
        }
    }
}
