/// Session state machine
///
/// Holds everything the user has chosen during one run of the application
/// and decides which transitions are allowed. It performs no I/O: the shell
/// in `main.rs` runs the network calls and feeds their outcomes back in.
use thiserror::Error;
use tracing::{error, info};

use super::data::{BackgroundOption, ResultImage, UploadedImage};
use super::notify::Notification;
use crate::api::NetworkError;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Catalog request in flight (startup)
    LoadingCatalog,
    /// Waiting for the user
    Ready,
    /// Processing request in flight
    Processing,
}

/// Why generate was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("an image and a background are both required")]
    MissingInput,
    #[error("a processing request is already in flight")]
    Busy,
}

/// What the shell has to send to `/api/process`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub image: UploadedImage,
    pub background: String,
}

/// The two inputs generate needs
#[derive(Debug, Clone, Default, PartialEq)]
struct Selection {
    pub uploaded: Option<UploadedImage>,
    pub background: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    catalog: Vec<BackgroundOption>,
    selection: Selection,
    result: Option<ResultImage>,
}

impl Session {
    /// A fresh session; the caller is expected to start the catalog fetch
    pub fn new() -> Self {
        Session {
            phase: Phase::LoadingCatalog,
            catalog: Vec::new(),
            selection: Selection::default(),
            result: None,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading_catalog(&self) -> bool {
        self.phase == Phase::LoadingCatalog
    }

    pub fn is_processing(&self) -> bool {
        self.phase == Phase::Processing
    }

    pub fn catalog(&self) -> &[BackgroundOption] {
        &self.catalog
    }

    pub fn uploaded(&self) -> Option<&UploadedImage> {
        self.selection.uploaded.as_ref()
    }

    pub fn selected_background(&self) -> Option<&str> {
        self.selection.background.as_deref()
    }

    pub fn result(&self) -> Option<&ResultImage> {
        self.result.as_ref()
    }

    /// Generate is only offered with both inputs present and nothing in flight
    pub fn can_generate(&self) -> bool {
        self.selection.uploaded.is_some()
            && self.selection.background.is_some()
            && self.phase != Phase::Processing
    }

    /// Apply the outcome of the startup catalog fetch
    pub fn catalog_loaded(
        &mut self,
        outcome: Result<Vec<BackgroundOption>, NetworkError>,
    ) -> Option<Notification> {
        if self.phase == Phase::LoadingCatalog {
            self.phase = Phase::Ready;
        }

        match outcome {
            Ok(catalog) => {
                info!(count = catalog.len(), "background catalog loaded");
                self.selection.background = catalog.first().map(|bg| bg.name.clone());
                self.catalog = catalog;
                None
            }
            Err(err) => {
                error!(%err, "failed to fetch backgrounds");
                self.catalog.clear();
                Some(Notification::catalog_failed())
            }
        }
    }

    /// Take a new photo; any previous result belongs to the old one
    pub fn upload(&mut self, image: UploadedImage) {
        info!(file = %image.file_name, size = image.size(), "image uploaded");
        self.selection.uploaded = Some(image);
        self.result = None;
    }

    /// Select a background by name. Names outside the catalog are ignored.
    pub fn select_background(&mut self, name: &str) -> bool {
        if !self.catalog.iter().any(|bg| bg.name == name) {
            return false;
        }
        self.selection.background = Some(name.to_string());
        true
    }

    /// Move to `Processing` and hand out the request to send
    pub fn begin_processing(&mut self) -> Result<ProcessRequest, ValidationError> {
        if self.phase == Phase::Processing {
            return Err(ValidationError::Busy);
        }

        let (Some(image), Some(background)) =
            (&self.selection.uploaded, &self.selection.background)
        else {
            return Err(ValidationError::MissingInput);
        };

        let request = ProcessRequest { image: image.clone(), background: background.clone() };
        self.phase = Phase::Processing;
        Ok(request)
    }

    /// Apply the outcome of a processing call. Always leaves `Processing`.
    pub fn processing_finished(&mut self, outcome: Result<ResultImage, NetworkError>) -> Notification {
        self.phase = Phase::Ready;

        match outcome {
            Ok(result) => {
                info!(?result, "profile picture generated");
                self.result = Some(result);
                Notification::processing_succeeded()
            }
            Err(err) => {
                error!(%err, "failed to process image");
                Notification::processing_failed()
            }
        }
    }

    /// Start over with the same catalog and background
    pub fn reset(&mut self) {
        self.selection.uploaded = None;
        self.result = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
