/// Backend API module
///
/// This module talks to the image-processing backend:
/// - The HTTP client and its two endpoints (client.rs)
/// - Inline / remote image references (source.rs)
/// - Network error taxonomy (error.rs)

pub mod client;
pub mod error;
pub mod source;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::BackendClient;
pub use error::NetworkError;
pub use source::ImageSource;
