/// Image references returned by the backend
///
/// Catalog previews and processing results come back as strings that are
/// either `data:` URLs carrying the image inline (base64) or URLs, possibly
/// relative to the backend base URL.
use base64::{engine::general_purpose, Engine as _};
use reqwest::Url;

use super::NetworkError;

#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline image decoded from a `data:` URL
    Data { mime: String, bytes: Vec<u8> },
    /// Image that still has to be fetched
    Remote(Url),
}

impl ImageSource {
    /// Parse a reference, resolving relative paths against `base`
    pub fn parse(reference: &str, base: &Url) -> Result<Self, NetworkError> {
        let reference = reference.trim();
        if let Some(rest) = reference.strip_prefix("data:") {
            return parse_data_url(reference, rest);
        }

        let url = base
            .join(reference)
            .map_err(|e| invalid(reference, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(ImageSource::Remote(url)),
            scheme => Err(invalid(reference, format!("unsupported scheme {scheme:?}"))),
        }
    }
}

/// Split `data:<mime>;base64,<payload>` and decode the payload
fn parse_data_url(reference: &str, rest: &str) -> Result<ImageSource, NetworkError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid(reference, "missing ',' separator"))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| invalid(reference, "only base64 data URLs are supported"))?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| invalid(reference, e.to_string()))?;

    Ok(ImageSource::Data {
        mime: if mime.is_empty() { "application/octet-stream".to_string() } else { mime.to_string() },
        bytes,
    })
}

fn invalid(reference: &str, message: impl Into<String>) -> NetworkError {
    // Don't drag a whole inline image into the error text
    let reference: String = reference.chars().take(64).collect();
    NetworkError::InvalidReference { reference, message: message.into() }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Data { mime, bytes } => f
                .debug_struct("Data")
                .field("mime", mime)
                .field("size", &bytes.len())
                .finish(),
            ImageSource::Remote(url) => f.debug_tuple("Remote").field(&url.as_str()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:5000").unwrap()
    }

    #[test]
    fn test_data_url_is_decoded() {
        let payload = general_purpose::STANDARD.encode([0x89, b'P', b'N', b'G']);
        let reference = format!("data:image/png;base64,{payload}");

        let source = ImageSource::parse(&reference, &base()).unwrap();

        assert_eq!(
            source,
            ImageSource::Data { mime: "image/png".to_string(), bytes: vec![0x89, b'P', b'N', b'G'] }
        );
    }

    #[test]
    fn test_relative_path_resolves_against_base() {
        let source = ImageSource::parse("/tmp/out.png", &base()).unwrap();
        assert_eq!(
            source,
            ImageSource::Remote(Url::parse("http://localhost:5000/tmp/out.png").unwrap())
        );
    }

    #[test]
    fn test_absolute_url_is_kept() {
        let source = ImageSource::parse("https://cdn.example.com/bg/stadium.png", &base()).unwrap();
        match source {
            ImageSource::Remote(url) => assert_eq!(url.as_str(), "https://cdn.example.com/bg/stadium.png"),
            other => panic!("expected remote source, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_references_are_rejected() {
        for reference in [
            "data:image/png;base64",
            "data:image/png,rawbytes",
            "data:image/png;base64,@@not-base64@@",
            "file:///etc/passwd",
        ] {
            let err = ImageSource::parse(reference, &base()).unwrap_err();
            assert!(
                matches!(err, NetworkError::InvalidReference { .. }),
                "{reference} gave {err:?}"
            );
        }
    }
}
