use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::Deserialize;
use tracing::debug;

use super::{ImageSource, NetworkError};
use crate::config::Config;
use crate::state::data::{BackgroundOption, ResultImage, UploadedImage};

/// Body of a successful `POST /api/process`
#[derive(Debug, Deserialize)]
struct ProcessResponse {
    result: String,
}

/// HTTP client for the image-processing backend.
///
/// Cheap to clone: `reqwest::Client` shares its connection pool, so every
/// async task gets its own copy.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Build a client for `config.api_url` with the configured request timeout
    pub fn new(config: &Config) -> Result<Self, NetworkError> {
        let base_url = Url::parse(&config.api_url).map_err(|e| NetworkError::InvalidBaseUrl {
            url: config.api_url.clone(),
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::from_reqwest(&config.api_url, e))?;

        Ok(BackendClient { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}{path}`, concatenated like the web client did so a base path survives
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Fetch the background catalog, in server order
    pub async fn fetch_backgrounds(&self) -> Result<Vec<BackgroundOption>, NetworkError> {
        let url = self.endpoint("/api/backgrounds");
        debug!(%url, "fetching background catalog");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(&url, e))?;

        check_status(&url, response)?
            .json::<Vec<BackgroundOption>>()
            .await
            .map_err(|e| decode_error(&url, e))
    }

    /// Submit the photo and background name, then resolve the composite image
    pub async fn process_image(
        &self,
        image: &UploadedImage,
        background: &str,
    ) -> Result<ResultImage, NetworkError> {
        let url = self.endpoint("/api/process");
        debug!(%url, file = %image.file_name, size = image.size(), background, "submitting image");

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)
            .map_err(|e| NetworkError::from_reqwest(&url, e))?;
        let form = Form::new()
            .part("image", part)
            .text("background", background.to_string());

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(&url, e))?;

        let body: ProcessResponse = check_status(&url, response)?
            .json()
            .await
            .map_err(|e| decode_error(&url, e))?;

        let bytes = self.load_image(self.resolve(&body.result)?).await?;

        Ok(ResultImage { source: body.result, bytes })
    }

    /// Turn a backend image reference into an [`ImageSource`]
    pub fn resolve(&self, reference: &str) -> Result<ImageSource, NetworkError> {
        ImageSource::parse(reference, &self.base_url)
    }

    /// Get the bytes behind an image reference; inline data needs no request
    pub async fn load_image(&self, source: ImageSource) -> Result<Vec<u8>, NetworkError> {
        let url = match source {
            ImageSource::Data { bytes, .. } => return Ok(bytes),
            ImageSource::Remote(url) => url.to_string(),
        };
        debug!(%url, "fetching image");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(&url, e))?;

        let bytes = check_status(&url, response)?
            .bytes()
            .await
            .map_err(|e| NetworkError::from_reqwest(&url, e))?;

        Ok(bytes.to_vec())
    }
}

/// Anything other than 2xx is a failure
fn check_status(url: &str, response: Response) -> Result<Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(NetworkError::Status { url: url.to_string(), code: status.as_u16() })
    }
}

/// Body-level failures while parsing JSON are decode errors, whatever reqwest calls them
fn decode_error(url: &str, err: reqwest::Error) -> NetworkError {
    match NetworkError::from_reqwest(url, err) {
        NetworkError::Transport { url, message } => NetworkError::Decode { url, message },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{dead_base_url, serve, Canned};
    use base64::{engine::general_purpose, Engine as _};

    fn client_for(base: &str) -> BackendClient {
        BackendClient::new(&Config::with_api_url_override(Some(base.to_string()))).unwrap()
    }

    fn photo() -> UploadedImage {
        UploadedImage {
            file_name: "photo.jpg".to_string(),
            mime: "image/jpeg",
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_fetch_backgrounds_keeps_server_order() {
        let (base, server) = serve(vec![Canned::json(
            r#"[{"name":"stadium.png","preview":"/img/stadium.png"},
                {"name":"crowd.jpg","preview":"data:image/jpg;base64,AAAA"}]"#,
        )])
        .await;

        let catalog = client_for(&base).fetch_backgrounds().await.unwrap();

        let names: Vec<&str> = catalog.iter().map(|bg| bg.name.as_str()).collect();
        assert_eq!(names, ["stadium.png", "crowd.jpg"]);

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /api/backgrounds HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (base, server) = serve(vec![Canned::status("500 Internal Server Error")]).await;

        let err = client_for(&base).fetch_backgrounds().await.unwrap_err();

        assert!(matches!(err, NetworkError::Status { code: 500, .. }), "got {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_catalog_is_a_decode_error() {
        let (base, server) = serve(vec![Canned::json(r#"{"backgrounds": []}"#)]).await;

        let err = client_for(&base).fetch_backgrounds().await.unwrap_err();

        assert!(matches!(err, NetworkError::Decode { .. }), "got {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        let base = dead_base_url().await;

        let err = client_for(&base).fetch_backgrounds().await.unwrap_err();

        assert!(matches!(err, NetworkError::Transport { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_process_image_sends_multipart_and_decodes_inline_result() {
        let composite = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A];
        let reference = format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&composite));
        let (base, server) = serve(vec![Canned::json(format!(r#"{{"result":"{reference}"}}"#))]).await;

        let result = client_for(&base).process_image(&photo(), "stadium.png").await.unwrap();

        assert_eq!(result.bytes, composite);
        assert_eq!(result.source, reference);

        let requests = server.await.unwrap();
        let request = &requests[0];
        assert!(request.starts_with("POST /api/process HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains(r#"name="image"; filename="photo.jpg""#));
        assert!(request.contains("image/jpeg"));
        assert!(request.contains(r#"name="background""#));
        assert!(request.contains("stadium.png"));
    }

    #[tokio::test]
    async fn test_process_image_fetches_remote_result() {
        let composite = vec![1, 2, 3, 4];
        let (base, server) = serve(vec![
            Canned::json(r#"{"result":"/tmp/out.png"}"#),
            Canned::png(composite.clone()),
        ])
        .await;

        let result = client_for(&base).process_image(&photo(), "stadium.png").await.unwrap();

        assert_eq!(result.source, "/tmp/out.png");
        assert_eq!(result.bytes, composite);

        let requests = server.await.unwrap();
        assert!(requests[1].starts_with("GET /tmp/out.png HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_process_failure_is_reported() {
        let (base, server) = serve(vec![Canned::status("400 Bad Request")]).await;

        let err = client_for(&base).process_image(&photo(), "missing.png").await.unwrap_err();

        assert!(matches!(err, NetworkError::Status { code: 400, .. }), "got {err:?}");
        server.await.unwrap();
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = Config::with_api_url_override(Some("not a url".to_string()));
        let err = BackendClient::new(&config).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client_for("http://localhost:5000/pfp/");
        assert_eq!(client.endpoint("/api/process"), "http://localhost:5000/pfp/api/process");
    }
}
