//! Loading schema bytes from disk or over HTTP(S)

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pulumi_crd_core::Document;
use url::Url;

use crate::error::{FetchError, Result};
use crate::source::{SchemaSource, sanitize_url};

/// Deadline for URL fetches
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Reads input schemas
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    /// Base for relative paths; ignored unless absolute
    working_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self {
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving relative paths against `PWD`
    pub fn from_env() -> Self {
        let working_dir = std::env::var_os("PWD").map(PathBuf::from);
        Self {
            working_dir,
            ..Self::default()
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read the raw bytes behind `raw`
    pub async fn load_bytes(&self, raw: &str) -> Result<Vec<u8>> {
        match SchemaSource::parse(raw) {
            SchemaSource::Url(url) => self.fetch(&url).await,
            SchemaSource::Path(path) => self.read_local(raw, &path),
        }
    }

    /// Read and decode the schema behind `raw`
    pub async fn load(&self, raw: &str) -> Result<Document> {
        let bytes = self.load_bytes(raw).await?;
        tracing::debug!(source = %SchemaSource::parse(raw), bytes = bytes.len(), "loaded input schema");
        Ok(Document::from_slice(&bytes)?)
    }

    /// [`load`](Self::load), abandoned as soon as `cancel` completes
    pub async fn load_until<F>(&self, raw: &str, cancel: F) -> Result<Document>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            loaded = self.load(raw) => loaded,
            () = cancel => {
                let location = SchemaSource::parse(raw).to_string();
                tracing::debug!(source = %location, "schema load cancelled");
                Err(FetchError::Cancelled { location })
            }
        }
    }

    fn read_local(&self, raw: &str, path: &Path) -> Result<Vec<u8>> {
        if path.is_relative() {
            if let Some(base) = self.working_dir.as_deref().filter(|dir| dir.is_absolute()) {
                let candidate = base.join(path);
                match std::fs::read(&candidate) {
                    Ok(bytes) => return Ok(bytes),
                    Err(e) => tracing::trace!(
                        candidate = %candidate.display(),
                        error = %e,
                        "working directory candidate unreadable"
                    ),
                }
            }
        }

        std::fs::read(path).map_err(|cause| FetchError::Read {
            location: raw.to_string(),
            cause,
        })
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let sanitized = sanitize_url(url);
        tracing::debug!(url = %sanitized, timeout = ?self.timeout, "fetching input schema");

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.transport_error(&sanitized, e))?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&sanitized, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: sanitized,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&sanitized, e))?;
        Ok(bytes.to_vec())
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                cause: e.without_url(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn schema_body() -> serde_json::Value {
        json!({
            "name": "demo",
            "resources": { "demo:index:Site": { "isComponent": true } }
        })
    }

    #[tokio::test]
    async fn test_reads_absolute_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("schema.json");
        std::fs::write(&file, schema_body().to_string()).unwrap();

        let doc = SchemaLoader::new().load(file.to_str().unwrap()).await.unwrap();
        assert_eq!(doc.name, "demo");
    }

    #[tokio::test]
    async fn test_relative_path_prefers_working_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pulumi-crd-loader-test.json"), schema_body().to_string()).unwrap();

        let doc = SchemaLoader::new()
            .with_working_dir(dir.path())
            .load("pulumi-crd-loader-test.json")
            .await
            .unwrap();
        assert!(doc.resources.contains_key("demo:index:Site"));
    }

    #[tokio::test]
    async fn test_relative_path_falls_back_to_current_dir() {
        // Unit tests run from the package root, so this file is reachable only
        // through the process's current directory.
        let file = tempfile::Builder::new()
            .prefix("pulumi-crd-fallback-")
            .suffix(".json")
            .tempfile_in(".")
            .unwrap();
        std::fs::write(file.path(), schema_body().to_string()).unwrap();
        let relative = file.path().file_name().unwrap().to_str().unwrap().to_string();

        let elsewhere = TempDir::new().unwrap();
        assert!(!elsewhere.path().join(&relative).exists());

        let doc = SchemaLoader::new()
            .with_working_dir(elsewhere.path())
            .load(&relative)
            .await
            .unwrap();
        assert_eq!(doc.name, "demo");
    }

    #[tokio::test]
    async fn test_relative_working_dir_is_ignored() {
        let err = SchemaLoader::new()
            .with_working_dir("relative/base")
            .load("does-not-exist.json")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Read { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_message() {
        let err = SchemaLoader::new().load("missing-schema.json").await.unwrap_err();
        assert!(
            err.to_string().starts_with("read input schema \"missing-schema.json\": "),
            "unexpected message: {err}"
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "{ not json").unwrap();

        let err = SchemaLoader::new().load(file.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().starts_with("parse input schema as JSON: "));
    }

    #[tokio::test]
    async fn test_fetches_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schema.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schema_body()))
            .mount(&server)
            .await;

        let doc = SchemaLoader::new()
            .load(&format!("{}/schema.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.name, "demo");
    }

    #[tokio::test]
    async fn test_non_success_status_uses_sanitized_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schema.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = SchemaLoader::new()
            .load(&format!("{}/schema.json?token=secret#frag", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("fetch input schema \"{}/schema.json\": HTTP 404", server.uri())
        );
    }

    #[tokio::test]
    async fn test_timeout_enforced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = SchemaLoader::new()
            .with_timeout(Duration::from_millis(100))
            .load(&format!("{}/slow.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_cancel_aborts_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = SchemaLoader::new()
            .load_until(&format!("{}/slow.json?sig=1", server.uri()), std::future::ready(()))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(
            err.to_string(),
            format!("load input schema \"{}/slow.json\": cancelled", server.uri())
        );
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(SchemaLoader::new().timeout(), Duration::from_secs(15));
        assert_eq!(SchemaLoader::from_env().timeout(), DEFAULT_TIMEOUT);
    }
}
