use serde::{Deserialize, Serialize};

use crate::{BoxFuture, Gateway, GatewayError, UrlResolver, join_url, validate_path};

fn default_bucket() -> String {
    "projects".to_string()
}

/// Connection settings for an object-storage REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the storage service, e.g. `https://xyz.example.co`.
    pub storage_url: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Anonymous API key sent on downloads. Never embedded in public URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
}

impl StorageConfig {
    pub fn new(storage_url: impl Into<String>) -> Self {
        Self {
            storage_url: storage_url.into(),
            bucket: default_bucket(),
            anon_key: None,
        }
    }
}

/// Gateway speaking the object-storage REST protocol over HTTP.
///
/// Downloads go to `{storage_url}/storage/v1/object/{bucket}/{path}`; public
/// URLs have the form `{storage_url}/storage/v1/object/public/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    config: StorageConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Validates the configuration and builds the HTTP client.
    pub fn connect(config: StorageConfig) -> Result<Self, GatewayError> {
        let url = config.storage_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GatewayError::Init(format!(
                "storage url must be http(s): {url:?}"
            )));
        }
        if config.bucket.trim().is_empty() {
            return Err(GatewayError::Init("bucket name is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Init(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }

    fn object_base(&self) -> String {
        format!(
            "{}/storage/v1/object/{}",
            self.config.storage_url.trim_end_matches('/'),
            self.config.bucket
        )
    }

    fn public_base(&self) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.config.storage_url.trim_end_matches('/'),
            self.config.bucket
        )
    }

    pub fn download_url(&self, path: &str) -> String {
        join_url(&self.object_base(), path)
    }
}

impl UrlResolver for HttpGateway {
    fn resolve_public_url(&self, path: &str) -> String {
        join_url(&self.public_base(), path)
    }
}

impl Gateway for HttpGateway {
    fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        Box::pin(async move {
            let rel = validate_path(path)?;
            let mut req = self.client.get(self.download_url(rel));
            if let Some(key) = &self.config.anon_key {
                req = req.header("apikey", key).bearer_auth(key);
            }

            let resp = req.send().await.map_err(|e| GatewayError::Http {
                path: path.to_string(),
                message: "request failed".to_string(),
                source: Some(e),
            })?;

            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(GatewayError::NotFound {
                    path: path.to_string(),
                });
            }

            if !resp.status().is_success() {
                return Err(GatewayError::Http {
                    path: path.to_string(),
                    message: format!("HTTP error: {}", resp.status()),
                    source: None,
                });
            }

            let bytes = resp.bytes().await.map_err(|e| GatewayError::Http {
                path: path.to_string(),
                message: "failed to read response".to_string(),
                source: Some(e),
            })?;
            Ok(bytes.to_vec())
        })
    }
}
