use std::path::{Path, PathBuf};

use crate::{BoxFuture, Gateway, GatewayError, UrlResolver, join_url, validate_path};

/// Gateway backed by a local directory that mirrors the object store layout.
///
/// Public URLs are formed by appending the storage path to `public_base`, so a
/// static file server (or the tile server's `/storage` route) must expose
/// `root` under that prefix.
#[derive(Debug, Clone)]
pub struct FilesystemGateway {
    root: PathBuf,
    public_base: String,
}

impl FilesystemGateway {
    pub fn new(root: impl AsRef<Path>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_base: public_base.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local file backing `path`, after traversal checks.
    pub fn local_path(&self, path: &str) -> Result<PathBuf, GatewayError> {
        let rel = validate_path(path)?;
        Ok(self.root.join(rel))
    }
}

impl UrlResolver for FilesystemGateway {
    fn resolve_public_url(&self, path: &str) -> String {
        join_url(&self.public_base, path)
    }
}

impl Gateway for FilesystemGateway {
    fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        Box::pin(async move {
            let local = self.local_path(path)?;
            match tokio::fs::read(&local).await {
                Ok(data) => Ok(data),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(GatewayError::NotFound {
                    path: path.to_string(),
                }),
                Err(source) => Err(GatewayError::Io {
                    path: path.to_string(),
                    source,
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FilesystemGateway;
    use crate::{Gateway, GatewayError, UrlResolver};

    #[tokio::test]
    async fn reads_json_below_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("proj")).unwrap();
        std::fs::write(dir.path().join("proj/teams.json"), br#"{"project_title":"Demo"}"#)
            .unwrap();

        let gw = FilesystemGateway::new(dir.path(), "http://localhost/storage");
        let doc = gw.fetch_json("proj/teams.json").await.unwrap();
        assert_eq!(doc["project_title"], "Demo");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gw = FilesystemGateway::new(dir.path(), "http://localhost/storage");
        let err = gw.fetch_bytes("nope.json").await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gw = FilesystemGateway::new(dir.path(), "http://localhost/storage");
        let err = gw.fetch_bytes("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPath { .. }));
    }

    #[test]
    fn public_url_appends_path() {
        let gw = FilesystemGateway::new("/data", "http://localhost:9200/storage/");
        assert_eq!(
            gw.resolve_public_url("proj/tiles/TN01_01_level_0_tile_0_0.png"),
            "http://localhost:9200/storage/proj/tiles/TN01_01_level_0_tile_0_0.png"
        );
    }
}
