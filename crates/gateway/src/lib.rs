//! Remote data gateway for project documents and tile images.
//!
//! A gateway resolves logical storage paths (`project-a/tiles/metadata.json`)
//! to bytes, to parsed JSON, or to a public URL the rendering engine can fetch
//! without credentials. Implementations:
//! - [`FilesystemGateway`]: a local directory mirroring the object store
//! - [`HttpGateway`]: an object-storage REST endpoint
//! - [`MemoryGateway`]: in-memory objects for tests and demos
//!
//! [`GatewayCell`] wraps whichever one is configured behind a one-shot
//! initializer so callers never race the gateway's construction.

pub mod cell;
pub mod error;
pub mod fs;
pub mod http;
pub mod memory;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use cell::*;
pub use error::*;
pub use fs::*;
pub use http::*;
pub use memory::*;
pub use streaming::UrlResolver;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for remote document/object access.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait Gateway: UrlResolver + Send + Sync {
    /// Fetch the raw bytes stored at `path`.
    ///
    /// A missing object is reported as [`GatewayError::NotFound`].
    fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>>;

    /// Fetch and parse a JSON document.
    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, GatewayError>> {
        Box::pin(async move {
            let bytes = self.fetch_bytes(path).await?;
            serde_json::from_slice(&bytes).map_err(|source| GatewayError::Parse {
                path: path.to_string(),
                source,
            })
        })
    }
}

impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        (**self).fetch_bytes(path)
    }

    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, GatewayError>> {
        (**self).fetch_json(path)
    }
}

/// Joins a base URL and a storage path with exactly one separating slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Rejects paths that could escape a storage root.
pub(crate) fn validate_path(path: &str) -> Result<&str, GatewayError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(|seg| seg == "..") {
        return Err(GatewayError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(trimmed)
}
