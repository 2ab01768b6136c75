use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{BoxFuture, Gateway, GatewayError, UrlResolver};

/// One-shot holder for the configured gateway.
///
/// The initializer runs at most once to completion; concurrent and repeated
/// callers of [`GatewayCell::get_or_try_init`] all observe the same handle. A
/// failed initialization leaves the cell empty so a later call may retry.
#[derive(Default)]
pub struct GatewayCell {
    inner: OnceCell<Arc<dyn Gateway>>,
}

impl std::fmt::Debug for GatewayCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCell")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl GatewayCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.initialized()
    }

    pub fn get(&self) -> Option<Arc<dyn Gateway>> {
        self.inner.get().cloned()
    }

    /// The gateway, or [`GatewayError::NotReady`] if initialization has not completed.
    pub fn ready(&self) -> Result<Arc<dyn Gateway>, GatewayError> {
        self.get().ok_or(GatewayError::NotReady)
    }

    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<Arc<dyn Gateway>, GatewayError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn Gateway>, GatewayError>>,
    {
        let gateway = self
            .inner
            .get_or_try_init(move || async move {
                let gateway = init().await?;
                info!("gateway initialized");
                Ok::<_, GatewayError>(gateway)
            })
            .await?;
        Ok(gateway.clone())
    }
}

impl UrlResolver for GatewayCell {
    fn resolve_public_url(&self, path: &str) -> String {
        match self.inner.get() {
            Some(gateway) => gateway.resolve_public_url(path),
            None => {
                warn!("gateway not initialized; empty url for {path}");
                String::new()
            }
        }
    }
}

impl Gateway for GatewayCell {
    fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        Box::pin(async move { self.ready()?.fetch_bytes(path).await })
    }

    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, GatewayError>> {
        Box::pin(async move { self.ready()?.fetch_json(path).await })
    }
}
