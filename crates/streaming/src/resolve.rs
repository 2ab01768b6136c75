use std::sync::Arc;

/// Synchronous mapping from a storage path to a fetchable public URL.
///
/// Must be pure: the same path always yields the same URL, and no credentials
/// are ever embedded. Returns an empty string when the resolver is not ready.
pub trait UrlResolver {
    fn resolve_public_url(&self, path: &str) -> String;
}

impl<R: UrlResolver + ?Sized> UrlResolver for Arc<R> {
    fn resolve_public_url(&self, path: &str) -> String {
        (**self).resolve_public_url(path)
    }
}

impl<R: UrlResolver + ?Sized> UrlResolver for &R {
    fn resolve_public_url(&self, path: &str) -> String {
        (**self).resolve_public_url(path)
    }
}

/// Resolver that serves paths under a fixed URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixResolver {
    pub base: String,
}

impl PrefixResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl UrlResolver for PrefixResolver {
    fn resolve_public_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
