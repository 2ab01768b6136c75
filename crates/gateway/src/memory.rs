use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{BoxFuture, Gateway, GatewayError, UrlResolver, join_url};

/// In-memory object store for testing or fixtures.
#[derive(Debug)]
pub struct MemoryGateway {
    public_base: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryGateway {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(path.into(), data.into());
    }

    pub async fn insert_json(&self, path: impl Into<String>, value: &serde_json::Value) {
        self.insert(path, value.to_string()).await;
    }

    pub async fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.write().await.remove(path)
    }
}

impl UrlResolver for MemoryGateway {
    fn resolve_public_url(&self, path: &str) -> String {
        join_url(&self.public_base, path)
    }
}

impl Gateway for MemoryGateway {
    fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
        Box::pin(async move {
            self.objects
                .read()
                .await
                .get(path)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound {
                    path: path.to_string(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryGateway;
    use crate::{Gateway, GatewayError};

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let gw = MemoryGateway::new("mem://");
        gw.insert("bad.json", "{ not json").await;
        let err = gw.fetch_json("bad.json").await.unwrap_err();
        assert!(matches!(err, GatewayError::Parse { .. }));
        assert_eq!(err.path(), Some("bad.json"));
    }

    #[tokio::test]
    async fn removed_objects_are_not_found() {
        let gw = MemoryGateway::new("mem://");
        gw.insert_json("a.json", &serde_json::json!({"k": 1})).await;
        assert_eq!(gw.fetch_json("a.json").await.unwrap()["k"], 1);
        assert!(gw.remove("a.json").await.is_some());
        assert!(gw.fetch_bytes("a.json").await.unwrap_err().is_not_found());
    }
}
