use super::{AliasMap, Backend, BackendError};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Volatile backend holding the mapping in process memory.
///
/// Useful for tests and throwaway deployments (`STORAGE_BACKEND=memory`).
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    links: RwLock<AliasMap>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with `links`.
    pub fn with_links(links: AliasMap) -> Self {
        Self {
            links: RwLock::new(links),
        }
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn load(&self) -> Result<AliasMap, BackendError> {
        Ok(self.links.read().await.clone())
    }

    async fn save(&self, links: &AliasMap) -> Result<(), BackendError> {
        *self.links.write().await = links.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_and_keeps_saved_state() {
        let backend = InMemoryBackend::new();
        assert!(backend.load().await.unwrap().is_empty());

        let mut links = AliasMap::new();
        links.insert("ex1".into(), "https://example.com".into());
        backend.save(&links).await.unwrap();

        assert_eq!(backend.load().await.unwrap(), links);
    }
}
