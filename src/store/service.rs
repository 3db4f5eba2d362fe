//! Alias store service enforcing the create/get/list/update/delete contract.

use crate::{
    backend::{AliasMap, Backend, backend_from_config},
    codegen::{CodeGenerator, RandomHexGenerator},
    config::Config,
    metrics::{MetricsSnapshot, StoreMetrics},
    store::{
        sanitize::{normalize_code, sanitize_target, short_url},
        types::{AliasEntry, StoreError, StoreSettings},
    },
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Owns the code→target mapping and every invariant around it.
///
/// Each operation reads the full mapping from the backend. Mutations run the whole
/// load→modify→save cycle while holding the write side of `gate`, so at most one writer touches
/// the backend at a time; reads hold the read side and therefore never interleave with a save.
/// Construct the store once near process start and share it through an `Arc`.
pub struct AliasStore {
    backend: Box<dyn Backend>,
    generator: Box<dyn CodeGenerator>,
    settings: StoreSettings,
    metrics: StoreMetrics,
    gate: RwLock<()>,
}

/// Abstraction over the alias store used by external surfaces (HTTP, MCP, CLI).
#[async_trait]
pub trait AliasApi: Send + Sync {
    /// Map `target` to `requested_code` (normalized) or to a freshly generated code.
    async fn create(
        &self,
        target: String,
        requested_code: Option<String>,
    ) -> Result<AliasEntry, StoreError>;

    /// Resolve `code` verbatim to its target.
    async fn get(&self, code: &str) -> Result<String, StoreError>;

    /// Snapshot of the full mapping.
    async fn list(&self) -> Result<AliasMap, StoreError>;

    /// Replace the target of an existing code.
    async fn update(&self, code: &str, target: String) -> Result<AliasEntry, StoreError>;

    /// Remove the mapping for `code`.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;

    /// Fully qualified redirect URL for `code`.
    fn short_url(&self, code: &str) -> String;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl AliasStore {
    /// Build a store over `backend` using random hex codes.
    pub fn new(backend: Box<dyn Backend>, settings: StoreSettings) -> Self {
        Self::with_generator(backend, Box::new(RandomHexGenerator::new()), settings)
    }

    /// Build a store with an explicit code generator.
    pub fn with_generator(
        backend: Box<dyn Backend>,
        generator: Box<dyn CodeGenerator>,
        settings: StoreSettings,
    ) -> Self {
        tracing::debug!(
            backend = %backend.describe(),
            base_url = %settings.base_url,
            max_generation_attempts = settings.max_generation_attempts,
            "Alias store initialized"
        );
        Self {
            backend,
            generator,
            settings,
            metrics: StoreMetrics::new(),
            gate: RwLock::new(()),
        }
    }

    /// Build a store from loaded configuration, prefixing short URLs with `base_url`.
    pub fn from_config(config: &Config, base_url: impl Into<String>) -> Self {
        let settings = StoreSettings::new(base_url)
            .with_max_generation_attempts(config.code_generation_max_attempts);
        Self::new(backend_from_config(config), settings)
    }

    /// Description of the configured backend.
    pub fn describe_backend(&self) -> String {
        self.backend.describe()
    }

    /// Draw generated codes until one is unused or the retry bound is hit.
    fn generate_unused_code(&self, links: &AliasMap) -> Result<String, StoreError> {
        let attempts = self.settings.max_generation_attempts.max(1);
        for attempt in 1..=attempts {
            let candidate = self.generator.generate();
            if !links.contains_key(&candidate) {
                return Ok(candidate);
            }
            self.metrics.record_generated_collision();
            tracing::warn!(code = %candidate, attempt, "Generated code already in use; retrying");
        }
        Err(StoreError::Exhausted { attempts })
    }

    fn entry(&self, code: String, target: String) -> AliasEntry {
        AliasEntry {
            short_url: short_url(&self.settings.base_url, &code),
            code,
            target,
        }
    }
}

#[async_trait]
impl AliasApi for AliasStore {
    async fn create(
        &self,
        target: String,
        requested_code: Option<String>,
    ) -> Result<AliasEntry, StoreError> {
        let target = sanitize_target(target)?;
        let requested = normalize_code(requested_code)?;

        let _writer = self.gate.write().await;
        let mut links = self.backend.load().await?;

        let code = match requested {
            Some(code) => {
                if links.contains_key(&code) {
                    self.metrics.record_conflict();
                    tracing::info!(code = %code, "Rejected create for existing code");
                    return Err(StoreError::Conflict(code));
                }
                code
            }
            None => self.generate_unused_code(&links)?,
        };

        links.insert(code.clone(), target.clone());
        self.backend.save(&links).await?;
        self.metrics.record_created();
        tracing::info!(code = %code, target = %target, "Link created");

        Ok(self.entry(code, target))
    }

    async fn get(&self, code: &str) -> Result<String, StoreError> {
        let _reader = self.gate.read().await;
        let mut links = self.backend.load().await?;
        links
            .remove(code)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn list(&self) -> Result<AliasMap, StoreError> {
        let _reader = self.gate.read().await;
        Ok(self.backend.load().await?)
    }

    async fn update(&self, code: &str, target: String) -> Result<AliasEntry, StoreError> {
        let target = sanitize_target(target)?;

        let _writer = self.gate.write().await;
        let mut links = self.backend.load().await?;
        match links.get_mut(code) {
            Some(existing) => *existing = target.clone(),
            None => return Err(StoreError::NotFound(code.to_string())),
        }
        self.backend.save(&links).await?;
        self.metrics.record_updated();
        tracing::info!(code, target = %target, "Link updated");

        Ok(self.entry(code.to_string(), target))
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let _writer = self.gate.write().await;
        let mut links = self.backend.load().await?;
        if links.remove(code).is_none() {
            return Err(StoreError::NotFound(code.to_string()));
        }
        self.backend.save(&links).await?;
        self.metrics.record_deleted();
        tracing::info!(code, "Link deleted");
        Ok(())
    }

    fn short_url(&self, code: &str) -> String {
        short_url(&self.settings.base_url, code)
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
