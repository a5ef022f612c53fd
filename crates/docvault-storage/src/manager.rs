//! Storage manager: builds the configured providers and hands out the default.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::StorageProvider;

use crate::providers::LocalStorageProvider;

/// Holds every configured content store, keyed by provider name.
#[derive(Debug, Clone)]
pub struct StorageManager {
    providers: BTreeMap<String, Arc<dyn StorageProvider>>,
    default_name: String,
}

impl StorageManager {
    /// Create a manager with a single provider registered as the default.
    pub fn with_default(name: impl Into<String>, provider: Arc<dyn StorageProvider>) -> Self {
        let name = name.into();
        let mut providers = BTreeMap::new();
        providers.insert(name.clone(), provider);
        Self {
            providers,
            default_name: name,
        }
    }

    /// Build providers from the `[storage]` configuration section.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        match config.default_provider.as_str() {
            "local" => {
                let root = if config.local.root_path.is_empty() {
                    PathBuf::from(&config.data_root).join("uploads")
                } else {
                    PathBuf::from(&config.local.root_path)
                };
                let provider = LocalStorageProvider::new(&root).await?;
                info!(root = %root.display(), "Local content store ready");
                Ok(Self::with_default("local", Arc::new(provider)))
            }
            other => Err(AppError::configuration(format!(
                "Unsupported storage provider: {other}"
            ))),
        }
    }

    /// Get a provider by name.
    pub fn get(&self, name: &str) -> AppResult<Arc<dyn StorageProvider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Storage provider {name} not found")))
    }

    /// The provider that receives new uploads and serves content.
    pub fn default_provider(&self) -> AppResult<Arc<dyn StorageProvider>> {
        self.get(&self.default_name)
    }

    /// Check health of all registered providers.
    pub async fn health_check_all(&self) -> BTreeMap<String, bool> {
        let mut results = BTreeMap::new();
        for (name, provider) in &self.providers {
            let healthy = provider.health_check().await.unwrap_or(false);
            results.insert(name.clone(), healthy);
        }
        results
    }
}
