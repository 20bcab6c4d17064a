use crate::config::{StateBackend, StateConfig};
use crate::error::{AppError, Result};
use crate::state::{HistoryStore, InMemoryStore, SledStore};
use std::sync::Arc;

/// Create a history store based on configuration
pub fn create_store(config: &StateConfig) -> Result<Arc<dyn HistoryStore>> {
    match config.backend {
        StateBackend::Sled => {
            let path = config.path.as_ref().ok_or_else(|| {
                AppError::Configuration("Sled backend requires 'path' configuration".to_string())
            })?;

            tracing::info!(path = ?path, "Initializing Sled history backend");

            let store = SledStore::new(path)?;
            Ok(Arc::new(store))
        }

        StateBackend::Memory => {
            tracing::warn!("In-memory history backend selected; history is lost on restart");
            Ok(create_in_memory_store())
        }
    }
}

/// Create an in-memory store (for testing and development)
pub fn create_in_memory_store() -> Arc<dyn HistoryStore> {
    tracing::info!("Initializing in-memory history backend");
    Arc::new(InMemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_sled_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = StateConfig {
            backend: StateBackend::Sled,
            path: Some(temp_dir.path().to_path_buf()),
        };

        let store = create_store(&config).unwrap();
        assert_eq!(store.count_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_in_memory_store() {
        let config = StateConfig {
            backend: StateBackend::Memory,
            path: None,
        };

        let store = create_store(&config).unwrap();
        assert_eq!(store.count_entries().await.unwrap(), 0);
    }

    #[test]
    fn test_sled_requires_path() {
        let config = StateConfig {
            backend: StateBackend::Sled,
            path: None,
        };

        assert!(matches!(
            create_store(&config),
            Err(AppError::Configuration(_))
        ));
    }
}
