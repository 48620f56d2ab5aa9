use super::PollCatalog;
use crate::error::ConfigError;
use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;

/// Where poll definitions come from. Called once per request; sources
/// are small, so implementations need not cache.
#[async_trait]
pub trait PollSource: Send + Sync {
    async fn load(&self) -> Result<PollCatalog, ConfigError>;
}

/// Reads a YAML catalog from disk on every load.
pub struct YamlFileSource {
    path: PathBuf,
}

impl YamlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PollSource for YamlFileSource {
    async fn load(&self) -> Result<PollCatalog, ConfigError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let catalog = PollCatalog::from_yaml(&contents)?;
        if catalog.is_empty() {
            warn!("Poll file {} defines no polls", self.path.display());
        }
        debug!("Loaded {} poll(s) from {}", catalog.len(), self.path.display());
        Ok(catalog)
    }
}

/// Catalog held in memory as YAML text.
pub struct StaticSource {
    contents: String,
}

impl StaticSource {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }
}

#[async_trait]
impl PollSource for StaticSource {
    async fn load(&self) -> Result<PollCatalog, ConfigError> {
        PollCatalog::from_yaml(&self.contents)
    }
}
