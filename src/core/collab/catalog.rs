use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the mod catalog. `mandatory` marks mods the installation is
/// expected to carry; `enabled` gates whether it is installed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModEntry {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub version: String,
    pub enabled: bool,
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog backend unavailable: {0}")]
    Unavailable(String),
    #[error("mod {0} not found in catalog")]
    NotFound(i64),
    #[error("catalog query failed: {0}")]
    Query(String),
}

/// Backing store for the mod catalog. The launcher core only reads and
/// toggles entries; where the rows live (remote database, bundled file) is an
/// implementation concern.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_mods(&self) -> Result<Vec<ModEntry>, CatalogError>;

    async fn get_mod(&self, id: i64) -> Result<ModEntry, CatalogError>;

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<(), CatalogError>;
}
