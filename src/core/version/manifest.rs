// ─── Remote Version Manifest ───
// The remote source of truth mapping version id → descriptor URL.

use serde::Deserialize;
use tracing::info;

use crate::core::error::{FetchError, ResolveError};

pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Top-level version manifest document.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single manifest entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default, rename = "type")]
    pub release_type: Option<String>,
}

impl VersionManifest {
    /// Fetch and parse the manifest using the shared HTTP client.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Self, ResolveError> {
        info!(url, "fetching version manifest");

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let manifest: VersionManifest = response
            .json()
            .await
            .map_err(|e| ResolveError::metadata("manifest", e))?;

        info!(count = manifest.versions.len(), "loaded version manifest");
        Ok(manifest)
    }

    /// Look up an entry by id. Absence is terminal for a Base resolve.
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest_entry() {
        let json = r#"{
            "id": "1.12.2",
            "type": "release",
            "url": "https://example.com/1.12.2.json",
            "sha1": "abc123"
        }"#;
        let entry: VersionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1.12.2");
        assert_eq!(entry.release_type.as_deref(), Some("release"));
    }

    #[test]
    fn find_version_matches_exact_id() {
        let manifest: VersionManifest = serde_json::from_str(
            r#"{"versions": [
                {"id": "1.12.2", "url": "https://example.com/a.json"},
                {"id": "1.12", "url": "https://example.com/b.json"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(manifest.find_version("1.12").unwrap().id, "1.12");
        assert!(manifest.find_version("1.13").is_none());
    }
}
