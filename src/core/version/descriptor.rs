// ─── Version Descriptor ───
// Normalized manifest for one installable version (base game or loader
// variant). Remote documents are validated at the parse boundary and
// converted into this shape; nothing downstream touches loose JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::ResolveError;

/// Schema tag stamped by the current merge logic. A persisted descriptor with
/// a stale or absent tag is treated as invalid and rebuilt, never trusted.
pub const SCHEMA_VERSION: u32 = 2;

/// A downloadable artifact. A missing `sha1` means "unverified, accept on
/// successful transfer"; `size` is a weaker sanity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// One declared library jar. `path` is relative to the libraries root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRef {
    /// Maven-style coordinate, e.g. `com.google.guava:guava:21.0`.
    pub name: String,
    pub path: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl LibraryRef {
    /// Collision key for merging: the coordinate without its version segment,
    /// so `guava:20.0` and `guava:21.0` collide and the child entry wins.
    pub fn collision_key(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map(|(key, _)| key)
            .unwrap_or(&self.name)
    }
}

/// Reference to an asset index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexRef {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    pub main_class: String,
    /// Ordered argument tokens; placeholders like `${auth_player_name}` are
    /// expanded at launch time.
    #[serde(default)]
    pub argument_template: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<AssetIndexRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_download: Option<ArtifactRef>,
    #[serde(default)]
    pub schema_version: u32,
}

impl VersionDescriptor {
    pub fn is_current_schema(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }

    /// Merge this descriptor (the child) onto its parent.
    ///
    /// The effective library set is the union of both, the child winning on
    /// collision-key clashes; parent order is preserved and new child entries
    /// are appended. Scalar fields the child does not set fall back to the
    /// parent. The result is flattened — it records `inheritsFrom` but no
    /// longer needs the parent at use sites.
    pub fn merged_onto(&self, parent: &VersionDescriptor) -> VersionDescriptor {
        let mut libraries: Vec<LibraryRef> = parent
            .libraries
            .iter()
            .map(|lib| {
                self.libraries
                    .iter()
                    .find(|child| child.collision_key() == lib.collision_key())
                    .unwrap_or(lib)
                    .clone()
            })
            .collect();
        for child in &self.libraries {
            let new_key = child.collision_key();
            if !parent
                .libraries
                .iter()
                .any(|lib| lib.collision_key() == new_key)
            {
                libraries.push(child.clone());
            }
        }

        VersionDescriptor {
            id: self.id.clone(),
            inherits_from: Some(parent.id.clone()),
            main_class: if self.main_class.is_empty() {
                parent.main_class.clone()
            } else {
                self.main_class.clone()
            },
            argument_template: if self.argument_template.is_empty() {
                parent.argument_template.clone()
            } else {
                self.argument_template.clone()
            },
            libraries,
            asset_index: self
                .asset_index
                .clone()
                .or_else(|| parent.asset_index.clone()),
            client_download: self
                .client_download
                .clone()
                .or_else(|| parent.client_download.clone()),
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Write the descriptor JSON atomically: serialize to a temp path in the
    /// same directory, then move into place, so a concurrent resolver never
    /// sees a half-written document.
    pub async fn persist_atomic(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

// ─── Parse Boundary ───
// Shape of a remote descriptor document. Tolerant of both the modern
// `arguments.game` token list and the legacy `minecraftArguments` string;
// everything else is normalized away here.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVersionJson {
    #[serde(default)]
    pub id: Option<String>,
    pub main_class: String,
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub arguments: Option<RawArguments>,
    #[serde(default)]
    pub downloads: Option<RawDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexRef>,
    #[serde(default)]
    pub libraries: Vec<RawLibrary>,
}

#[derive(Debug, Deserialize)]
pub struct RawArguments {
    #[serde(default)]
    pub game: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawDownloads {
    #[serde(default)]
    pub client: Option<ArtifactRef>,
}

#[derive(Debug, Deserialize)]
pub struct RawLibrary {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<RawLibraryDownloads>,
}

#[derive(Debug, Deserialize)]
pub struct RawLibraryDownloads {
    #[serde(default)]
    pub artifact: Option<RawLibraryArtifact>,
}

#[derive(Debug, Deserialize)]
pub struct RawLibraryArtifact {
    pub path: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl RawVersionJson {
    pub fn parse(raw: &str, version_id: &str) -> Result<Self, ResolveError> {
        serde_json::from_str(raw).map_err(|e| ResolveError::metadata(version_id, e))
    }

    /// Normalize into a [`VersionDescriptor`], stamped with the current
    /// schema. Libraries without a downloadable artifact (e.g. natives-only
    /// entries) are dropped at this boundary.
    pub fn into_descriptor(self, version_id: &str) -> VersionDescriptor {
        let argument_template = match &self.arguments {
            Some(args) => args
                .game
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            None => self
                .minecraft_arguments
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        };

        let libraries = self
            .libraries
            .into_iter()
            .filter_map(|lib| {
                let artifact = lib.downloads?.artifact?;
                Some(LibraryRef {
                    name: lib.name,
                    path: artifact.path,
                    url: artifact.url,
                    sha1: artifact.sha1,
                    size: artifact.size,
                })
            })
            .collect();

        VersionDescriptor {
            id: self.id.unwrap_or_else(|| version_id.to_string()),
            inherits_from: None,
            main_class: self.main_class,
            argument_template,
            libraries,
            asset_index: self.asset_index,
            client_download: self.downloads.and_then(|d| d.client),
            schema_version: SCHEMA_VERSION,
        }
    }
}
