// ─── On-Disk Layout ───
// The one bit-exact contract with other tooling that reads the game root:
//   <root>/versions/<id>/<id>.json + <id>.jar
//   <root>/libraries/<mavenStylePath>
//   <root>/assets/indexes/<assetIndexId>.json
//   <root>/assets/objects/<hash[0:2]>/<hash>
//   <root>/mods/<jar>

use std::path::{Path, PathBuf};

/// Resolves every canonical path under a single game root directory.
/// Cheap to clone; components hold their own copy.
#[derive(Debug, Clone)]
pub struct GameDirs {
    root: PathBuf,
}

impl GameDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.versions_dir().join(version_id)
    }

    pub fn version_json(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{version_id}.json"))
    }

    pub fn version_jar(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{version_id}.jar"))
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    /// Canonical location of a library jar from its declared relative path.
    pub fn library_path(&self, relative: &str) -> PathBuf {
        self.libraries_dir().join(relative)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn asset_indexes_dir(&self) -> PathBuf {
        self.assets_dir().join("indexes")
    }

    pub fn asset_index_json(&self, index_id: &str) -> PathBuf {
        self.asset_indexes_dir().join(format!("{index_id}.json"))
    }

    pub fn asset_objects_dir(&self) -> PathBuf {
        self.assets_dir().join("objects")
    }

    /// Content-addressed object path: `objects/<hash[0:2]>/<hash>`.
    pub fn asset_object_path(&self, hash: &str) -> PathBuf {
        let prefix = hash.get(..2).unwrap_or(hash);
        self.asset_objects_dir().join(prefix).join(hash)
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.join("mods")
    }
}
