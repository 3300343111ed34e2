// ─── Asset Objects ───
// Assets are content-addressed: the index maps logical names to sha1 hashes,
// and each object lives at `objects/<hash[0..2]>/<hash>` under the assets
// root, mirroring the remote layout.

use std::collections::HashMap;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::error::{FetchError, MaterializeItemError};
use crate::core::progress::Phase;
use crate::core::version::VersionDescriptor;

use super::{MaterializeReport, Materializer};

pub(super) const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Emit a progress event every this many completed objects. Asset batches run
/// into the thousands; per-object events would swamp the channel.
const PROGRESS_STRIDE: u64 = 50;

#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl Materializer {
    /// Fetch the asset index the descriptor points at, persist it under
    /// `assets/indexes/`, then materialize every object it names. A descriptor
    /// without an asset index (bare loader overlays) is a no-op.
    pub async fn materialize_assets(
        &self,
        descriptor: &VersionDescriptor,
        cancel: &CancellationToken,
    ) -> MaterializeReport {
        let mut report = MaterializeReport::default();
        let Some(index_ref) = &descriptor.asset_index else {
            debug!(version = %descriptor.id, "no asset index declared, skipping assets");
            return report;
        };

        let index = match self.fetch_asset_index(&index_ref.id, &index_ref.url).await {
            Ok(index) => index,
            Err(cause) => {
                warn!(index = %index_ref.id, %cause, "asset index unavailable");
                report.failed.push(MaterializeItemError {
                    id: format!("asset-index:{}", index_ref.id),
                    cause,
                });
                return report;
            }
        };

        // Multiple logical names can share one hash; fetch each object once.
        let mut by_hash: HashMap<&str, &AssetObject> = HashMap::new();
        for object in index.objects.values() {
            by_hash.entry(object.hash.as_str()).or_insert(object);
        }

        let total = by_hash.len() as u64;
        info!(
            index = %index_ref.id,
            names = index.objects.len(),
            objects = total,
            "materializing assets"
        );

        let mut completed: u64 = 0;
        for (hash, object) in by_hash {
            if cancel.is_cancelled() {
                report.failed.push(MaterializeItemError {
                    id: format!("asset:{hash}"),
                    cause: FetchError::Cancelled {
                        url: self.asset_url(hash),
                    },
                });
                break;
            }
            let result = self.ensure_asset(hash, object, cancel).await;
            report.record(format!("asset:{hash}"), result);

            completed += 1;
            if completed % PROGRESS_STRIDE == 0 || completed == total {
                self.progress.emit(Phase::Assets, completed, Some(total));
            }
        }

        report.normalize();
        report
    }

    async fn fetch_asset_index(&self, id: &str, url: &str) -> Result<AssetIndex, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        // Parse before persisting so a malformed document never lands on disk.
        let index: AssetIndex = serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

        let dest = self.dirs.asset_index_json(id);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io(&dest, &e))?;
        }
        tokio::fs::write(&dest, &body)
            .await
            .map_err(|e| FetchError::io(&dest, &e))?;

        Ok(index)
    }

    /// Objects are immutable once written: an existing file at the
    /// content-addressed path is trusted without rehashing.
    async fn ensure_asset(
        &self,
        hash: &str,
        object: &AssetObject,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        let dest = self.dirs.asset_object_path(hash);
        match tokio::fs::metadata(&dest).await {
            Ok(meta) if meta.len() == object.size => return Ok(()),
            _ => {}
        }
        let url = self.asset_url(hash);
        self.ensure_plain(&url, &dest, Some(hash), cancel).await
    }

    fn asset_url(&self, hash: &str) -> String {
        let prefix = hash.get(..2).unwrap_or(hash);
        format!("{}/{}/{}", self.resources_base, prefix, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_index_deserializes_objects_map() {
        let json = r#"{
            "objects": {
                "minecraft/sounds/ambient/cave/cave1.ogg": {
                    "hash": "d529ebfdc1679b91f2b87e429096f547ba392032",
                    "size": 62119
                }
            }
        }"#;
        let index: AssetIndex = serde_json::from_str(json).unwrap();
        let object = &index.objects["minecraft/sounds/ambient/cave/cave1.ogg"];
        assert_eq!(object.hash, "d529ebfdc1679b91f2b87e429096f547ba392032");
        assert_eq!(object.size, 62119);
    }
}
