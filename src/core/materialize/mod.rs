// ─── Library & Asset Materializer ───
// Ensures every artifact a resolved descriptor declares exists on disk at its
// canonical path. Per-item failures never abort the batch: the caller decides
// whether a missing library is acceptable.

mod assets;
mod mods;

pub use assets::{AssetIndex, AssetObject};

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::error::{FetchError, MaterializeItemError};
use crate::core::fetch::{artifact_valid, FetchOptions, Fetcher};
use crate::core::paths::GameDirs;
use crate::core::progress::{Phase, ProgressSender};
use crate::core::version::{LibraryRef, VersionDescriptor};

const DEFAULT_CONCURRENCY: usize = 8;

/// Outcome of one batch. Deterministic for a fixed input set: both lists are
/// sorted by id regardless of completion order.
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<MaterializeItemError>,
}

impl MaterializeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merge(&mut self, other: MaterializeReport) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
        self.normalize();
    }

    fn record(&mut self, id: String, result: Result<(), FetchError>) {
        match result {
            Ok(()) => self.succeeded.push(id),
            Err(cause) => self.failed.push(MaterializeItemError { id, cause }),
        }
    }

    fn normalize(&mut self) {
        self.succeeded.sort();
        self.failed.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

pub struct Materializer {
    dirs: GameDirs,
    fetcher: Arc<Fetcher>,
    client: reqwest::Client,
    concurrency: usize,
    resources_base: String,
    progress: ProgressSender,
}

impl Materializer {
    pub fn new(dirs: GameDirs, fetcher: Arc<Fetcher>, client: reqwest::Client) -> Self {
        Self {
            dirs,
            fetcher,
            client,
            concurrency: DEFAULT_CONCURRENCY,
            resources_base: assets::RESOURCES_URL.to_string(),
            progress: ProgressSender::disabled(),
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_resources_base(mut self, base: impl Into<String>) -> Self {
        self.resources_base = base.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = progress;
        self
    }

    /// Materialize everything the descriptor declares: the effective library
    /// set, then the asset objects. Always completes and reports the
    /// partial-success shape.
    pub async fn materialize(
        &self,
        descriptor: &VersionDescriptor,
        cancel: &CancellationToken,
    ) -> MaterializeReport {
        let mut report = self.materialize_libraries(descriptor, cancel).await;
        report.merge(self.materialize_assets(descriptor, cancel).await);
        report
    }

    pub async fn materialize_libraries(
        &self,
        descriptor: &VersionDescriptor,
        cancel: &CancellationToken,
    ) -> MaterializeReport {
        let entries = descriptor.libraries.clone();
        let total = entries.len() as u64;
        info!(
            version = %descriptor.id,
            count = entries.len(),
            concurrency = self.concurrency,
            "materializing libraries"
        );

        let completed = AtomicU64::new(0);
        let completed = &completed;

        let results: Vec<(String, Result<(), FetchError>)> = stream::iter(entries)
            .map(|lib| async move {
                let result = self.ensure_library(&lib, cancel).await;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress.emit(Phase::Libraries, done, Some(total));
                (lib.name, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = MaterializeReport::default();
        for (name, result) in results {
            if let Err(cause) = &result {
                warn!(library = %name, %cause, "library materialization failed");
            }
            report.record(name, result);
        }
        report.normalize();
        report
    }

    async fn ensure_library(
        &self,
        lib: &LibraryRef,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        let dest = self.dirs.library_path(&lib.path);
        if artifact_valid(&dest, lib.sha1.as_deref(), lib.size).await {
            return Ok(());
        }
        let mut opts = match lib.sha1.as_deref() {
            Some(sha1) => FetchOptions::verified(sha1),
            None => FetchOptions::default(),
        };
        opts.cancel = cancel.clone();
        self.fetcher.fetch_with(&lib.url, &dest, &opts).await
    }

    /// Fetch a single file with no expected hash, skipping valid existing
    /// files. Shared by the asset and mod paths.
    async fn ensure_plain(
        &self,
        url: &str,
        dest: &Path,
        expected_sha1: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        let opts = FetchOptions {
            expected_sha1: expected_sha1.map(str::to_string),
            progress: None,
            cancel: cancel.clone(),
        };
        self.fetcher.fetch_with(url, dest, &opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_merge_keeps_deterministic_order() {
        let mut a = MaterializeReport {
            succeeded: vec!["g:b:1".into()],
            failed: vec![],
        };
        let b = MaterializeReport {
            succeeded: vec!["g:a:1".into(), "g:c:1".into()],
            failed: vec![],
        };
        a.merge(b);
        assert_eq!(a.succeeded, vec!["g:a:1", "g:b:1", "g:c:1"]);
        assert!(a.is_complete());
    }
}
