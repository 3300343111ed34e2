// ─── Launcher Core ───
// Owns the long-lived pieces (HTTP client, fetcher, resolver, materializer)
// and exposes the install pipeline as a handful of high-level calls.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::collab::ModEntry;
use crate::core::error::{ConfigError, ResolveError};
use crate::core::fetch::Fetcher;
use crate::core::http::build_http_client;
use crate::core::launch::{build_launch_config, LaunchConfig, PlayerIdentity, RuntimeOptions};
use crate::core::materialize::{MaterializeReport, Materializer};
use crate::core::paths::GameDirs;
use crate::core::progress::ProgressSender;
use crate::core::resolver::{VersionRequest, VersionResolver};
use crate::core::version::VersionDescriptor;

/// Construction-time overrides, mainly for tests pointing at local servers.
#[derive(Debug, Clone, Default)]
pub struct LauncherOptions {
    pub manifest_url: Option<String>,
    pub resources_base: Option<String>,
    pub concurrency: Option<usize>,
}

/// A resolved version together with the outcome of materializing its
/// secondary artifacts.
#[derive(Debug, Clone)]
pub struct PreparedVersion {
    pub descriptor: VersionDescriptor,
    pub report: MaterializeReport,
}

impl PreparedVersion {
    /// Whether every declared artifact made it to disk.
    pub fn is_complete(&self) -> bool {
        self.report.is_complete()
    }
}

pub struct LauncherCore {
    dirs: GameDirs,
    resolver: VersionResolver,
    materializer: Materializer,
}

impl LauncherCore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, LauncherOptions::default(), ProgressSender::disabled())
    }

    pub fn with_options(
        root: impl Into<PathBuf>,
        options: LauncherOptions,
        progress: ProgressSender,
    ) -> Self {
        let dirs = GameDirs::new(root);
        // Same failure mode as `reqwest::Client::new`: only a broken TLS
        // backend can make the builder fail.
        let client = build_http_client().expect("failed to build HTTP client");
        let fetcher = Arc::new(Fetcher::new());

        let mut resolver = VersionResolver::new(dirs.clone(), fetcher.clone(), client.clone())
            .with_progress(progress.clone());
        if let Some(url) = options.manifest_url {
            resolver = resolver.with_manifest_url(url);
        }

        let mut materializer =
            Materializer::new(dirs.clone(), fetcher, client).with_progress(progress);
        if let Some(base) = options.resources_base {
            materializer = materializer.with_resources_base(base);
        }
        if let Some(n) = options.concurrency {
            materializer = materializer.with_concurrency(n);
        }

        Self {
            dirs,
            resolver,
            materializer,
        }
    }

    pub fn dirs(&self) -> &GameDirs {
        &self.dirs
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Resolve a version and materialize everything it declares. Resolution
    /// failures abort; materialization failures are reported per item.
    pub async fn prepare(
        &self,
        request: &VersionRequest,
        cancel: &CancellationToken,
    ) -> Result<PreparedVersion, ResolveError> {
        let descriptor = self.resolver.resolve(request, cancel).await?;
        let report = self.materializer.materialize(&descriptor, cancel).await;
        info!(
            version = %descriptor.id,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "version prepared"
        );
        Ok(PreparedVersion { descriptor, report })
    }

    pub async fn install_mods(
        &self,
        mods: &[ModEntry],
        cancel: &CancellationToken,
    ) -> MaterializeReport {
        self.materializer.install_mods(mods, cancel).await
    }

    pub fn launch_config(
        &self,
        prepared: &PreparedVersion,
        identity: &PlayerIdentity,
        options: &RuntimeOptions,
    ) -> Result<LaunchConfig, ConfigError> {
        build_launch_config(&prepared.descriptor, identity, options, &self.dirs)
    }
}
