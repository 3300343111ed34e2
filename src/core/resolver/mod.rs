// ─── Version Resolver / Repair Engine ───
// Reconciles the local version directory against the remote source of truth
// and produces a runnable, internally-consistent descriptor.
//
// State machine per requested id:
//   CheckLocal → FetchRemoteMeta | Synthesize → MaterializePrimaryArtifact
//   → Persist → Valid | Failed
//
// Failed outcomes are never cached; a later request retries from CheckLocal.
// Repair only ever touches the files the resolver owns: `<id>.json` and
// `<id>.jar`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::error::{FetchError, ResolveError};
use crate::core::fetch::{artifact_valid, FetchOptions, Fetcher};
use crate::core::loader::LoaderRelease;
use crate::core::paths::GameDirs;
use crate::core::progress::{Phase, ProgressSender};
use crate::core::version::manifest::DEFAULT_MANIFEST_URL;
use crate::core::version::{RawVersionJson, VersionDescriptor, VersionManifest};

/// What the caller wants resolved.
#[derive(Debug, Clone)]
pub enum VersionRequest {
    /// An unmodified game release, looked up in the remote manifest.
    Base { id: String },
    /// A mod-loader variant synthesized on top of a base release.
    LoaderVariant {
        base_id: String,
        loader: LoaderRelease,
    },
}

impl VersionRequest {
    pub fn base(id: impl Into<String>) -> Self {
        VersionRequest::Base { id: id.into() }
    }

    pub fn loader_variant(base_id: impl Into<String>, loader: LoaderRelease) -> Self {
        VersionRequest::LoaderVariant {
            base_id: base_id.into(),
            loader,
        }
    }

    pub fn version_id(&self) -> String {
        match self {
            VersionRequest::Base { id } => id.clone(),
            VersionRequest::LoaderVariant { base_id, loader } => loader.profile_id(base_id),
        }
    }
}

type ResolveOutcome = Result<VersionDescriptor, ResolveError>;

pub struct VersionResolver {
    dirs: GameDirs,
    fetcher: Arc<Fetcher>,
    client: reqwest::Client,
    manifest_url: String,
    progress: ProgressSender,
    /// Single-flight state: version id → pending outcome. Entries are created
    /// on first request for an id and removed on completion, success, failure
    /// or cancellation alike. Keyed per id — no cross-id blocking.
    in_flight: Mutex<HashMap<String, watch::Receiver<Option<ResolveOutcome>>>>,
}

impl VersionResolver {
    pub fn new(dirs: GameDirs, fetcher: Arc<Fetcher>, client: reqwest::Client) -> Self {
        Self {
            dirs,
            fetcher,
            client,
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            progress: ProgressSender::disabled(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = progress;
        self
    }

    /// Resolve a version, deduplicating concurrent requests for the same id:
    /// the first caller runs the pipeline, everyone else shares its eventual
    /// outcome.
    pub async fn resolve(
        &self,
        request: &VersionRequest,
        cancel: &CancellationToken,
    ) -> ResolveOutcome {
        enum Role {
            Leader(watch::Sender<Option<ResolveOutcome>>),
            Follower(watch::Receiver<Option<ResolveOutcome>>),
        }

        let id = request.version_id();
        loop {
            let role = {
                let mut map = self.in_flight.lock().await;
                match map.get(&id) {
                    Some(rx) => Role::Follower(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        map.insert(id.clone(), rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let outcome = self.resolve_inner(request, cancel).await;
                    // Clear the entry before publishing so a request arriving
                    // after completion starts fresh instead of reading a
                    // finished channel.
                    self.in_flight.lock().await.remove(&id);
                    let _ = tx.send(Some(outcome.clone()));
                    return outcome;
                }
                Role::Follower(mut rx) => {
                    debug!(id, "joining in-flight resolution");
                    loop {
                        if let Some(outcome) = rx.borrow_and_update().clone() {
                            return outcome;
                        }
                        if rx.changed().await.is_err() {
                            // Leader vanished without publishing; contend for
                            // leadership on the next pass.
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn resolve_inner(
        &self,
        request: &VersionRequest,
        cancel: &CancellationToken,
    ) -> ResolveOutcome {
        let id = request.version_id();

        // CheckLocal: a parsed, current-schema descriptor counts only if its
        // companion jar also passes the artifact-validity check.
        if let Some(descriptor) = self.check_local(&id).await {
            if self.primary_artifact_valid(&descriptor).await {
                debug!(id, "version already resolved locally");
                return Ok(descriptor);
            }
            warn!(id, "descriptor present but primary artifact invalid, repairing");
        }

        self.ensure_live(&id, cancel)?;

        let descriptor = match request {
            VersionRequest::Base { id } => self.fetch_remote_descriptor(id).await?,
            VersionRequest::LoaderVariant { base_id, loader } => {
                self.synthesize_variant(base_id, loader, cancel).await?
            }
        };

        self.ensure_live(&id, cancel)?;
        self.materialize_primary(&descriptor, request, cancel)
            .await?;

        descriptor
            .persist_atomic(&self.dirs.version_json(&descriptor.id))
            .await
            .map_err(|e| ResolveError::repair(&descriptor.id, e))?;

        info!(id, "version resolved");
        Ok(descriptor)
    }

    fn ensure_live(&self, id: &str, cancel: &CancellationToken) -> Result<(), ResolveError> {
        if cancel.is_cancelled() {
            Err(ResolveError::Cancelled(id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Parse `<id>.json` if it exists and carries the current schema.
    /// Anything stale, unparseable or mismatched is rebuilt, never trusted.
    async fn check_local(&self, id: &str) -> Option<VersionDescriptor> {
        let path = self.dirs.version_json(id);
        let raw = tokio::fs::read_to_string(&path).await.ok()?;
        let descriptor: VersionDescriptor = match serde_json::from_str(&raw) {
            Ok(d) => d,
            Err(err) => {
                warn!(id, %err, "unparseable local descriptor, rebuilding");
                return None;
            }
        };
        if descriptor.id != id {
            warn!(id, found = %descriptor.id, "descriptor id mismatch, rebuilding");
            return None;
        }
        if !descriptor.is_current_schema() {
            debug!(
                id,
                schema = descriptor.schema_version,
                "stale schemaVersion, rebuilding"
            );
            return None;
        }
        Some(descriptor)
    }

    async fn primary_artifact_valid(&self, descriptor: &VersionDescriptor) -> bool {
        let jar = self.dirs.version_jar(&descriptor.id);
        let (sha1, size) = descriptor
            .client_download
            .as_ref()
            .map(|c| (c.sha1.as_deref(), c.size))
            .unwrap_or((None, None));
        artifact_valid(&jar, sha1, size).await
    }

    /// FetchRemoteMeta: manifest lookup, then the descriptor document,
    /// normalized at the parse boundary.
    async fn fetch_remote_descriptor(&self, id: &str) -> ResolveOutcome {
        self.progress.emit(Phase::VersionMeta, 0, Some(1));

        let manifest = VersionManifest::fetch(&self.client, &self.manifest_url).await?;
        let entry = manifest
            .find_version(id)
            .ok_or_else(|| ResolveError::VersionNotFound(id.to_string()))?;

        let response = self
            .client
            .get(&entry.url)
            .send()
            .await
            .map_err(|e| FetchError::transport(&entry.url, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: entry.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }
        let raw = response
            .text()
            .await
            .map_err(|e| FetchError::transport(&entry.url, &e))?;

        let descriptor = RawVersionJson::parse(&raw, id)?.into_descriptor(id);
        if descriptor.client_download.is_none() {
            return Err(ResolveError::metadata(id, "missing downloads.client"));
        }

        self.progress.emit(Phase::VersionMeta, 1, Some(1));
        Ok(descriptor)
    }

    /// Synthesize: resolve the base first (sharing its own single-flight
    /// entry), then layer the loader release on top of it.
    async fn synthesize_variant(
        &self,
        base_id: &str,
        loader: &LoaderRelease,
        cancel: &CancellationToken,
    ) -> ResolveOutcome {
        let base_request = VersionRequest::base(base_id);
        let base = Box::pin(self.resolve(&base_request, cancel)).await?;
        Ok(loader.synthesize(&base))
    }

    /// MaterializePrimaryArtifact: make sure `<id>.jar` exists and is valid.
    ///
    /// Base versions fetch it from `clientDownload` with hash verification.
    /// Loader variants are seeded by copying the base jar unless the release
    /// ships a directly downloadable primary artifact.
    async fn materialize_primary(
        &self,
        descriptor: &VersionDescriptor,
        request: &VersionRequest,
        cancel: &CancellationToken,
    ) -> Result<(), ResolveError> {
        if self.primary_artifact_valid(descriptor).await {
            return Ok(());
        }

        let jar = self.dirs.version_jar(&descriptor.id);

        match request {
            VersionRequest::Base { id } => {
                let client_dl = descriptor
                    .client_download
                    .as_ref()
                    .ok_or_else(|| ResolveError::metadata(id, "missing downloads.client"))?;

                let progress = self.progress.clone();
                let opts = FetchOptions {
                    expected_sha1: client_dl.sha1.clone(),
                    progress: Some(Arc::new(move |p| {
                        progress.emit(Phase::ClientJar, p.downloaded, p.total)
                    })),
                    cancel: cancel.clone(),
                };
                self.fetcher.fetch_with(&client_dl.url, &jar, &opts).await?;
            }
            VersionRequest::LoaderVariant { base_id, loader } => {
                if let Some(url) = &loader.client_url {
                    let opts = FetchOptions {
                        cancel: cancel.clone(),
                        ..FetchOptions::default()
                    };
                    self.fetcher.fetch_with(url, &jar, &opts).await?;
                } else {
                    let base_jar = self.dirs.version_jar(base_id);
                    if let Some(parent) = jar.parent() {
                        tokio::fs::create_dir_all(parent)
                            .await
                            .map_err(|e| ResolveError::repair(&descriptor.id, e))?;
                    }
                    tokio::fs::copy(&base_jar, &jar).await.map_err(|e| {
                        ResolveError::repair(
                            &descriptor.id,
                            format!("seeding jar from {base_id}: {e}"),
                        )
                    })?;
                    debug!(id = %descriptor.id, from = %base_id, "seeded variant jar from base client");
                }
            }
        }

        Ok(())
    }
}
