//! Installation and launch pipeline for the CubicLauncher desktop client.
//!
//! The crate turns a requested game version — base release or mod-loader
//! variant — into a verified on-disk installation and a ready-to-spawn
//! launch configuration. Entry point: [`LauncherCore`].

pub mod core;

pub use crate::core::collab::{
    AuthTokens, CatalogStore, CommandRunner, IdentityProvider, ModEntry, PlayerProfile,
    ProcessEvent, ProcessRunner,
};
pub use crate::core::error::{
    ConfigError, FetchError, LauncherError, LauncherResult, MaterializeItemError, ResolveError,
};
pub use crate::core::launch::{LaunchConfig, PlayerIdentity, RuntimeOptions};
pub use crate::core::loader::LoaderRelease;
pub use crate::core::materialize::{MaterializeReport, Materializer};
pub use crate::core::paths::GameDirs;
pub use crate::core::progress::{Phase, ProgressEvent, ProgressSender};
pub use crate::core::resolver::{VersionRequest, VersionResolver};
pub use crate::core::state::{LauncherCore, LauncherOptions, PreparedVersion};
pub use crate::core::version::{
    ArtifactRef, AssetIndexRef, LibraryRef, VersionDescriptor, VersionManifest,
};

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for binaries embedding the core. Reads
/// `RUST_LOG`, defaulting to info with debug detail for this crate.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cubic_launcher_core=debug")),
        )
        .init();
}
