pub mod descriptor;
pub mod manifest;

pub use descriptor::{
    ArtifactRef, AssetIndexRef, LibraryRef, RawVersionJson, VersionDescriptor, SCHEMA_VERSION,
};
pub use manifest::{VersionEntry, VersionManifest};
