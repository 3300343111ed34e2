// ─── Artifact Validity ───

use std::path::Path;

use sha1::{Digest, Sha1};

/// SHA-1 of a file's full contents, hex-encoded.
pub async fn file_sha1(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    let mut hasher = Sha1::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// A materialized artifact is valid iff it exists and, when a hash was
/// declared, its content hash matches (case-insensitive). A size check is the
/// weaker fallback when no hash is available; with neither declared, any
/// non-empty file is accepted. Zero-byte files are always invalid.
pub async fn artifact_valid(
    path: &Path,
    expected_sha1: Option<&str>,
    expected_size: Option<u64>,
) -> bool {
    let Ok(meta) = tokio::fs::metadata(path).await else {
        return false;
    };
    if !meta.is_file() || meta.len() == 0 {
        return false;
    }

    if let Some(expected) = expected_sha1 {
        return match file_sha1(path).await {
            Ok(actual) => actual.eq_ignore_ascii_case(expected),
            Err(_) => false,
        };
    }

    if let Some(size) = expected_size {
        return meta.len() == size;
    }

    true
}
