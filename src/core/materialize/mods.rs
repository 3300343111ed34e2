// ─── Mod Installer ───
// Catalog-driven downloads into the shared mods directory. A mod that fails
// to download is reported and skipped; the install keeps going.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::collab::ModEntry;
use crate::core::error::{FetchError, MaterializeItemError};
use crate::core::progress::Phase;

use super::{MaterializeReport, Materializer};

impl Materializer {
    /// Install every enabled catalog entry. Disabled entries are skipped
    /// without touching existing files on disk.
    pub async fn install_mods(
        &self,
        mods: &[ModEntry],
        cancel: &CancellationToken,
    ) -> MaterializeReport {
        let mut report = MaterializeReport::default();
        let wanted: Vec<&ModEntry> = mods.iter().filter(|m| m.enabled).collect();
        let total = wanted.len() as u64;
        info!(enabled = wanted.len(), catalog = mods.len(), "installing mods");

        for (done, entry) in wanted.into_iter().enumerate() {
            if cancel.is_cancelled() {
                report.failed.push(MaterializeItemError {
                    id: entry.name.clone(),
                    cause: FetchError::Cancelled {
                        url: entry.url.clone(),
                    },
                });
                break;
            }

            let dest = self.dirs.mods_dir().join(mod_file_name(entry));
            let result = self.ensure_plain(&entry.url, &dest, None, cancel).await;
            match &result {
                Ok(()) => debug!(name = %entry.name, path = %dest.display(), "mod present"),
                Err(cause) => {
                    warn!(name = %entry.name, %cause, mandatory = entry.mandatory, "mod download failed")
                }
            }
            report.record(entry.name.clone(), result);
            self.progress
                .emit(Phase::Mods, done as u64 + 1, Some(total));
        }

        report.normalize();
        report
    }
}

/// File name for a catalog entry: the last path segment of its URL, falling
/// back to a name derived from the entry itself.
fn mod_file_name(entry: &ModEntry) -> String {
    entry
        .url
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains('?'))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-{}.jar", entry.name.replace(' ', "-"), entry.version))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> ModEntry {
        ModEntry {
            id: 1,
            name: "Example Mod".into(),
            url: url.into(),
            version: "1.0.0".into(),
            enabled: true,
            mandatory: false,
            description: None,
        }
    }

    #[test]
    fn file_name_comes_from_url_path() {
        let e = entry("https://mods.example/files/examplemod-1.0.0.jar");
        assert_eq!(mod_file_name(&e), "examplemod-1.0.0.jar");
    }

    #[test]
    fn file_name_falls_back_to_entry_metadata() {
        let e = entry("https://mods.example/download?id=42");
        assert_eq!(mod_file_name(&e), "Example-Mod-1.0.0.jar");
    }
}
