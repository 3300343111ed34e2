use std::collections::HashSet;

use crate::core::paths::GameDirs;
use crate::core::version::VersionDescriptor;

/// Platform classpath separator: `;` on Windows, `:` elsewhere.
pub fn classpath_separator() -> char {
    if cfg!(windows) {
        ';'
    } else {
        ':'
    }
}

/// Assemble the JVM classpath: every library jar in descriptor order, then
/// the version's primary jar last. Duplicate paths are dropped, keeping the
/// first occurrence.
pub fn build_classpath(descriptor: &VersionDescriptor, dirs: &GameDirs) -> String {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(descriptor.libraries.len() + 1);

    for lib in &descriptor.libraries {
        let path = dirs.library_path(&lib.path).display().to_string();
        if seen.insert(path.clone()) {
            entries.push(path);
        }
    }

    let jar = dirs.version_jar(&descriptor.id).display().to_string();
    if seen.insert(jar.clone()) {
        entries.push(jar);
    }

    entries.join(&classpath_separator().to_string())
}
