// ─── Loader Releases ───
// A mod-loader release is a versioned constant: its own library jar plus a
// fixed set of auxiliary dependencies, known ahead of time rather than
// discovered at runtime.

use crate::core::version::{LibraryRef, VersionDescriptor, SCHEMA_VERSION};

/// Everything needed to synthesize a loader-variant descriptor on top of a
/// base version.
#[derive(Debug, Clone)]
pub struct LoaderRelease {
    /// Short loader name used in the variant id, e.g. `forge`.
    pub loader_id: String,
    pub version: String,
    /// Entry point the variant uses instead of the base main class.
    pub main_class: String,
    /// The loader's own artifact, declared like any other library.
    pub library: LibraryRef,
    /// Fixed auxiliary dependencies of this release.
    pub auxiliary: Vec<LibraryRef>,
    /// Argument tokens appended to the base template.
    pub extra_arguments: Vec<String>,
    /// Direct download for the variant's primary jar. `None` means the jar is
    /// seeded by copying the base client jar — the loader's own library jar
    /// supplies the behavior delta at runtime.
    pub client_url: Option<String>,
}

impl LoaderRelease {
    /// Variant id: `<base>-<loader>-<loaderVersion>`.
    pub fn profile_id(&self, base_id: &str) -> String {
        format!("{}-{}-{}", base_id, self.loader_id, self.version)
    }

    /// Build the flattened variant descriptor: the base's libraries,
    /// asset index, client download and argument template, overlaid with the
    /// loader's own libraries, main class and extra arguments. Stamped with
    /// the current schema.
    pub fn synthesize(&self, base: &VersionDescriptor) -> VersionDescriptor {
        let mut argument_template = base.argument_template.clone();
        argument_template.extend(self.extra_arguments.iter().cloned());

        let mut libraries = vec![self.library.clone()];
        libraries.extend(self.auxiliary.iter().cloned());

        let overlay = VersionDescriptor {
            id: self.profile_id(&base.id),
            inherits_from: Some(base.id.clone()),
            main_class: self.main_class.clone(),
            argument_template,
            libraries,
            asset_index: None,
            client_download: None,
            schema_version: SCHEMA_VERSION,
        };

        overlay.merged_onto(base)
    }

    /// The Forge release this launcher pins for 1.12.2 installs.
    pub fn forge_1_12_2() -> Self {
        let forge_version = "14.23.5.2860";
        let forge_path = format!("net/minecraftforge/forge/1.12.2-{forge_version}");
        Self {
            loader_id: "forge".into(),
            version: forge_version.into(),
            main_class: "net.minecraft.launchwrapper.Launch".into(),
            library: LibraryRef {
                name: format!("net.minecraftforge:forge:1.12.2-{forge_version}"),
                path: format!("{forge_path}/forge-1.12.2-{forge_version}.jar"),
                url: format!(
                    "https://maven.minecraftforge.net/{forge_path}/forge-1.12.2-{forge_version}.jar"
                ),
                sha1: Some("029250575d3aa2cf80b56dffb66238a1eeaea2ac".into()),
                size: Some(4_466_148),
            },
            auxiliary: vec![LibraryRef {
                name: "net.minecraft:launchwrapper:1.12".into(),
                path: "net/minecraft/launchwrapper/1.12/launchwrapper-1.12.jar".into(),
                url: "https://libraries.minecraft.net/net/minecraft/launchwrapper/1.12/launchwrapper-1.12.jar".into(),
                sha1: None,
                size: None,
            }],
            extra_arguments: vec![
                "--tweakClass".into(),
                "net.minecraftforge.fml.common.launcher.FMLTweaker".into(),
            ],
            client_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::{ArtifactRef, AssetIndexRef};

    fn base() -> VersionDescriptor {
        VersionDescriptor {
            id: "1.12.2".into(),
            inherits_from: None,
            main_class: "net.minecraft.client.main.Main".into(),
            argument_template: vec!["--username".into(), "${auth_player_name}".into()],
            libraries: vec![LibraryRef {
                name: "com.google.guava:guava:21.0".into(),
                path: "com/google/guava/guava/21.0/guava-21.0.jar".into(),
                url: "https://libraries.example/guava-21.0.jar".into(),
                sha1: Some("aa".into()),
                size: Some(1),
            }],
            asset_index: Some(AssetIndexRef {
                id: "1.12".into(),
                url: "https://example.com/1.12.json".into(),
            }),
            client_download: Some(ArtifactRef {
                url: "https://example.com/client.jar".into(),
                sha1: Some("cc".into()),
                size: Some(2),
            }),
            schema_version: SCHEMA_VERSION,
        }
    }

    #[test]
    fn profile_id_embeds_base_loader_and_version() {
        let release = LoaderRelease::forge_1_12_2();
        assert_eq!(release.profile_id("1.12.2"), "1.12.2-forge-14.23.5.2860");
    }

    #[test]
    fn synthesized_variant_layers_loader_on_top_of_base() {
        let release = LoaderRelease::forge_1_12_2();
        let variant = release.synthesize(&base());

        assert_eq!(variant.id, "1.12.2-forge-14.23.5.2860");
        assert_eq!(variant.inherits_from.as_deref(), Some("1.12.2"));
        assert_eq!(variant.main_class, "net.minecraft.launchwrapper.Launch");

        // Base libraries survive, loader + auxiliary libraries join them.
        let names: Vec<&str> = variant.libraries.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"com.google.guava:guava:21.0"));
        assert!(names.contains(&"net.minecraftforge:forge:1.12.2-14.23.5.2860"));
        assert!(names.contains(&"net.minecraft:launchwrapper:1.12"));

        // Base client download and asset index carry over to the variant.
        assert_eq!(variant.client_download, base().client_download);
        assert_eq!(variant.asset_index, base().asset_index);

        // Tweak arguments are appended after the base template.
        let args = variant.argument_template.join(" ");
        assert!(args.starts_with("--username ${auth_player_name}"));
        assert!(args.ends_with("--tweakClass net.minecraftforge.fml.common.launcher.FMLTweaker"));
    }
}
