use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::core::collab::{AuthTokens, PlayerProfile};
use crate::core::error::ConfigError;
use crate::core::paths::GameDirs;
use crate::core::version::VersionDescriptor;

use super::classpath::build_classpath;

const DEFAULT_MIN_MEMORY_MB: u32 = 512;
const DEFAULT_MAX_MEMORY_MB: u32 = 2048;

/// Who is playing. All three credential fields must be non-empty before a
/// launch configuration can be built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub name: String,
    pub uuid: String,
    pub access_token: String,
    pub user_type: String,
}

impl PlayerIdentity {
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            access_token: access_token.into(),
            user_type: "msa".into(),
        }
    }

    /// Identity from a completed authentication exchange.
    pub fn from_profile(profile: &PlayerProfile, tokens: &AuthTokens) -> Self {
        Self::new(
            profile.display_name.clone(),
            profile.id.clone(),
            tokens.access_token.clone(),
        )
    }

    /// Offline-mode identity: random uuid, placeholder token.
    pub fn offline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: Uuid::new_v4().to_string(),
            access_token: "offline".into(),
            user_type: "legacy".into(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingIdentity("playerName"));
        }
        if self.uuid.trim().is_empty() {
            return Err(ConfigError::MissingIdentity("playerId"));
        }
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::MissingIdentity("accessToken"));
        }
        Ok(())
    }
}

/// Per-launch knobs with safe defaults.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    pub min_memory_mb: Option<u32>,
    pub max_memory_mb: Option<u32>,
    pub extra_jvm_args: Vec<String>,
}

/// Fully expanded, ready-to-spawn launch description. Building it performs no
/// I/O and never mutates the installation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    pub root_dir: PathBuf,
    pub version_id: String,
    pub main_class: String,
    pub classpath: String,
    pub jvm_args: Vec<String>,
    pub game_args: Vec<String>,
    pub min_memory_mb: u32,
    pub max_memory_mb: u32,
}

/// Expand the descriptor's argument template against the identity and the
/// installation layout. Unknown `${...}` placeholders pass through verbatim.
pub fn build_launch_config(
    descriptor: &VersionDescriptor,
    identity: &PlayerIdentity,
    options: &RuntimeOptions,
    dirs: &GameDirs,
) -> Result<LaunchConfig, ConfigError> {
    identity.validate()?;

    let max_memory_mb = options.max_memory_mb.unwrap_or(DEFAULT_MAX_MEMORY_MB).max(1);
    let min_memory_mb = options
        .min_memory_mb
        .unwrap_or(DEFAULT_MIN_MEMORY_MB)
        .min(max_memory_mb);

    let assets_index = descriptor
        .asset_index
        .as_ref()
        .map(|index| index.id.clone())
        .unwrap_or_default();

    let game_args: Vec<String> = descriptor
        .argument_template
        .iter()
        .map(|token| expand_token(token, descriptor, identity, dirs, &assets_index))
        .collect();

    debug!(
        version = %descriptor.id,
        main_class = %descriptor.main_class,
        min_memory_mb,
        max_memory_mb,
        "launch configuration built"
    );

    Ok(LaunchConfig {
        root_dir: dirs.root().to_path_buf(),
        version_id: descriptor.id.clone(),
        main_class: descriptor.main_class.clone(),
        classpath: build_classpath(descriptor, dirs),
        jvm_args: options.extra_jvm_args.clone(),
        game_args,
        min_memory_mb,
        max_memory_mb,
    })
}

fn expand_token(
    token: &str,
    descriptor: &VersionDescriptor,
    identity: &PlayerIdentity,
    dirs: &GameDirs,
    assets_index: &str,
) -> String {
    token
        .replace("${auth_player_name}", &identity.name)
        .replace("${auth_uuid}", &identity.uuid)
        .replace("${auth_access_token}", &identity.access_token)
        .replace("${user_type}", &identity.user_type)
        .replace("${version_name}", &descriptor.id)
        .replace("${version_type}", "release")
        .replace("${game_directory}", &dirs.root().display().to_string())
        .replace("${assets_root}", &dirs.assets_dir().display().to_string())
        .replace("${assets_index_name}", assets_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::{AssetIndexRef, SCHEMA_VERSION};

    fn descriptor() -> VersionDescriptor {
        VersionDescriptor {
            id: "1.12.2".into(),
            inherits_from: None,
            main_class: "net.minecraft.client.main.Main".into(),
            argument_template: vec![
                "--username".into(),
                "${auth_player_name}".into(),
                "--assetIndex".into(),
                "${assets_index_name}".into(),
                "--custom".into(),
                "${not_a_known_placeholder}".into(),
            ],
            libraries: vec![],
            asset_index: Some(AssetIndexRef {
                id: "1.12".into(),
                url: "https://example.com/1.12.json".into(),
            }),
            client_download: None,
            schema_version: SCHEMA_VERSION,
        }
    }

    fn dirs() -> GameDirs {
        GameDirs::new(PathBuf::from("/tmp/game"))
    }

    #[test]
    fn known_placeholders_expand_and_unknown_pass_through() {
        let identity = PlayerIdentity::new("Steve", "uuid-1", "token-1");
        let config =
            build_launch_config(&descriptor(), &identity, &RuntimeOptions::default(), &dirs())
                .unwrap();

        assert_eq!(config.game_args[1], "Steve");
        assert_eq!(config.game_args[3], "1.12");
        assert_eq!(config.game_args[5], "${not_a_known_placeholder}");
    }

    #[test]
    fn memory_defaults_apply_and_min_never_exceeds_max() {
        let identity = PlayerIdentity::offline("Steve");
        let defaults =
            build_launch_config(&descriptor(), &identity, &RuntimeOptions::default(), &dirs())
                .unwrap();
        assert_eq!(defaults.min_memory_mb, 512);
        assert_eq!(defaults.max_memory_mb, 2048);

        let inverted = RuntimeOptions {
            min_memory_mb: Some(4096),
            max_memory_mb: Some(1024),
            extra_jvm_args: vec![],
        };
        let clamped = build_launch_config(&descriptor(), &identity, &inverted, &dirs()).unwrap();
        assert_eq!(clamped.min_memory_mb, 1024);
        assert_eq!(clamped.max_memory_mb, 1024);
    }

    #[test]
    fn empty_identity_fields_are_rejected() {
        let identity = PlayerIdentity::new("", "uuid-1", "token-1");
        let err = build_launch_config(&descriptor(), &identity, &RuntimeOptions::default(), &dirs())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentity("playerName")));

        let identity = PlayerIdentity::new("Steve", "uuid-1", "  ");
        let err = build_launch_config(&descriptor(), &identity, &RuntimeOptions::default(), &dirs())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentity("accessToken")));
    }

    #[test]
    fn offline_identity_is_complete() {
        let identity = PlayerIdentity::offline("Alex");
        assert!(identity.validate().is_ok());
        assert_eq!(identity.user_type, "legacy");
    }
}
