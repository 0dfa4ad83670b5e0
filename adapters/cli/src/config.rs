//! TOML configuration consumed by the command-line driver.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use gridfire_core::ViewConfig;
use gridfire_world::{LevelData, PropPlacement, WorldConfig};
use serde::{Deserialize, Serialize};

/// Everything needed to run a session: view, world parameters and driver timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GameConfig {
    /// Viewport and traversal limits.
    pub(crate) view: ViewConfig,
    /// Level, player, weapon, spawning and archetype parameters.
    #[serde(flatten)]
    pub(crate) world: WorldConfig,
    /// Level file replacing the inline level, relative to the config file.
    pub(crate) level_path: Option<PathBuf>,
    /// Pause after a win or loss before the next game starts.
    pub(crate) freeze_ms: u64,
    /// Seed of the agents' attack rolls.
    pub(crate) behavior_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            world: WorldConfig::default(),
            level_path: None,
            freeze_ms: 1500,
            behavior_seed: 0x6174_7461_636b,
        }
    }
}

/// Level file layout. Props default to none so custom layouts start bare.
#[derive(Debug, Deserialize)]
struct LevelFile {
    rows: Vec<Vec<u8>>,
    #[serde(default)]
    props: Vec<PropPlacement>,
}

impl GameConfig {
    /// Loads the configuration at `path`, resolving its level file if one is named.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, base)
    }

    fn parse(contents: &str, base: &Path) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).context("failed to parse config toml contents")?;
        if let Some(relative) = &config.level_path {
            let level_path = base.join(relative);
            config.world.level = load_level(&level_path)?;
            log::info!("loaded level from {}", level_path.display());
        }
        Ok(config)
    }
}

fn load_level(path: &Path) -> Result<LevelData> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level at {}", path.display()))?;
    parse_level(&contents).with_context(|| format!("invalid level file {}", path.display()))
}

fn parse_level(contents: &str) -> Result<LevelData> {
    let file: LevelFile = toml::from_str(contents).context("failed to parse level toml contents")?;
    Ok(LevelData {
        rows: file.rows,
        props: file.props,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfire_core::WorldPoint;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::parse("", Path::new(".")).expect("config");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.freeze_ms, 1500);
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = GameConfig::parse(
            r#"
                freeze_ms = 200

                [view]
                width = 320
                height = 200

                [player]
                start = { x = 2.5, y = 2.5 }

                [spawning]
                enemy_count = 3
            "#,
            Path::new("."),
        )
        .expect("config");

        assert_eq!(config.freeze_ms, 200);
        assert_eq!(config.view.width, 320);
        assert_eq!(config.view.max_depth, ViewConfig::default().max_depth);
        assert_eq!(config.world.player.start, WorldPoint::new(2.5, 2.5));
        assert_eq!(config.world.spawning.enemy_count, 3);
        assert_eq!(config.world.level, LevelData::default());
    }

    #[test]
    fn level_file_starts_without_props() {
        let level = parse_level("rows = [[1, 1, 1], [1, 0, 1], [1, 1, 1]]").expect("level");
        assert_eq!(level.rows.len(), 3);
        assert!(level.props.is_empty());
    }

    #[test]
    fn missing_level_file_is_reported() {
        let error = GameConfig::parse(
            "level_path = \"does-not-exist.toml\"",
            Path::new("/nonexistent"),
        )
        .expect_err("missing level");
        assert!(error.to_string().contains("failed to read level"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let error = GameConfig::parse("[view", Path::new(".")).expect_err("malformed");
        assert!(error.to_string().contains("failed to parse config"));
    }
}
