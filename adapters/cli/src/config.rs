//! Game configuration read from a TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use turret_defence_core::{CellCoord, DEFAULT_POOL_CAPACITY};
use turret_defence_world::{Grid, TurretPool, Wallet, World};

/// Settings required to assemble a playable world.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Location of the turret catalog, relative to the config file.
    pub(crate) catalog: PathBuf,
    /// Number of turret slots in the pool.
    #[serde(default = "default_capacity")]
    pub(crate) capacity: usize,
    /// Currency the player starts with.
    #[serde(default)]
    pub(crate) starting_money: u32,
    /// Layout of the build grid.
    pub(crate) grid: GridConfig,
}

/// Dimensions and road cells of the build grid.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GridConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    #[serde(default)]
    pub(crate) road: Vec<[u32; 2]>,
}

fn default_capacity() -> usize {
    DEFAULT_POOL_CAPACITY
}

impl GameConfig {
    /// Reads the configuration stored at the provided path.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read game config at {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, base)
            .with_context(|| format!("invalid game config at {}", path.display()))
    }

    /// Parses configuration text, resolving the catalog against `base`.
    pub(crate) fn parse(contents: &str, base: &Path) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).context("failed to parse game config toml contents")?;
        if config.capacity == 0 {
            bail!("turret pool capacity must be at least 1");
        }
        if config.grid.columns == 0 || config.grid.rows == 0 {
            bail!(
                "grid dimensions {}x{} must be non-zero",
                config.grid.columns,
                config.grid.rows
            );
        }
        if config.catalog.is_relative() {
            config.catalog = base.join(&config.catalog);
        }
        Ok(config)
    }

    /// Loads the catalog and assembles the world described by the config.
    pub(crate) fn build_world(&self) -> Result<World> {
        let pool = TurretPool::initialize(&self.catalog, self.capacity)
            .context("turret catalog must load before the game starts")?;
        let road = self
            .grid
            .road
            .iter()
            .map(|[column, row]| CellCoord::new(*column, *row));
        let grid = Grid::new(self.grid.columns, self.grid.rows).with_road(road);
        log::info!(
            "world ready: {}x{} grid, {} turret slots, {} starting money",
            grid.columns(),
            grid.rows(),
            pool.capacity(),
            self.starting_money
        );
        Ok(World::new(pool, grid, Wallet::new(self.starting_money)))
    }
}
