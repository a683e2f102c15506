//! Per-invocation context: config, stores, catalog and the player.

use crate::ui::Style;
use anyhow::{bail, Context, Result};
use dge_common::config::DgeConfig;
use dge_common::demo::DemoConfig;
use dge_common::events::MissionLog;
use dge_common::store::ProgressStore;
use dge_common::{Catalog, GameState};
use std::path::PathBuf;
use tracing::debug;

pub struct Session {
    pub config: DgeConfig,
    pub store: ProgressStore,
    pub log: MissionLog,
    pub catalog: Catalog,
    pub style: Style,
    address_override: Option<String>,
}

impl Session {
    pub fn new(
        config: DgeConfig,
        address: Option<String>,
        data_dir: Option<PathBuf>,
        style: Style,
    ) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| config.data_dir());
        debug!(data_dir = %data_dir.display(), "using data directory");
        let catalog = Catalog::builtin().context("Built-in mission catalog is invalid")?;
        Ok(Self {
            store: ProgressStore::new(&data_dir),
            log: MissionLog::in_dir(&data_dir),
            config,
            catalog,
            style,
            address_override: address,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.store.dir().to_path_buf()
    }

    /// Player to act on
    ///
    /// Priority:
    /// 1. `--address`
    /// 2. `player.default_address` in the config
    /// 3. Active player from the last `start`
    pub fn address(&self) -> Result<String> {
        if let Some(address) = &self.address_override {
            return Ok(address.clone());
        }
        if let Some(address) = &self.config.player.default_address {
            return Ok(address.clone());
        }
        match self.store.active_player()? {
            Some(address) => Ok(address),
            None => bail!("No active player. Run 'dgectl start' or pass --address"),
        }
    }

    pub fn load_state(&self) -> Result<GameState> {
        let address = self.address()?;
        match self.store.load(&address)? {
            Some(state) => Ok(state),
            None => bail!(
                "No game found for '{}'. Run 'dgectl start' first",
                address
            ),
        }
    }

    pub fn save_state(&self, state: &GameState) -> Result<()> {
        self.store
            .save(state)
            .with_context(|| format!("Failed to save game for '{}'", state.player_address))
    }

    /// The demo session, when it is enabled for this player
    pub fn demo_for(&self, address: &str) -> Result<Option<DemoConfig>> {
        let demo = self.store.load_demo()?;
        Ok((demo.enabled && demo.address == address).then_some(demo))
    }
}
