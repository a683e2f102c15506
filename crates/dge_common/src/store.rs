//! Progress store.
//!
//! Per-player JSON records in a data directory:
//!
//! ```text
//! <data_dir>/game_state_<address>.json
//! <data_dir>/achievements_<address>.json
//! <data_dir>/tutorial_<address>.json
//! <data_dir>/demo_mode.json
//! <data_dir>/active_player
//! ```

use crate::achievements::AchievementBook;
use crate::demo::DemoConfig;
use crate::error::{GameError, GameResult};
use crate::model::GameState;
use crate::tutorial::TutorialProgress;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STATE_PREFIX: &str = "game_state_";
const ACHIEVEMENTS_PREFIX: &str = "achievements_";
const TUTORIAL_PREFIX: &str = "tutorial_";
const DEMO_FILE: &str = "demo_mode.json";
const ACTIVE_PLAYER_FILE: &str = "active_player";

#[derive(Debug, Clone)]
pub struct ProgressStore {
    dir: PathBuf,
}

/// Addresses become part of a file name, keep them to a safe alphabet
fn validate_address(address: &str) -> GameResult<()> {
    if address.is_empty() {
        return Err(GameError::InvalidState("empty player address".to_string()));
    }
    if !address
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(GameError::InvalidState(format!(
            "player address '{}' contains unsupported characters",
            address
        )));
    }
    Ok(())
}

impl ProgressStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn keyed_path(&self, prefix: &str, address: &str) -> GameResult<PathBuf> {
        validate_address(address)?;
        Ok(self.dir.join(format!("{}{}.json", prefix, address)))
    }

    pub fn state_path(&self, address: &str) -> GameResult<PathBuf> {
        self.keyed_path(STATE_PREFIX, address)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> GameResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> GameResult<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(value)?;

        // Write to temp file then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }

    /// Load a player's state. `None` when nothing was saved yet.
    pub fn load(&self, address: &str) -> GameResult<Option<GameState>> {
        let path = self.state_path(address)?;
        let state: Option<GameState> = Self::read_json(&path)?;
        match state {
            Some(state) if state.player_address.is_empty() => Err(GameError::InvalidState(
                format!("{} has no player address", path.display()),
            )),
            Some(state) if state.chains.is_empty() => Err(GameError::InvalidState(format!(
                "{} has no mission chains",
                path.display()
            ))),
            Some(state) => {
                if state.player_address != address {
                    warn!(
                        expected = %address,
                        found = %state.player_address,
                        "stored state belongs to another address"
                    );
                }
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    pub fn save(&self, state: &GameState) -> GameResult<()> {
        let path = self.state_path(&state.player_address)?;
        self.write_json(&path, state)
    }

    /// Delete everything stored for a player
    pub fn remove(&self, address: &str) -> GameResult<bool> {
        let mut removed = false;
        for prefix in [STATE_PREFIX, ACHIEVEMENTS_PREFIX, TUTORIAL_PREFIX] {
            let path = self.keyed_path(prefix, address)?;
            if path.exists() {
                fs::remove_file(&path)?;
                removed = true;
            }
        }
        Ok(removed)
    }

    /// Addresses with a saved game state, sorted
    pub fn players(&self) -> GameResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut players = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(address) = name
                .strip_prefix(STATE_PREFIX)
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                if validate_address(address).is_ok() {
                    players.push(address.to_string());
                }
            }
        }
        players.sort();
        Ok(players)
    }

    pub fn load_achievements(&self, address: &str) -> GameResult<AchievementBook> {
        let path = self.keyed_path(ACHIEVEMENTS_PREFIX, address)?;
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }

    pub fn save_achievements(&self, address: &str, book: &AchievementBook) -> GameResult<()> {
        let path = self.keyed_path(ACHIEVEMENTS_PREFIX, address)?;
        self.write_json(&path, book)
    }

    pub fn load_tutorial(&self, address: &str) -> GameResult<TutorialProgress> {
        let path = self.keyed_path(TUTORIAL_PREFIX, address)?;
        Ok(Self::read_json(&path)?.unwrap_or_default())
    }

    pub fn save_tutorial(&self, address: &str, progress: &TutorialProgress) -> GameResult<()> {
        let path = self.keyed_path(TUTORIAL_PREFIX, address)?;
        self.write_json(&path, progress)
    }

    /// Stored demo session, or a disabled default
    pub fn load_demo(&self) -> GameResult<DemoConfig> {
        Ok(Self::read_json(&self.dir.join(DEMO_FILE))?.unwrap_or_default())
    }

    pub fn save_demo(&self, demo: &DemoConfig) -> GameResult<()> {
        self.write_json(&self.dir.join(DEMO_FILE), demo)
    }

    pub fn clear_demo(&self) -> GameResult<()> {
        let path = self.dir.join(DEMO_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Player picked by the last `start`
    pub fn active_player(&self) -> GameResult<Option<String>> {
        let path = self.dir.join(ACTIVE_PLAYER_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let address = fs::read_to_string(path)?.trim().to_string();
        Ok(validate_address(&address).is_ok().then_some(address))
    }

    pub fn set_active_player(&self, address: &str) -> GameResult<()> {
        validate_address(address)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(ACTIVE_PLAYER_FILE), address)?;
        Ok(())
    }

    pub fn clear_active_player(&self) -> GameResult<()> {
        let path = self.dir.join(ACTIVE_PLAYER_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::progression::initialize_game_state;
    use tempfile::TempDir;

    fn state(address: &str) -> GameState {
        let catalog = Catalog::builtin().unwrap();
        initialize_game_state(&catalog, address, None, 0, None)
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        assert!(store.load("demo_abc").unwrap().is_none());
        assert!(store.players().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path().join("nested"));
        let mut original = state("demo_abc");
        original.xp = 35;
        store.save(&original).unwrap();

        assert!(dir.path().join("nested/game_state_demo_abc.json").exists());
        let loaded = store.load("demo_abc").unwrap().unwrap();
        assert_eq!(loaded, original);
        assert_eq!(store.players().unwrap(), vec!["demo_abc"]);
    }

    #[test]
    fn test_rejects_bad_addresses() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        assert!(matches!(store.load(""), Err(GameError::InvalidState(_))));
        assert!(matches!(
            store.load("../etc/passwd"),
            Err(GameError::InvalidState(_))
        ));
        assert!(store.save(&state("")).is_err());
    }

    #[test]
    fn test_invalid_record() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        let mut broken = state("demo_abc");
        broken.chains.clear();
        store.save(&broken).unwrap();
        assert!(matches!(
            store.load("demo_abc"),
            Err(GameError::InvalidState(_))
        ));

        fs::write(store.state_path("demo_abc").unwrap(), "{ not json").unwrap();
        assert!(matches!(store.load("demo_abc"), Err(GameError::Json(_))));
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        store.save(&state("demo_abc")).unwrap();
        store
            .save_achievements("demo_abc", &AchievementBook::default())
            .unwrap();

        assert!(store.remove("demo_abc").unwrap());
        assert!(store.load("demo_abc").unwrap().is_none());
        assert!(!store.remove("demo_abc").unwrap());
    }

    #[test]
    fn test_active_player() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        assert!(store.active_player().unwrap().is_none());

        store.set_active_player("demo_abc").unwrap();
        assert_eq!(store.active_player().unwrap().as_deref(), Some("demo_abc"));
        assert!(store.set_active_player("a b").is_err());

        store.clear_active_player().unwrap();
        assert!(store.active_player().unwrap().is_none());
    }

    #[test]
    fn test_demo_record() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        assert!(!store.load_demo().unwrap().enabled);

        let demo = DemoConfig::enable();
        store.save_demo(&demo).unwrap();
        assert_eq!(store.load_demo().unwrap(), demo);

        store.clear_demo().unwrap();
        assert!(!store.load_demo().unwrap().enabled);
    }
}
