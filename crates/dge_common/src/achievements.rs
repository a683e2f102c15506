//! Achievement badges for DGE agents.
//!
//! Static definitions plus a per-player [`AchievementBook`] recording what
//! was unlocked and when. Most achievements follow from the game state
//! (see [`evaluate`]); the rest are unlocked explicitly by the client.

use crate::model::GameState;
use crate::progression::MAX_LEVEL;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Gameplay,
    Blockchain,
    Story,
    Special,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Gameplay => "gameplay",
            Category::Blockchain => "blockchain",
            Category::Story => "story",
            Category::Special => "special",
        }
    }
}

/// Achievement definition with an ASCII badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub badge: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub category: Category,
    /// Hidden until unlocked
    pub secret: bool,
}

impl Achievement {
    const fn new(
        id: &'static str,
        badge: &'static str,
        title: &'static str,
        description: &'static str,
        rarity: Rarity,
        category: Category,
    ) -> Self {
        Self {
            id,
            badge,
            title,
            description,
            rarity,
            category,
            secret: false,
        }
    }

    const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

use Category::*;
use Rarity::*;

pub const ACHIEVEMENTS: &[Achievement] = &[
    // Gameplay
    Achievement::new("first-mission", "[1]", "First Steps", "Complete your first DGE mission", Common, Gameplay),
    Achievement::new("rising-star", "[5]", "Rising Star", "Reach level 5 as a DGE agent", Common, Gameplay),
    Achievement::new("veteran-agent", "[50]", "Veteran Agent", "Complete 50 milestones", Rare, Gameplay),
    Achievement::new("master-agent", "[99]", "Master Agent", "Reach the maximum level", Legendary, Gameplay),

    // Blockchain
    Achievement::new("blockchain-pioneer", "<#>", "Blockchain Pioneer", "Record your first milestone on the blockchain", Common, Blockchain),
    Achievement::new("chain-builder", "<##>", "Chain Builder", "Create a chain of 10 verified milestones", Rare, Blockchain),
    Achievement::new("crypto-millionaire", "<$$>", "Crypto Millionaire", "Accumulate 1,000,000 satoshis in rewards", Epic, Blockchain),
    Achievement::new("blockchain-master", "<**>", "Blockchain Master", "Complete every mission chain", Legendary, Blockchain),

    // Story
    Achievement::new("efficiency-expert", "{us}", "Efficiency Expert", "Complete all USPS reform missions", Rare, Story),
    Achievement::new("treasury-guardian", "{tr}", "Treasury Guardian", "Complete all Treasury Department missions", Epic, Story),
    Achievement::new("fort-knox-hero", "{fk}", "Fort Knox Hero", "Prevent Goldfinger's attack on Fort Knox", Epic, Story),
    Achievement::new("goldfinger-nemesis", "{gf}", "Goldfinger's Nemesis", "Complete the final showdown with Goldfinger", Legendary, Story),

    // Special
    Achievement::new("blockchain-advocate", "(nbs)", "Blockchain Advocate", "Complete all National Blockchain Summit missions", Legendary, Special),
    Achievement::new("perfect-agent", "(ok)", "Perfect Agent", "Complete all missions without using hints", Legendary, Special).secret(),
    Achievement::new("speed-runner", "(<<)", "Speed Runner", "Complete any mission chain in under 10 minutes", Epic, Special).secret(),
    Achievement::new("blockchain-scholar", "(edu)", "Blockchain Scholar", "Read all educational content in the game", Rare, Special),
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Chain whose completion unlocks an achievement
const CHAIN_ACHIEVEMENTS: &[(&str, &str)] = &[
    ("usps-reform", "efficiency-expert"),
    ("treasury-audit", "treasury-guardian"),
    ("fort-knox", "fort-knox-hero"),
    ("dhs-reform", "goldfinger-nemesis"),
    ("national-blockchain-summit", "blockchain-advocate"),
];

/// Achievements the given state qualifies for
pub fn evaluate(state: &GameState) -> Vec<&'static str> {
    let completed = state.completed_milestones();
    let recorded = state
        .chains
        .iter()
        .flat_map(|c| c.milestones.iter())
        .filter(|m| m.completed && m.hash.is_some())
        .count();
    let chain_done = |id: &str| state.chain(id).map(|c| c.completed).unwrap_or(false);

    let mut earned = Vec::new();
    let mut check = |id: &'static str, cond: bool| {
        if cond {
            earned.push(id);
        }
    };

    check("first-mission", completed >= 1);
    check("rising-star", state.level >= 5);
    check("veteran-agent", completed >= 50);
    check("master-agent", state.level >= MAX_LEVEL);
    check("blockchain-pioneer", recorded >= 1);
    check("chain-builder", recorded >= 10);
    check("crypto-millionaire", state.rewards_earned() >= 1_000_000);
    check(
        "blockchain-master",
        !state.chains.is_empty() && state.chains.iter().all(|c| c.completed),
    );
    for &(chain_id, achievement) in CHAIN_ACHIEVEMENTS {
        check(achievement, chain_done(chain_id));
    }
    earned
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockRecord {
    pub unlocked_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
}

/// A player's unlocked achievements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementBook {
    pub unlocked: BTreeMap<String, UnlockRecord>,
    /// Newest first
    pub recent: Vec<String>,
}

impl AchievementBook {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    /// Unlock an achievement. Unknown or already unlocked ids are ignored.
    pub fn unlock(&mut self, id: &str, txid: Option<String>) -> bool {
        if find(id).is_none() || self.is_unlocked(id) {
            return false;
        }
        self.unlocked.insert(
            id.to_string(),
            UnlockRecord {
                unlocked_at: Utc::now(),
                txid,
            },
        );
        self.recent.insert(0, id.to_string());
        info!(achievement = %id, "achievement unlocked");
        true
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    /// Unlock everything the state qualifies for, returning the new ids
    pub fn sync(&mut self, state: &GameState) -> Vec<&'static str> {
        evaluate(state)
            .into_iter()
            .filter(|id| self.unlock(id, None))
            .collect()
    }

    /// Definitions with their unlock record, in definition order
    pub fn entries(&self) -> Vec<(&'static Achievement, Option<&UnlockRecord>)> {
        ACHIEVEMENTS
            .iter()
            .map(|a| (a, self.unlocked.get(a.id)))
            .collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::progression::initialize_game_state;
    use std::collections::HashSet;

    fn state() -> GameState {
        let catalog = Catalog::builtin().unwrap();
        initialize_game_state(&catalog, "demo_a", None, 0, None)
    }

    #[test]
    fn test_definitions() {
        assert_eq!(ACHIEVEMENTS.len(), 16);
        let ids: HashSet<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 16);
        assert!(find("speed-runner").unwrap().secret);
        assert!(!find("first-mission").unwrap().secret);
        for (_, achievement) in CHAIN_ACHIEVEMENTS {
            assert!(find(achievement).is_some());
        }
    }

    #[test]
    fn test_evaluate_fresh_state() {
        assert!(evaluate(&state()).is_empty());
    }

    #[test]
    fn test_evaluate_progress() {
        let mut state = state();
        state.chains[0].milestones[0].completed = true;
        assert_eq!(evaluate(&state), vec!["first-mission"]);

        state.chains[0].milestones[0].hash = Some("h".into());
        state.level = 5;
        let earned = evaluate(&state);
        assert!(earned.contains(&"rising-star"));
        assert!(earned.contains(&"blockchain-pioneer"));

        let summit = state.chain_index("national-blockchain-summit").unwrap();
        state.chains[summit].completed = true;
        assert!(evaluate(&state).contains(&"blockchain-advocate"));
        assert!(!evaluate(&state).contains(&"blockchain-master"));
    }

    #[test]
    fn test_unlock() {
        let mut book = AchievementBook::default();
        assert!(book.unlock("first-mission", Some("tx1".into())));
        assert!(!book.unlock("first-mission", None));
        assert!(!book.unlock("no-such-thing", None));
        assert!(book.unlock("rising-star", None));

        assert_eq!(book.recent, vec!["rising-star", "first-mission"]);
        assert_eq!(
            book.unlocked["first-mission"].txid.as_deref(),
            Some("tx1")
        );
        book.clear_recent();
        assert!(book.recent.is_empty());
        assert_eq!(book.unlocked_count(), 2);
    }

    #[test]
    fn test_sync_only_reports_new() {
        let mut state = state();
        state.chains[0].milestones[0].completed = true;
        let mut book = AchievementBook::default();
        assert_eq!(book.sync(&state), vec!["first-mission"]);
        assert!(book.sync(&state).is_empty());
        assert_eq!(book.entries().len(), 16);
    }
}
