//! Game data model: milestones, chains and per-player state.
//!
//! The same `Milestone`/`MilestoneChain` types describe both the static
//! catalog entries and the player's copy of them; progress fields default
//! to empty so catalog data deserializes without them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Milestone type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    /// Agency work (training, audits, implementation)
    Agency,
    /// Story beats that move the Goldfinger narrative forward
    Story,
}

impl std::fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneKind::Agency => write!(f, "agency"),
            MilestoneKind::Story => write!(f, "story"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Legendary,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Legendary => "legendary",
        }
    }
}

/// Kind of interactive content attached to a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Quiz,
    Simulation,
    Puzzle,
    Dossier,
    Investigation,
    DataAnalysis,
    SecurityChallenge,
    IntelligenceReport,
    SecurityAudit,
    Implementation,
    Mission,
}

impl ActivityKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Quiz => "quiz",
            ActivityKind::Simulation => "simulation",
            ActivityKind::Puzzle => "puzzle",
            ActivityKind::Dossier => "dossier",
            ActivityKind::Investigation => "investigation",
            ActivityKind::DataAnalysis => "data analysis",
            ActivityKind::SecurityChallenge => "security challenge",
            ActivityKind::IntelligenceReport => "intelligence report",
            ActivityKind::SecurityAudit => "security audit",
            ActivityKind::Implementation => "implementation",
            ActivityKind::Mission => "mission",
        }
    }
}

/// Interactive content shown while a milestone is being played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub briefing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Index into `options`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl Activity {
    /// Check a quiz answer. `None` when the activity asks no question.
    pub fn check_answer(&self, answer: usize) -> Option<bool> {
        self.correct_answer.map(|correct| correct == answer)
    }
}

/// A single completable game task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: MilestoneKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Reward in satoshi-like units
    pub reward: u64,
    #[serde(default)]
    pub completed: bool,
    /// Display-only hash linking this completion to the previous one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
}

impl Milestone {
    /// Drop all progress recorded on this milestone
    pub fn reset_progress(&mut self) {
        self.completed = false;
        self.hash = None;
        self.txid = None;
        self.timestamp = None;
        self.previous_hash = None;
    }

    pub fn is_quiz(&self) -> bool {
        self.activity
            .as_ref()
            .map(|a| a.correct_answer.is_some())
            .unwrap_or(false)
    }
}

/// An ordered group of milestones representing one mission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneChain {
    pub id: String,
    pub title: String,
    pub description: String,
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub completed: bool,
    /// Side branches are unlocked independently and unlock nothing
    #[serde(default)]
    pub side_branch: bool,
}

impl MilestoneChain {
    pub fn all_completed(&self) -> bool {
        self.milestones.iter().all(|m| m.completed)
    }

    pub fn first_incomplete(&self) -> Option<&Milestone> {
        self.milestones.iter().find(|m| !m.completed)
    }

    pub fn position(&self, milestone_id: &str) -> Option<usize> {
        self.milestones.iter().position(|m| m.id == milestone_id)
    }

    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    pub fn completed_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }

    /// Hash of the last completed milestone in chain order
    pub fn last_hash(&self) -> Option<&str> {
        self.milestones
            .iter()
            .filter(|m| m.completed)
            .filter_map(|m| m.hash.as_deref())
            .last()
    }

    /// Whether the chain can currently be played
    pub fn is_playable(&self) -> bool {
        self.unlocked && !self.completed
    }

    pub fn badge_name(&self) -> String {
        format!("{} Expert", self.title)
    }
}

/// Per-player game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player_address: String,
    #[serde(default)]
    pub player_name: Option<String>,
    pub level: u32,
    pub xp: u32,
    pub balance: u64,
    #[serde(default)]
    pub current_chain_id: Option<String>,
    #[serde(default)]
    pub current_milestone_id: Option<String>,
    pub chains: Vec<MilestoneChain>,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub transactions: Vec<String>,
}

impl GameState {
    pub fn chain(&self, chain_id: &str) -> Option<&MilestoneChain> {
        self.chains.iter().find(|c| c.id == chain_id)
    }

    pub fn chain_index(&self, chain_id: &str) -> Option<usize> {
        self.chains.iter().position(|c| c.id == chain_id)
    }

    /// Find a milestone anywhere in the state
    pub fn find_milestone(&self, milestone_id: &str) -> Option<(&MilestoneChain, &Milestone)> {
        self.chains
            .iter()
            .find_map(|c| c.milestone(milestone_id).map(|m| (c, m)))
    }

    pub fn completed_milestones(&self) -> usize {
        self.chains.iter().map(|c| c.completed_count()).sum()
    }

    pub fn total_milestones(&self) -> usize {
        self.chains.iter().map(|c| c.milestones.len()).sum()
    }

    pub fn completed_chains(&self) -> usize {
        self.chains.iter().filter(|c| c.completed).count()
    }

    /// Sum of rewards for every completed milestone
    pub fn rewards_earned(&self) -> u64 {
        self.chains
            .iter()
            .flat_map(|c| c.milestones.iter())
            .filter(|m| m.completed)
            .map(|m| m.reward)
            .sum()
    }

    /// No milestone left to play
    pub fn is_complete(&self) -> bool {
        self.current_chain_id.is_none() && self.current_milestone_id.is_none()
    }

    pub fn profile(&self) -> PlayerProfile {
        let milestone_hashes = self
            .chains
            .iter()
            .flat_map(|c| c.milestones.iter())
            .filter_map(|m| m.hash.as_ref().map(|h| (m.id.clone(), h.clone())))
            .collect();

        PlayerProfile {
            address: self.player_address.clone(),
            username: self.player_name.clone(),
            is_registered: self.player_name.is_some(),
            balance: self.balance,
            level: self.level,
            xp: self.xp,
            badges: self.badges.clone(),
            milestone_hashes,
            transactions: self.transactions.clone(),
        }
    }
}

/// Public view of a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub address: String,
    pub username: Option<String>,
    pub is_registered: bool,
    pub balance: u64,
    pub level: u32,
    pub xp: u32,
    pub badges: Vec<String>,
    pub milestone_hashes: BTreeMap<String, String>,
    pub transactions: Vec<String>,
}
