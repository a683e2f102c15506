//! Mission Catalog
//!
//! Static list of mission chains and milestones, embedded from
//! `data/missions.toml`. The catalog is read-only: players get a fresh
//! copy of the chains via [`Catalog::fresh_chains`].

use crate::error::{GameError, GameResult};
use crate::model::{Milestone, MilestoneChain};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BUILTIN_MISSIONS: &str = include_str!("../data/missions.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub chains: Vec<MilestoneChain>,
}

impl Catalog {
    /// The catalog shipped with the game
    pub fn builtin() -> GameResult<Self> {
        Self::from_toml(BUILTIN_MISSIONS)
    }

    /// Parse and validate a catalog document
    pub fn from_toml(content: &str) -> GameResult<Self> {
        let mut catalog: Catalog = toml::from_str(content)?;
        for chain in &mut catalog.chains {
            chain.completed = false;
            for milestone in &mut chain.milestones {
                milestone.reset_progress();
            }
        }
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> GameResult<()> {
        let first = self
            .chains
            .first()
            .ok_or_else(|| GameError::Catalog("catalog has no chains".to_string()))?;
        if !first.unlocked {
            return Err(GameError::Catalog(format!(
                "first chain '{}' must be unlocked",
                first.id
            )));
        }

        let mut chain_ids = HashSet::new();
        let mut milestone_ids = HashSet::new();
        for chain in &self.chains {
            if !chain_ids.insert(chain.id.as_str()) {
                return Err(GameError::Catalog(format!("duplicate chain id '{}'", chain.id)));
            }
            if chain.milestones.is_empty() {
                return Err(GameError::Catalog(format!("chain '{}' has no milestones", chain.id)));
            }
            for milestone in &chain.milestones {
                if !milestone_ids.insert(milestone.id.as_str()) {
                    return Err(GameError::Catalog(format!(
                        "duplicate milestone id '{}'",
                        milestone.id
                    )));
                }
                if let Some(activity) = &milestone.activity {
                    if let Some(answer) = activity.correct_answer {
                        if answer >= activity.options.len() {
                            return Err(GameError::Catalog(format!(
                                "milestone '{}' answer {} is out of range",
                                milestone.id, answer
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Deep copy of the chains with no progress recorded
    pub fn fresh_chains(&self) -> Vec<MilestoneChain> {
        self.chains.clone()
    }

    pub fn chain(&self, chain_id: &str) -> Option<&MilestoneChain> {
        self.chains.iter().find(|c| c.id == chain_id)
    }

    pub fn find_milestone(&self, milestone_id: &str) -> Option<(&MilestoneChain, &Milestone)> {
        self.chains
            .iter()
            .find_map(|c| c.milestone(milestone_id).map(|m| (c, m)))
    }

    pub fn milestone_count(&self) -> usize {
        self.chains.iter().map(|c| c.milestones.len()).sum()
    }

    pub fn total_reward(&self) -> u64 {
        self.chains
            .iter()
            .flat_map(|c| c.milestones.iter())
            .map(|m| m.reward)
            .sum()
    }
}
