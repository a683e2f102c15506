//! Level System
//!
//! ## XP per milestone
//!
//! | Chain        | Agency | Story |
//! |--------------|--------|-------|
//! | main line    | 10     | 25    |
//! | side branch  | 20     | 50    |
//!
//! XP needed to leave level L is `L * 50`. On level up the level increases
//! by exactly one and XP starts again from 0.

use crate::model::{Milestone, MilestoneChain, MilestoneKind};
use serde::{Deserialize, Serialize};

/// XP multiplier per level
pub const XP_PER_LEVEL: u32 = 50;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 99;

/// XP awarded for completing a milestone of the given chain
pub fn xp_for(milestone: &Milestone, chain: &MilestoneChain) -> u32 {
    match (chain.side_branch, milestone.kind) {
        (true, MilestoneKind::Agency) => 20,
        (true, MilestoneKind::Story) => 50,
        (false, MilestoneKind::Agency) => 10,
        (false, MilestoneKind::Story) => 25,
    }
}

/// XP needed to leave `level`
pub fn xp_needed(level: u32) -> u32 {
    level.saturating_mul(XP_PER_LEVEL)
}

pub fn should_level_up(level: u32, xp: u32) -> bool {
    level < MAX_LEVEL && xp >= xp_needed(level)
}

/// Result of applying an XP gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub xp_gained: u32,
    pub level_before: u32,
    pub level_after: u32,
    pub xp_after: u32,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Add XP, leveling up at most once
pub fn apply_xp(level: u32, xp: u32, gained: u32) -> LevelChange {
    let total = xp.saturating_add(gained);
    let (level_after, xp_after) = if should_level_up(level, total) {
        (level + 1, 0)
    } else {
        (level, total)
    };

    LevelChange {
        xp_gained: gained,
        level_before: level,
        level_after,
        xp_after,
    }
}

/// Progress towards the next level (0-100)
pub fn progress_percent(level: u32, xp: u32) -> u8 {
    if level >= MAX_LEVEL {
        return 100;
    }
    let needed = xp_needed(level);
    if needed == 0 {
        return 100;
    }
    let pct = (xp as f64 / needed as f64 * 100.0).round();
    pct.min(100.0) as u8
}
