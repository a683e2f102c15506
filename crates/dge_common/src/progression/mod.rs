//! Progression Module
//!
//! Milestone-chain state machine for DGE agents.
//!
//! ## Level System
//!
//! - XP per milestone depends on its kind and whether its chain is the
//!   summit side branch
//! - Leveling needs `level * 50` XP; XP resets on level up
//!
//! ## Chain Progression
//!
//! - Milestones in a chain are played in order
//! - Completing a main-line chain unlocks the next main-line chain
//! - The summit side branch is unlocked from the start and unlocks nothing

pub mod engine;
pub mod levels;

pub use engine::{
    complete_current, current_chain, current_milestone, initialize_game_state, next_milestone,
    repair_pointer, select_chain, CompletionOutcome,
};
pub use levels::{
    apply_xp, progress_percent, should_level_up, xp_for, xp_needed, LevelChange, MAX_LEVEL,
    XP_PER_LEVEL,
};
