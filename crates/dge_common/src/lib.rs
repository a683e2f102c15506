//! DGE Common - mission catalog, progression engine and player state
//!
//! Everything the `dgectl` client needs to run the DGE mission game:
//! the static catalog, the milestone-chain state machine, the mocked
//! ledger client and the local stores the state is persisted to.

pub mod achievements;
pub mod catalog;
pub mod config;
pub mod demo;
pub mod error;
pub mod events;
pub mod ledger;
pub mod model;
pub mod progression;
pub mod store;
pub mod tutorial;

pub use catalog::Catalog;
pub use error::{GameError, GameResult};
pub use model::{
    Activity, ActivityKind, Difficulty, GameState, Milestone, MilestoneChain, MilestoneKind,
    PlayerProfile,
};
pub use progression::{CompletionOutcome, LevelChange};

/// Chain every new agent starts on
pub const TRAINING_CHAIN_ID: &str = "dge-training";

/// First milestone of the training chain
pub const TRAINING_FIRST_MILESTONE_ID: &str = "dge-training-1";

/// Side-branch chain unlocked from the start
pub const SUMMIT_CHAIN_ID: &str = "national-blockchain-summit";

/// Crate version, shown in client banners
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
