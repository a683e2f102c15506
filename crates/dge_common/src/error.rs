//! Error types for the DGE mission game.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("No current milestone set")]
    NoCurrentMilestone,

    #[error("Chain not found: {0}")]
    ChainNotFound(String),

    #[error("Milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("Chain is locked: {0}")]
    ChainLocked(String),

    #[error("Chain already completed: {0}")]
    ChainCompleted(String),

    #[error("Milestone already completed: {0}")]
    AlreadyCompleted(String),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Demo mode not enabled")]
    DemoDisabled,

    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("TOML error")]
    Toml(#[from] toml::de::Error),
}

impl GameError {
    pub fn code(&self) -> i32 {
        match self {
            GameError::NoCurrentMilestone => 10,
            GameError::ChainNotFound(_) => 11,
            GameError::MilestoneNotFound(_) => 12,
            GameError::ChainLocked(_) => 13,
            GameError::ChainCompleted(_) => 14,
            GameError::AlreadyCompleted(_) => 15,
            GameError::InvalidState(_) => 20,
            GameError::Catalog(_) => 21,
            GameError::InvalidKey(_) => 30,
            GameError::Ledger(_) => 31,
            GameError::DemoDisabled => 40,
            GameError::InsufficientBalance { .. } => 41,
            GameError::Io(_) => 50,
            GameError::Json(_) => 51,
            GameError::Toml(_) => 52,
        }
    }

    /// Errors caused by asking for something the current state does not allow
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            GameError::NoCurrentMilestone
                | GameError::ChainLocked(_)
                | GameError::ChainCompleted(_)
                | GameError::AlreadyCompleted(_)
                | GameError::DemoDisabled
                | GameError::InsufficientBalance { .. }
        )
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = vec![
            GameError::NoCurrentMilestone,
            GameError::ChainNotFound("x".into()),
            GameError::MilestoneNotFound("x".into()),
            GameError::ChainLocked("x".into()),
            GameError::ChainCompleted("x".into()),
            GameError::AlreadyCompleted("x".into()),
            GameError::InvalidState("x".into()),
            GameError::Catalog("x".into()),
            GameError::InvalidKey("x".into()),
            GameError::Ledger("x".into()),
            GameError::DemoDisabled,
            GameError::InsufficientBalance { needed: 1, available: 0 },
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_messages() {
        let err = GameError::InsufficientBalance { needed: 500, available: 100 };
        assert_eq!(err.to_string(), "Insufficient balance: need 500, have 100");
        assert!(err.is_state_error());
        assert!(!GameError::Catalog("bad".into()).is_state_error());
    }

    #[test]
    fn test_wrapped_source_printed_once() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = anyhow::Error::new(GameError::from(io)).context("Failed to save");
        assert_eq!(format!("{:#}", err), "Failed to save: IO error: disk full");
    }
}
