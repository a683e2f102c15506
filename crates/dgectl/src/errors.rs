//! Error codes and exit status for dgectl

use dge_common::GameError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the command has nothing to act on (no player, game over)
pub const EXIT_NOT_AVAILABLE: i32 = 64;

/// Exit code when the game state refuses the action
pub const EXIT_INVALID_STATE: i32 = 65;

/// Map an error to the process exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<GameError>() {
        Some(GameError::NoCurrentMilestone | GameError::DemoDisabled) => EXIT_NOT_AVAILABLE,
        Some(
            GameError::ChainNotFound(_)
            | GameError::MilestoneNotFound(_)
            | GameError::InvalidState(_),
        ) => EXIT_INVALID_STATE,
        Some(e) if e.is_state_error() => EXIT_INVALID_STATE,
        _ => EXIT_GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = anyhow::Error::new(GameError::NoCurrentMilestone);
        assert_eq!(exit_code_for(&err), EXIT_NOT_AVAILABLE);

        let err = anyhow::Error::new(GameError::ChainLocked("usps-reform".into()));
        assert_eq!(exit_code_for(&err), EXIT_INVALID_STATE);

        let err = anyhow::Error::new(GameError::Ledger("down".into())).context("completing");
        assert_eq!(exit_code_for(&err), EXIT_GENERAL_ERROR);

        let err = anyhow::Error::new(GameError::InsufficientBalance { needed: 2, available: 1 });
        assert_eq!(exit_code_for(&err), EXIT_INVALID_STATE);

        let err = anyhow::anyhow!("plain");
        assert_eq!(exit_code_for(&err), EXIT_GENERAL_ERROR);
    }

    #[test]
    fn test_exit_code_through_context() {
        let err = anyhow::Error::new(GameError::AlreadyCompleted("m".into())).context("saving");
        assert_eq!(exit_code_for(&err), EXIT_INVALID_STATE);
    }
}
