//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. Keeps argument parsing separate
//! from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DGE mission client
#[derive(Parser, Debug)]
#[command(name = "dgectl")]
#[command(about = "DGE Missions - reform government agencies one milestone at a time", long_about = None)]
#[command(version = env!("DGE_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Player address (overrides config and the active player)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// Data directory (overrides $DGE_DATA_DIR and config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start a new game
    Start {
        /// Agent name shown in the profile
        #[arg(long)]
        name: Option<String>,

        /// Wallet key to play with (only demo_ keys are accepted)
        #[arg(long)]
        key: Option<String>,
    },

    /// Show level, balance and the current milestone
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// List mission chains and their milestones
    Missions,

    /// Show the briefing for the current milestone
    Brief,

    /// Complete the current milestone
    Complete {
        /// Answer for quiz milestones (1-based option number)
        #[arg(long)]
        answer: Option<usize>,
    },

    /// Switch to another unlocked mission chain
    Select {
        /// Chain id, e.g. national-blockchain-summit
        chain: String,
    },

    /// Show completed milestones, most recent first
    History {
        /// Maximum number of entries
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show achievements
    Achievements,

    /// Onboarding tutorial
    Tutorial {
        #[command(subcommand)]
        action: Option<TutorialCommands>,
    },

    /// Demo mode with a mocked wallet
    Demo {
        #[command(subcommand)]
        action: Option<DemoCommands>,
    },

    /// Delete the player's progress
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show or change configuration
    Config {
        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TutorialCommands {
    /// Show the current step (default)
    Next,
    /// Mark the current step as done
    Complete,
    /// Turn the tutorial off
    Skip,
    /// Restart the tutorial from the first step
    Enable,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum DemoCommands {
    /// Start a demo session with a fresh mocked wallet
    Enable,
    /// End the demo session
    Disable,
    /// Show the demo session (default)
    Status,
    /// Advance pending demo transactions one confirmation step
    Confirm,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_complete_with_answer() {
        let cli = Cli::try_parse_from(["dgectl", "complete", "--answer", "2"]).unwrap();
        assert_eq!(cli.command, Commands::Complete { answer: Some(2) });
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dgectl", "status", "--address", "demo_x", "--data-dir", "/tmp/d"])
                .unwrap();
        assert_eq!(cli.address.as_deref(), Some("demo_x"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/d")));
        assert_eq!(cli.command, Commands::Status { json: false });
    }

    #[test]
    fn test_optional_subcommands() {
        let cli = Cli::try_parse_from(["dgectl", "demo"]).unwrap();
        assert_eq!(cli.command, Commands::Demo { action: None });

        let cli = Cli::try_parse_from(["dgectl", "tutorial", "skip"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Tutorial {
                action: Some(TutorialCommands::Skip)
            }
        );
    }

    #[test]
    fn test_history_default_limit() {
        let cli = Cli::try_parse_from(["dgectl", "history"]).unwrap();
        assert_eq!(cli.command, Commands::History { limit: 10 });
    }
}
