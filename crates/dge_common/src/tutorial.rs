//! Onboarding tutorial steps.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub id: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub order: u32,
}

pub const TUTORIAL_STEPS: &[TutorialStep] = &[
    TutorialStep {
        id: "welcome",
        title: "Welcome to DGE",
        content: "Welcome to the Digital Government Efficiency agency. As a new agent, you'll help reform government agencies using blockchain technology.",
        order: 1,
    },
    TutorialStep {
        id: "blockchain-basics",
        title: "Blockchain Basics",
        content: "Every action you take is recorded on the Bitcoin SV blockchain, creating a permanent and transparent record.",
        order: 2,
    },
    TutorialStep {
        id: "milestones",
        title: "Mission Milestones",
        content: "Complete milestones to earn BSV rewards and advance through the game. Each milestone is cryptographically linked to form a chain.",
        order: 3,
    },
    TutorialStep {
        id: "rewards",
        title: "BSV Rewards",
        content: "Earn Bitcoin SV (BSV) for completing missions. Rewards are sent to your wallet via blockchain transactions.",
        order: 4,
    },
    TutorialStep {
        id: "interactive-content",
        title: "Interactive Content",
        content: "Each mission features interactive content like puzzles, simulations, and investigations. Complete these to progress through the game.",
        order: 5,
    },
    TutorialStep {
        id: "blockchain-verification",
        title: "Blockchain Verification",
        content: "Your achievements are permanently recorded on the blockchain. Each completion creates a cryptographic hash linked to your previous accomplishments.",
        order: 6,
    },
    TutorialStep {
        id: "mission-reports",
        title: "Mission Reports",
        content: "After completing a mission, review your mission report to see details about your performance and blockchain verification.",
        order: 7,
    },
    TutorialStep {
        id: "achievements",
        title: "Achievement System",
        content: "Unlock achievements by completing special objectives. Each achievement is recorded on the blockchain as a verifiable credential.",
        order: 8,
    },
];

pub fn find_step(id: &str) -> Option<&'static TutorialStep> {
    TUTORIAL_STEPS.iter().find(|s| s.id == id)
}

fn first_step_id() -> Option<String> {
    TUTORIAL_STEPS
        .iter()
        .min_by_key(|s| s.order)
        .map(|s| s.id.to_string())
}

/// A player's tutorial progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialProgress {
    pub enabled: bool,
    pub current: Option<String>,
    pub completed: Vec<String>,
}

impl Default for TutorialProgress {
    fn default() -> Self {
        Self {
            enabled: true,
            current: first_step_id(),
            completed: Vec::new(),
        }
    }
}

impl TutorialProgress {
    pub fn current_step(&self) -> Option<&'static TutorialStep> {
        if !self.enabled {
            return None;
        }
        self.current.as_deref().and_then(find_step)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    /// Mark a step done and move to the next step with a higher order that
    /// was not done before. Unknown steps are ignored.
    pub fn complete(&mut self, id: &str) -> bool {
        let Some(step) = find_step(id) else {
            return false;
        };

        let mut candidates: Vec<&TutorialStep> = TUTORIAL_STEPS
            .iter()
            .filter(|s| s.order > step.order && !self.is_completed(s.id))
            .collect();
        candidates.sort_by_key(|s| s.order);
        self.current = candidates.first().map(|s| s.id.to_string());

        if !self.is_completed(id) {
            self.completed.push(id.to_string());
        }
        true
    }

    /// Turn the tutorial off and forget progress
    pub fn skip(&mut self) {
        self.enabled = false;
        self.current = None;
        self.completed.clear();
    }

    /// Start over from the first step
    pub fn enable(&mut self) {
        *self = Self::default();
    }

    pub fn is_finished(&self) -> bool {
        self.enabled && self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_ordered() {
        assert_eq!(TUTORIAL_STEPS.len(), 8);
        for pair in TUTORIAL_STEPS.windows(2) {
            assert!(pair[0].order < pair[1].order);
        }
    }

    #[test]
    fn test_default_starts_at_welcome() {
        let progress = TutorialProgress::default();
        assert!(progress.enabled);
        assert_eq!(progress.current_step().unwrap().id, "welcome");
    }

    #[test]
    fn test_complete_advances() {
        let mut progress = TutorialProgress::default();
        assert!(progress.complete("welcome"));
        assert_eq!(progress.current.as_deref(), Some("blockchain-basics"));
        assert!(progress.is_completed("welcome"));
        assert!(!progress.complete("nonsense"));
    }

    #[test]
    fn test_complete_skips_done_steps() {
        let mut progress = TutorialProgress::default();
        progress.complete("milestones");
        assert_eq!(progress.current.as_deref(), Some("rewards"));

        // Finishing an earlier step jumps over the one already done
        progress.complete("blockchain-basics");
        assert_eq!(progress.current.as_deref(), Some("rewards"));
    }

    #[test]
    fn test_last_step_finishes() {
        let mut progress = TutorialProgress::default();
        progress.complete("achievements");
        assert!(progress.current.is_none());
        assert!(progress.is_finished());
    }

    #[test]
    fn test_skip_and_enable() {
        let mut progress = TutorialProgress::default();
        progress.complete("welcome");
        progress.skip();
        assert!(!progress.enabled);
        assert!(progress.current_step().is_none());
        assert!(progress.completed.is_empty());

        progress.enable();
        assert_eq!(progress, TutorialProgress::default());
    }
}
