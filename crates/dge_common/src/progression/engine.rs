//! Progression Engine
//!
//! Pure functions over a [`GameState`]: build a new state, resolve the
//! current milestone, complete it and move the pointer. The only side
//! effects go through the [`LedgerClient`] passed in.
//!
//! Pointer rules (in order):
//! 1. first incomplete milestone of the current chain, if it is playable
//! 2. first playable main-line chain after the current chain
//! 3. first playable chain in catalog order (side branch included)
//! 4. none: every unlocked chain is completed

use super::levels::{apply_xp, xp_for, LevelChange};
use crate::catalog::Catalog;
use crate::demo::DemoConfig;
use crate::error::{GameError, GameResult};
use crate::ledger::{milestone_hash, LedgerClient};
use crate::model::{GameState, Milestone, MilestoneChain};
use crate::{TRAINING_CHAIN_ID, TRAINING_FIRST_MILESTONE_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything that happened when a milestone was completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub milestone_id: String,
    pub chain_id: String,
    pub milestone_txid: String,
    pub reward_txid: String,
    pub badge_txid: Option<String>,
    pub hash: String,
    pub previous_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub reward: u64,
    pub level: LevelChange,
    pub chain_completed: bool,
    pub badge: Option<String>,
    /// Main-line chain unlocked by this completion
    pub unlocked_chain: Option<String>,
    pub next_chain_id: Option<String>,
    pub next_milestone_id: Option<String>,
    pub game_complete: bool,
}

impl CompletionOutcome {
    /// Transaction ids in the order they were appended to the history
    pub fn txids(&self) -> Vec<String> {
        let mut txids = vec![self.milestone_txid.clone(), self.reward_txid.clone()];
        txids.extend(self.badge_txid.clone());
        txids
    }
}

/// Build a fresh game state for a player.
///
/// With an enabled demo session the state is rebuilt from the session
/// record: unlocked missions, completed milestones, balance, transactions
/// and pointer all come from it.
pub fn initialize_game_state(
    catalog: &Catalog,
    address: &str,
    player_name: Option<String>,
    balance: u64,
    demo: Option<&DemoConfig>,
) -> GameState {
    let mut state = GameState {
        player_address: address.to_string(),
        player_name,
        level: 1,
        xp: 0,
        balance,
        current_chain_id: Some(TRAINING_CHAIN_ID.to_string()),
        current_milestone_id: Some(TRAINING_FIRST_MILESTONE_ID.to_string()),
        chains: catalog.fresh_chains(),
        badges: Vec::new(),
        transactions: Vec::new(),
    };

    if let Some(demo) = demo.filter(|d| d.enabled) {
        restore_from_demo(&mut state, demo);
    }

    repair_pointer(&mut state);
    debug!(
        address = %state.player_address,
        chain = ?state.current_chain_id,
        milestone = ?state.current_milestone_id,
        "game state initialized"
    );
    state
}

fn restore_from_demo(state: &mut GameState, demo: &DemoConfig) {
    for chain in &mut state.chains {
        chain.unlocked = demo.is_mission_unlocked(&chain.id);
        let mut previous_hash: Option<String> = None;
        for milestone in &mut chain.milestones {
            if demo.is_milestone_completed(&milestone.id) {
                let timestamp = demo
                    .milestone_timestamp(&milestone.id)
                    .unwrap_or_else(Utc::now);
                milestone.completed = true;
                milestone.timestamp = Some(timestamp);
                milestone.hash = match demo.milestone_hash(&milestone.id) {
                    Some(hash) => Some(hash.to_string()),
                    // Regenerate hashes missing from older session records
                    None => milestone_hash(
                        &milestone.id,
                        &state.player_address,
                        &timestamp,
                        previous_hash.as_deref(),
                    )
                    .ok(),
                };
                milestone.previous_hash = previous_hash.clone();
                if milestone.hash.is_some() {
                    previous_hash = milestone.hash.clone();
                }
            }
        }
        chain.completed = chain.all_completed();
    }

    state.balance = demo.balance;
    state.transactions = demo.transactions.clone();
    state.current_chain_id = demo
        .current_chain_id
        .clone()
        .or_else(|| Some(TRAINING_CHAIN_ID.to_string()));
    state.current_milestone_id = demo
        .current_milestone_id
        .clone()
        .or_else(|| Some(TRAINING_FIRST_MILESTONE_ID.to_string()));
}

/// Indices of the current chain and milestone
fn locate_current(state: &GameState) -> GameResult<(usize, usize)> {
    let (chain_id, milestone_id) = match (&state.current_chain_id, &state.current_milestone_id) {
        (Some(c), Some(m)) => (c, m),
        _ => return Err(GameError::NoCurrentMilestone),
    };
    let chain_idx = state
        .chain_index(chain_id)
        .ok_or_else(|| GameError::ChainNotFound(chain_id.clone()))?;
    let milestone_idx = state.chains[chain_idx]
        .position(milestone_id)
        .ok_or_else(|| GameError::MilestoneNotFound(milestone_id.clone()))?;
    Ok((chain_idx, milestone_idx))
}

pub fn current_chain(state: &GameState) -> GameResult<&MilestoneChain> {
    let (chain_idx, _) = locate_current(state)?;
    Ok(&state.chains[chain_idx])
}

pub fn current_milestone(state: &GameState) -> GameResult<&Milestone> {
    let (chain_idx, milestone_idx) = locate_current(state)?;
    Ok(&state.chains[chain_idx].milestones[milestone_idx])
}

fn first_open(chain: &MilestoneChain) -> Option<(String, String)> {
    if !chain.is_playable() {
        return None;
    }
    chain
        .first_incomplete()
        .map(|m| (chain.id.clone(), m.id.clone()))
}

/// Where the pointer should go next, as `(chain_id, milestone_id)`.
///
/// Without a current pointer the search starts from the top of the catalog.
pub fn next_milestone(state: &GameState) -> GameResult<Option<(String, String)>> {
    let start = match (&state.current_chain_id, &state.current_milestone_id) {
        (Some(_), Some(_)) => {
            let (chain_idx, _) = locate_current(state)?;
            if let Some(next) = first_open(&state.chains[chain_idx]) {
                return Ok(Some(next));
            }
            chain_idx + 1
        }
        _ => 0,
    };

    let main_line = state.chains[start.min(state.chains.len())..]
        .iter()
        .filter(|c| !c.side_branch)
        .find_map(first_open);
    if main_line.is_some() {
        return Ok(main_line);
    }

    Ok(state.chains.iter().find_map(first_open))
}

/// Bring the pointer back in line with the invariants: it must name an
/// incomplete milestone of a playable chain, or be cleared.
pub fn repair_pointer(state: &mut GameState) {
    let valid = locate_current(state)
        .map(|(c, m)| state.chains[c].is_playable() && !state.chains[c].milestones[m].completed)
        .unwrap_or(false);
    if valid {
        return;
    }

    let in_chain = state
        .current_chain_id
        .as_deref()
        .and_then(|id| state.chain(id))
        .and_then(first_open);
    let next = in_chain.or_else(|| {
        state.current_chain_id = None;
        state.current_milestone_id = None;
        next_milestone(state).ok().flatten()
    });
    set_pointer(state, next);
}

fn set_pointer(state: &mut GameState, next: Option<(String, String)>) {
    match next {
        Some((chain_id, milestone_id)) => {
            state.current_chain_id = Some(chain_id);
            state.current_milestone_id = Some(milestone_id);
        }
        None => {
            state.current_chain_id = None;
            state.current_milestone_id = None;
        }
    }
}

/// Switch to another chain. The pointer moves to its first incomplete
/// milestone.
pub fn select_chain(state: &mut GameState, chain_id: &str) -> GameResult<()> {
    let chain = state
        .chain(chain_id)
        .ok_or_else(|| GameError::ChainNotFound(chain_id.to_string()))?;
    if !chain.unlocked {
        return Err(GameError::ChainLocked(chain_id.to_string()));
    }
    if chain.completed {
        return Err(GameError::ChainCompleted(chain_id.to_string()));
    }
    let next = first_open(chain);
    set_pointer(state, next);
    info!(chain = %chain_id, "chain selected");
    Ok(())
}

/// Complete the current milestone.
///
/// Ledger calls happen first; the state is only changed once all of them
/// succeeded, so a failing ledger leaves the state untouched.
pub fn complete_current(
    state: &mut GameState,
    ledger: &mut dyn LedgerClient,
    now: DateTime<Utc>,
) -> GameResult<CompletionOutcome> {
    let (chain_idx, milestone_idx) = locate_current(state)?;
    let address = state.player_address.clone();

    let chain = &state.chains[chain_idx];
    let milestone = &chain.milestones[milestone_idx];
    if milestone.completed {
        return Err(GameError::AlreadyCompleted(milestone.id.clone()));
    }
    if !chain.unlocked {
        return Err(GameError::ChainLocked(chain.id.clone()));
    }

    let previous_hash = chain.last_hash().map(str::to_string);
    let completes_chain = chain
        .milestones
        .iter()
        .enumerate()
        .all(|(i, m)| i == milestone_idx || m.completed);
    let badge = completes_chain.then(|| chain.badge_name());
    let xp_gained = xp_for(milestone, chain);
    let side_branch = chain.side_branch;

    let receipt = ledger.record_milestone(milestone, &address, previous_hash.as_deref(), now)?;
    let reward_txid = ledger.send_reward(milestone, &address, now)?;
    let badge_txid = match &badge {
        Some(name) => Some(ledger.award_badge(name, &address, now)?),
        None => None,
    };

    let chain_id = chain.id.clone();
    let milestone_id = milestone.id.clone();
    let reward = milestone.reward;

    // Ledger done, apply to state
    {
        let milestone = &mut state.chains[chain_idx].milestones[milestone_idx];
        milestone.completed = true;
        milestone.hash = Some(receipt.hash.clone());
        milestone.txid = Some(receipt.txid.clone());
        milestone.timestamp = Some(now);
        milestone.previous_hash = previous_hash.clone();
    }
    state.transactions.push(receipt.txid.clone());
    state.transactions.push(reward_txid.clone());
    state.balance = state.balance.saturating_add(reward);

    let level = apply_xp(state.level, state.xp, xp_gained);
    state.level = level.level_after;
    state.xp = level.xp_after;
    if level.leveled_up() {
        info!(level = state.level, "level up");
    }

    let mut unlocked_chain = None;
    if completes_chain {
        state.chains[chain_idx].completed = true;
        if let (Some(name), Some(txid)) = (&badge, &badge_txid) {
            state.badges.push(name.clone());
            state.transactions.push(txid.clone());
        }
        info!(chain = %chain_id, "mission chain completed");

        if !side_branch {
            if let Some(next) = state.chains[chain_idx + 1..]
                .iter_mut()
                .find(|c| !c.side_branch)
            {
                if !next.unlocked {
                    next.unlocked = true;
                    info!(chain = %next.id, "mission chain unlocked");
                    unlocked_chain = Some(next.id.clone());
                }
            }
        }
    }

    let next = next_milestone(state)?;
    let game_complete = next.is_none();
    set_pointer(state, next);
    if game_complete {
        info!(address = %address, "all available missions completed");
    }

    Ok(CompletionOutcome {
        milestone_id,
        chain_id,
        milestone_txid: receipt.txid,
        reward_txid,
        badge_txid,
        hash: receipt.hash,
        previous_hash,
        timestamp: now,
        reward,
        level,
        chain_completed: completes_chain,
        badge,
        unlocked_chain,
        next_chain_id: state.current_chain_id.clone(),
        next_milestone_id: state.current_milestone_id.clone(),
        game_complete,
    })
}
