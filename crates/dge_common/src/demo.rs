//! Demo-mode session
//!
//! A demo session lets a player run through the missions with a mocked
//! wallet. It mirrors the progress in its own record (unlocked missions,
//! completed milestones, balance, pending transactions) so a game state
//! can be rebuilt from it, see
//! [`initialize_game_state`](crate::progression::initialize_game_state).

use crate::error::{GameError, GameResult};
use crate::ledger::generate_demo_key;
use crate::progression::CompletionOutcome;
use crate::{SUMMIT_CHAIN_ID, TRAINING_CHAIN_ID, TRAINING_FIRST_MILESTONE_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Balance a new demo session starts with
pub const DEMO_STARTING_BALANCE: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoTxKind {
    Milestone,
    Reward,
    Badge,
}

/// Simulated confirmation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirming,
    Confirmed,
}

impl TxStatus {
    pub fn advance(self) -> Self {
        match self {
            TxStatus::Pending => TxStatus::Confirming,
            TxStatus::Confirming | TxStatus::Confirmed => TxStatus::Confirmed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoTransaction {
    pub txid: String,
    pub kind: DemoTxKind,
    pub status: TxStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// Persisted demo session. Missing fields take their defaults so older
/// or partial records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub enabled: bool,
    pub wif: String,
    pub address: String,
    pub balance: u64,
    pub unlocked_missions: Vec<String>,
    pub completed_milestones: Vec<String>,
    pub transactions: Vec<String>,
    pub pending_transactions: Vec<DemoTransaction>,
    pub timestamps: BTreeMap<String, DateTime<Utc>>,
    pub hashes: BTreeMap<String, String>,
    pub current_chain_id: Option<String>,
    pub current_milestone_id: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            wif: String::new(),
            address: String::new(),
            balance: 0,
            unlocked_missions: vec![TRAINING_CHAIN_ID.to_string(), SUMMIT_CHAIN_ID.to_string()],
            completed_milestones: Vec::new(),
            transactions: Vec::new(),
            pending_transactions: Vec::new(),
            timestamps: BTreeMap::new(),
            hashes: BTreeMap::new(),
            current_chain_id: Some(TRAINING_CHAIN_ID.to_string()),
            current_milestone_id: Some(TRAINING_FIRST_MILESTONE_ID.to_string()),
        }
    }
}

impl DemoConfig {
    /// Start a new demo session with a fresh mocked key
    pub fn enable() -> Self {
        let wif = generate_demo_key();
        info!(address = %wif, "demo mode enabled");
        Self {
            enabled: true,
            address: wif.clone(),
            wif,
            balance: DEMO_STARTING_BALANCE,
            ..Self::default()
        }
    }

    /// Apply a balance change. Disabled sessions ignore it.
    pub fn update_balance(&mut self, delta: i64) -> GameResult<()> {
        if !self.enabled {
            return Ok(());
        }
        let new_balance = self.balance as i128 + delta as i128;
        if new_balance < 0 {
            return Err(GameError::InsufficientBalance {
                needed: delta.unsigned_abs(),
                available: self.balance,
            });
        }
        self.balance = new_balance as u64;
        Ok(())
    }

    pub fn has_balance(&self, amount: u64) -> bool {
        self.enabled && self.balance >= amount
    }

    pub fn is_milestone_completed(&self, milestone_id: &str) -> bool {
        self.enabled && self.completed_milestones.iter().any(|id| id == milestone_id)
    }

    pub fn is_mission_unlocked(&self, chain_id: &str) -> bool {
        self.enabled && self.unlocked_missions.iter().any(|id| id == chain_id)
    }

    /// Returns true when the mission was not unlocked before
    pub fn unlock_mission(&mut self, chain_id: &str) -> bool {
        if !self.enabled || self.unlocked_missions.iter().any(|id| id == chain_id) {
            return false;
        }
        self.unlocked_missions.push(chain_id.to_string());
        true
    }

    pub fn milestone_timestamp(&self, milestone_id: &str) -> Option<DateTime<Utc>> {
        self.timestamps.get(milestone_id).copied()
    }

    pub fn milestone_hash(&self, milestone_id: &str) -> Option<&str> {
        self.hashes.get(milestone_id).map(String::as_str)
    }

    /// Mirror a completed milestone into the session
    pub fn record_completion(&mut self, outcome: &CompletionOutcome) -> GameResult<()> {
        if !self.enabled {
            return Err(GameError::DemoDisabled);
        }
        if self.is_milestone_completed(&outcome.milestone_id) {
            return Err(GameError::AlreadyCompleted(outcome.milestone_id.clone()));
        }

        let pending = |txid: &str, kind, amount| DemoTransaction {
            txid: txid.to_string(),
            kind,
            status: TxStatus::Pending,
            amount,
            timestamp: outcome.timestamp,
        };
        self.pending_transactions
            .push(pending(&outcome.milestone_txid, DemoTxKind::Milestone, None));
        self.pending_transactions.push(pending(
            &outcome.reward_txid,
            DemoTxKind::Reward,
            Some(outcome.reward),
        ));
        if let Some(badge_txid) = &outcome.badge_txid {
            self.pending_transactions
                .push(pending(badge_txid, DemoTxKind::Badge, None));
        }

        self.completed_milestones.push(outcome.milestone_id.clone());
        self.transactions.extend(outcome.txids());
        self.balance = self.balance.saturating_add(outcome.reward);
        self.timestamps
            .insert(outcome.milestone_id.clone(), outcome.timestamp);
        self.hashes
            .insert(outcome.milestone_id.clone(), outcome.hash.clone());

        if let Some(chain_id) = &outcome.unlocked_chain {
            self.unlock_mission(chain_id);
        }
        self.current_chain_id = outcome.next_chain_id.clone();
        self.current_milestone_id = outcome.next_milestone_id.clone();
        Ok(())
    }

    /// Move every pending transaction one confirmation step. Confirmed
    /// transactions leave the pending list and are returned.
    pub fn advance_pending(&mut self) -> Vec<DemoTransaction> {
        let mut confirmed = Vec::new();
        let mut still_pending = Vec::new();
        for mut tx in self.pending_transactions.drain(..) {
            tx.status = tx.status.advance();
            if tx.status == TxStatus::Confirmed {
                confirmed.push(tx);
            } else {
                still_pending.push(tx);
            }
        }
        self.pending_transactions = still_pending;
        confirmed
    }
}
