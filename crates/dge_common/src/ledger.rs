//! Mocked ledger client.
//!
//! Milestone completions, rewards and badges are "recorded" by a
//! [`LedgerClient`]. The only implementation fabricates transaction ids
//! and keeps a journal of the OP_RETURN-style payloads it would have
//! broadcast. No transaction is built, signed or sent.

use crate::error::{GameError, GameResult};
use crate::model::Milestone;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Prefix marking mocked wallet keys
pub const DEMO_KEY_PREFIX: &str = "demo_";

/// Balance reported for a loaded demo key
pub const DEMO_KEY_BALANCE: u64 = 10_000;

/// Txid prefix used by the simulated ledger
pub const SIMULATED_TX_PREFIX: &str = "demo_tx";

/// Result of recording a milestone completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneReceipt {
    pub txid: String,
    pub hash: String,
}

/// Ledger operations the progression engine relies on
pub trait LedgerClient {
    /// Record a milestone completion linked to the previous hash
    fn record_milestone(
        &mut self,
        milestone: &Milestone,
        player_address: &str,
        previous_hash: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> GameResult<MilestoneReceipt>;

    /// Pay the milestone reward to the player
    fn send_reward(
        &mut self,
        milestone: &Milestone,
        player_address: &str,
        timestamp: DateTime<Utc>,
    ) -> GameResult<String>;

    /// Record a badge award
    fn award_badge(
        &mut self,
        badge: &str,
        player_address: &str,
        timestamp: DateTime<Utc>,
    ) -> GameResult<String>;
}

/// Fields hashed for a milestone completion, in hashing order
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashPayload<'a> {
    milestone_id: &'a str,
    player_address: &'a str,
    timestamp: String,
    previous_hash: &'a str,
}

/// Hash linking a milestone completion to the previous one.
///
/// SHA-256 over the compact JSON `{milestoneId, playerAddress, timestamp,
/// previousHash}` in that key order; a missing previous hash is written as
/// `"0"`.
pub fn milestone_hash(
    milestone_id: &str,
    player_address: &str,
    timestamp: &DateTime<Utc>,
    previous_hash: Option<&str>,
) -> GameResult<String> {
    let payload = HashPayload {
        milestone_id,
        player_address,
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        previous_hash: previous_hash.unwrap_or("0"),
    };
    let json = serde_json::to_string(&payload)?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

/// Data the ledger would have embedded in the transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerPayload {
    MilestoneCompletion {
        milestone_id: String,
        player_address: String,
        hash: String,
        previous_hash: String,
        timestamp: DateTime<Utc>,
    },
    MilestoneReward {
        milestone_id: String,
        recipient: String,
        reward: u64,
        timestamp: DateTime<Utc>,
    },
    BadgeAward {
        badge: String,
        player_address: String,
        timestamp: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub txid: String,
    pub payload: LedgerPayload,
}

/// Ledger that fabricates identifiers instead of broadcasting
#[derive(Debug, Clone)]
pub struct SimulatedLedger {
    prefix: String,
    journal: Vec<LedgerEntry>,
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new(SIMULATED_TX_PREFIX)
    }
}

impl SimulatedLedger {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            journal: Vec::new(),
        }
    }

    /// Everything "broadcast" so far, oldest first
    pub fn journal(&self) -> &[LedgerEntry] {
        &self.journal
    }

    fn next_txid(&self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let nonce: u64 = rand::thread_rng().gen();
        format!("{}_{}_{}", self.prefix, to_base36(millis), to_base36(nonce))
    }

    fn push(&mut self, payload: LedgerPayload) -> String {
        let txid = self.next_txid();
        debug!(txid = %txid, "simulated ledger entry");
        self.journal.push(LedgerEntry {
            txid: txid.clone(),
            payload,
        });
        txid
    }
}

impl LedgerClient for SimulatedLedger {
    fn record_milestone(
        &mut self,
        milestone: &Milestone,
        player_address: &str,
        previous_hash: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> GameResult<MilestoneReceipt> {
        let hash = milestone_hash(&milestone.id, player_address, &timestamp, previous_hash)?;
        let txid = self.push(LedgerPayload::MilestoneCompletion {
            milestone_id: milestone.id.clone(),
            player_address: player_address.to_string(),
            hash: hash.clone(),
            previous_hash: previous_hash.unwrap_or("0").to_string(),
            timestamp,
        });
        Ok(MilestoneReceipt { txid, hash })
    }

    fn send_reward(
        &mut self,
        milestone: &Milestone,
        player_address: &str,
        timestamp: DateTime<Utc>,
    ) -> GameResult<String> {
        Ok(self.push(LedgerPayload::MilestoneReward {
            milestone_id: milestone.id.clone(),
            recipient: player_address.to_string(),
            reward: milestone.reward,
            timestamp,
        }))
    }

    fn award_badge(
        &mut self,
        badge: &str,
        player_address: &str,
        timestamp: DateTime<Utc>,
    ) -> GameResult<String> {
        Ok(self.push(LedgerPayload::BadgeAward {
            badge: badge.to_string(),
            player_address: player_address.to_string(),
            timestamp,
        }))
    }
}

/// A wallet key accepted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedKey {
    pub address: String,
    pub balance: u64,
}

/// Fresh mocked wallet key
pub fn generate_demo_key() -> String {
    let nonce: u64 = rand::thread_rng().gen();
    format!("{}{}", DEMO_KEY_PREFIX, to_base36(nonce))
}

pub fn is_demo_key(wif: &str) -> bool {
    wif.starts_with(DEMO_KEY_PREFIX)
}

/// Load a wallet key. Only mocked `demo_` keys are supported; the key
/// doubles as the player address.
pub fn load_key(wif: &str) -> GameResult<LoadedKey> {
    let wif = wif.trim();
    if wif.is_empty() {
        return Err(GameError::InvalidKey("empty key".to_string()));
    }
    if !is_demo_key(wif) {
        return Err(GameError::InvalidKey(
            "only demo keys are supported".to_string(),
        ));
    }
    Ok(LoadedKey {
        address: wif.to_string(),
        balance: DEMO_KEY_BALANCE,
    })
}

pub(crate) fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_milestone_hash_is_deterministic() {
        let a = milestone_hash("m1", "demo_abc", &ts(), None).unwrap();
        let b = milestone_hash("m1", "demo_abc", &ts(), None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        // Missing previous hash is the same as "0"
        assert_eq!(a, milestone_hash("m1", "demo_abc", &ts(), Some("0")).unwrap());
        assert_ne!(a, milestone_hash("m1", "demo_abc", &ts(), Some(&a)).unwrap());
        assert_ne!(a, milestone_hash("m2", "demo_abc", &ts(), None).unwrap());
    }

    #[test]
    fn test_milestone_hash_known_answer() {
        // sha256 of {"milestoneId":"m1","playerAddress":"demo_abc","timestamp":"2026-03-01T12:00:00.000Z","previousHash":"0"}
        assert_eq!(
            milestone_hash("m1", "demo_abc", &ts(), None).unwrap(),
            "adb2cc43f3c05df8f214b61199e1ecfa9fca41015984601fa6fe6db2d256591c"
        );
    }

    #[test]
    fn test_simulated_ledger_journal() {
        let catalog = Catalog::builtin().unwrap();
        let (_, milestone) = catalog.find_milestone("dge-training-1").unwrap();
        let mut ledger = SimulatedLedger::default();

        let receipt = ledger
            .record_milestone(milestone, "demo_abc", None, ts())
            .unwrap();
        let reward_txid = ledger.send_reward(milestone, "demo_abc", ts()).unwrap();

        assert!(receipt.txid.starts_with("demo_tx_"));
        assert_ne!(receipt.txid, reward_txid);
        assert_eq!(ledger.journal().len(), 2);

        match &ledger.journal()[1].payload {
            LedgerPayload::MilestoneReward { reward, .. } => assert_eq!(*reward, 1000),
            other => panic!("unexpected payload {:?}", other),
        }

        let json = serde_json::to_value(&ledger.journal()[0].payload).unwrap();
        assert_eq!(json["type"], "milestone_completion");
        assert_eq!(json["previous_hash"], "0");
    }

    #[test]
    fn test_load_key() {
        let key = generate_demo_key();
        assert!(is_demo_key(&key));
        let loaded = load_key(&key).unwrap();
        assert_eq!(loaded.address, key);
        assert_eq!(loaded.balance, DEMO_KEY_BALANCE);

        assert!(matches!(load_key("   "), Err(GameError::InvalidKey(_))));
        assert!(matches!(
            load_key("L1aW4aubDFB7yfras2S1mN3bqg9nwySY8nkoLmJebSLD5BWv3ENZ"),
            Err(GameError::InvalidKey(_))
        ));
    }
}
