//! Mission log.
//!
//! Append-only JSONL record of every completed milestone, one file per
//! data directory. Unparseable lines are skipped on read.

use crate::progression::CompletionOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const MISSION_LOG_FILE: &str = "missions.jsonl";

/// One completed milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRecord {
    pub timestamp: DateTime<Utc>,
    pub player: String,
    pub milestone_id: String,
    pub chain_id: String,
    pub xp: u32,
    pub reward: u64,
    pub txids: Vec<String>,
    pub level_after: u32,
    #[serde(default)]
    pub chain_completed: bool,
}

impl MissionRecord {
    pub fn from_outcome(player: &str, outcome: &CompletionOutcome) -> Self {
        Self {
            timestamp: outcome.timestamp,
            player: player.to_string(),
            milestone_id: outcome.milestone_id.clone(),
            chain_id: outcome.chain_id.clone(),
            xp: outcome.level.xp_gained,
            reward: outcome.reward,
            txids: outcome.txids(),
            level_after: outcome.level.level_after,
            chain_completed: outcome.chain_completed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub completions: u64,
    pub total_reward: u64,
    pub total_xp: u64,
    pub chains_completed: usize,
    pub first_completion: Option<DateTime<Utc>>,
    pub last_completion: Option<DateTime<Utc>>,
}

impl MissionSummary {
    pub fn from_records(records: &[MissionRecord]) -> Self {
        let mut summary = Self::default();
        let mut chains = BTreeSet::new();
        for record in records {
            summary.completions += 1;
            summary.total_reward += record.reward;
            summary.total_xp += record.xp as u64;
            if record.chain_completed {
                chains.insert(record.chain_id.as_str());
            }
            summary.first_completion = Some(match summary.first_completion {
                Some(first) => first.min(record.timestamp),
                None => record.timestamp,
            });
            summary.last_completion = Some(match summary.last_completion {
                Some(last) => last.max(record.timestamp),
                None => record.timestamp,
            });
        }
        summary.chains_completed = chains.len();
        summary
    }
}

pub struct MissionLog {
    path: PathBuf,
}

impl MissionLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Log inside a data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(MISSION_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &MissionRecord) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// All records, oldest first
    pub fn read_all(&self) -> std::io::Result<Vec<MissionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(record) = serde_json::from_str::<MissionRecord>(&line) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Records of one player only
    pub fn read_player(&self, player: &str) -> std::io::Result<Vec<MissionRecord>> {
        let mut records = self.read_all()?;
        records.retain(|r| r.player == player);
        Ok(records)
    }

    /// A player's last `limit` records, most recent first
    pub fn read_recent(&self, player: &str, limit: usize) -> std::io::Result<Vec<MissionRecord>> {
        let records = self.read_player(player)?;
        Ok(records.into_iter().rev().take(limit).collect())
    }

    pub fn summary(&self, player: &str) -> std::io::Result<MissionSummary> {
        Ok(MissionSummary::from_records(&self.read_player(player)?))
    }

    /// Drop one player's records (others are kept)
    pub fn remove_player(&self, player: &str) -> std::io::Result<()> {
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| r.player != player);
        if records.len() == before {
            return Ok(());
        }

        let temp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut file = File::create(&temp_path)?;
            for record in &records {
                writeln!(file, "{}", serde_json::to_string(record)?)?;
            }
        }
        fs::rename(&temp_path, &self.path)
    }
}
