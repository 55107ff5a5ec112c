use crate::utils::error::VoteRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const VOTER_ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Candidate {
    John,
    Jane,
}

impl Candidate {
    pub const ALL: [Candidate; 2] = [Candidate::John, Candidate::Jane];

    pub fn as_str(&self) -> &'static str {
        match self {
            Candidate::John => "John",
            Candidate::Jane => "Jane",
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Candidate {
    type Err = VoteRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Candidate::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or(VoteRejection::InvalidCandidate)
    }
}

/// 8 位數 UNO ID，只接受 ASCII 數字
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterId(String);

impl VoterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VoterId {
    type Err = VoteRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == VOTER_ID_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(VoterId(s.to_string()))
        } else {
            Err(VoteRejection::MalformedVoterId)
        }
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally {
    counts: BTreeMap<Candidate, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self {
            counts: Candidate::ALL.into_iter().map(|c| (c, 0)).collect(),
        }
    }

    pub fn get(&self, candidate: Candidate) -> u64 {
        self.counts.get(&candidate).copied().unwrap_or(0)
    }

    pub fn set(&mut self, candidate: Candidate, count: u64) {
        self.counts.insert(candidate, count);
    }

    pub fn increment(&mut self, candidate: Candidate) {
        *self.counts.entry(candidate).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Candidate, u64)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }

    /// 每位候選人一行，例如 "John: 3 votes"
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(candidate, count)| format!("{}: {} votes", candidate, count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the voter record. Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterEntry {
    pub voter_id: String,
    pub candidate: String,
}

impl VoterEntry {
    pub fn new(voter_id: &VoterId, candidate: Candidate) -> Self {
        Self {
            voter_id: voter_id.to_string(),
            candidate: candidate.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub success: bool,
    pub message: String,
    pub rejection: Option<VoteRejection>,
}

impl VoteOutcome {
    pub fn accepted(candidate: Candidate) -> Self {
        Self {
            success: true,
            message: format!("Thank you for voting for {}!", candidate),
            rejection: None,
        }
    }

    pub fn rejected(rejection: VoteRejection) -> Self {
        Self {
            success: false,
            message: rejection.to_string(),
            rejection: Some(rejection),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TallySnapshot {
    pub generated_at: DateTime<Utc>,
    pub counts: Tally,
    pub total: u64,
}

impl From<Tally> for TallySnapshot {
    fn from(counts: Tally) -> Self {
        Self {
            generated_at: Utc::now(),
            total: counts.total(),
            counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// 檔案中的計票結果
    pub tally: Tally,
    /// 由投票者紀錄重建的計票結果
    pub recorded: Tally,
    pub unknown_rows: usize,
    pub repeated_ids: Vec<String>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.tally == self.recorded && self.unknown_rows == 0 && self.repeated_ids.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (candidate, count) in self.tally.iter() {
            lines.push(format!(
                "{}: tally {} / recorded {}",
                candidate,
                count,
                self.recorded.get(candidate)
            ));
        }
        if self.unknown_rows > 0 {
            lines.push(format!("Unrecognized voter rows: {}", self.unknown_rows));
        }
        if !self.repeated_ids.is_empty() {
            lines.push(format!("Repeated UNO IDs: {}", self.repeated_ids.join(", ")));
        }
        lines.push(if self.is_consistent() {
            "Status: consistent".to_string()
        } else {
            "Status: MISMATCH".to_string()
        });
        lines.join("\n")
    }
}
