//! Identity and leaderboard collaborators. The core only hands finished
//! score records across this boundary; nothing here is read during play.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::score::ScoreRecord;

pub const ANONYMOUS: &str = "Anonymous";

/// Opaque identity attached to the final score record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub pseudonym: String,
    pub user_id: Option<String>,
}

impl PlayerIdentity {
    pub fn new(pseudonym: impl Into<String>, user_id: Option<String>) -> Self {
        Self { pseudonym: pseudonym.into(), user_id }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Blank pseudonyms read as "Anonymous".
    pub fn pseudonym(&self) -> &str {
        let trimmed = self.pseudonym.trim();
        if trimmed.is_empty() { ANONYMOUS } else { trimmed }
    }
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data is unreadable: {0}")]
    Format(#[from] serde_json::Error),
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
    #[error("the session has not finished")]
    NotFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Week,
    AllTime,
}

impl Period {
    /// Earliest `created_at` included in the period, or `None` for all time.
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let day = match self {
            Period::AllTime => return None,
            Period::Today => today,
            Period::Week => today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN),
        };
        day.and_hms_opt(0, 0, 0).map(|midnight| Utc.from_utc_datetime(&midnight))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub record: ScoreRecord,
    pub created_at: DateTime<Utc>,
}

pub trait Leaderboard {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), LeaderboardError>;

    fn entries(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    fn top(&self, period: Period, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.top_at(period, limit, Utc::now())
    }

    /// Highest scores created inside `period` as seen from `now`.
    fn top_at(
        &self,
        period: Period,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let cutoff = period.cutoff(now);
        let mut entries: Vec<_> = self
            .entries()?
            .into_iter()
            .filter(|e| cutoff.is_none_or(|c| e.created_at >= c))
            .collect();
        entries.sort_by(|a, b| b.record.score.cmp(&a.record.score));
        entries.truncate(limit);
        Ok(entries)
    }

    fn best_for_user(&self, user_id: &str) -> Result<Option<LeaderboardEntry>, LeaderboardError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.record.user_id.as_deref() == Some(user_id))
            .max_by_key(|e| e.record.score))
    }

    /// 1-based rank `score` would take in the top `top_n` of `period`.
    /// Ask before submitting: a free slot counts as a placement.
    fn placement(
        &self,
        score: u32,
        period: Period,
        top_n: usize,
    ) -> Result<Option<usize>, LeaderboardError> {
        let top = self.top(period, top_n)?;
        let position = match top.iter().position(|e| score >= e.record.score) {
            Some(idx) => idx + 1,
            None if top.len() < top_n => top.len() + 1,
            None => return Ok(None),
        };
        Ok((position <= top_n).then_some(position))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }
}

impl Leaderboard for InMemoryLeaderboard {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), LeaderboardError> {
        self.entries.push(LeaderboardEntry { record, created_at: Utc::now() });
        Ok(())
    }

    fn entries(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.entries.clone())
    }
}

/// A JSON array on disk, rewritten atomically (write + rename) on submit.
#[derive(Debug, Clone)]
pub struct JsonFileLeaderboard {
    path: PathBuf,
}

impl JsonFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Leaderboard for JsonFileLeaderboard {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), LeaderboardError> {
        let mut entries = self.entries()?;
        entries.push(LeaderboardEntry { record, created_at: Utc::now() });
        self.write_all(&entries)?;
        debug!(path = %self.path.display(), count = entries.len(), "score saved");
        Ok(())
    }

    fn entries(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
