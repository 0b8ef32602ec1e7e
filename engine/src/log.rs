use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Intro,
    Info,
    Encounter,
    Mouse,
    CombatWin,
    CombatDraw,
    Death,
    FleeEscape,
    FleeCaught,
    FleeForced,
    BribeAccept,
    BribeReject,
    BribeInsult,
    HiddenTreasure,
    PrincessRescued,
    ItemUse,
    Error,
    Victory,
    Coward,
}

impl LogCategory {
    /// Short bracket tag used when the log is flattened to text.
    pub fn tag(self) -> &'static str {
        match self {
            LogCategory::Intro => "INTRO",
            LogCategory::Info => "INFO",
            LogCategory::Encounter => "ENCOUNTER",
            LogCategory::Mouse => "MOUSE",
            LogCategory::CombatWin => "WIN",
            LogCategory::CombatDraw => "DRAW",
            LogCategory::Death => "DEATH",
            LogCategory::FleeEscape | LogCategory::FleeCaught | LogCategory::FleeForced => "FLEE",
            LogCategory::BribeAccept | LogCategory::BribeReject | LogCategory::BribeInsult => "BRIBE",
            LogCategory::HiddenTreasure => "TREASURE",
            LogCategory::PrincessRescued => "PRINCESS",
            LogCategory::ItemUse => "ITEM",
            LogCategory::Error => "ERROR",
            LogCategory::Victory => "VICTORY",
            LogCategory::Coward => "COWARD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub category: LogCategory,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn to_line(&self) -> String {
        format!("[{}] {}", self.category.tag(), self.message)
    }
}

/// Append-only narrative shown by the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NarrativeLog(Vec<LogEntry>);

impl NarrativeLog {
    pub fn push(&mut self, category: LogCategory, message: impl Into<String>) {
        self.0.push(LogEntry { message: message.into(), category, timestamp: Utc::now() });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.0
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        &self.0[self.0.len().saturating_sub(n)..]
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, category: LogCategory) -> usize {
        self.0.iter().filter(|e| e.category == category).count()
    }
}
