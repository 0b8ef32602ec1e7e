use std::fmt;

use serde::{Deserialize, Serialize};

use crate::leaderboard::PlayerIdentity;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    Victory,
    Coward,
    DeathWithPrincess,
    DeathWithoutPrincess,
}

impl Ending {
    pub fn death(has_princess: bool) -> Self {
        if has_princess {
            Ending::DeathWithPrincess
        } else {
            Ending::DeathWithoutPrincess
        }
    }

    pub fn is_death(self) -> bool {
        matches!(self, Ending::DeathWithPrincess | Ending::DeathWithoutPrincess)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ending::Victory => "victory",
            Ending::Coward => "coward",
            Ending::DeathWithPrincess => "death_with_princess",
            Ending::DeathWithoutPrincess => "death_without_princess",
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Combat,
    Flee,
    Pill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Title {
    #[serde(rename = "Lost Wanderer")]
    LostWanderer,
    #[serde(rename = "Novice Adventurer")]
    NoviceAdventurer,
    #[serde(rename = "Seasoned Hunter")]
    SeasonedHunter,
    #[serde(rename = "Valiant Warrior")]
    ValiantWarrior,
    #[serde(rename = "Forest Hero")]
    ForestHero,
    #[serde(rename = "Legend")]
    Legend,
}

impl Title {
    pub fn for_score(score: u32) -> Self {
        match score {
            1000.. => Title::Legend,
            700.. => Title::ForestHero,
            400.. => Title::ValiantWarrior,
            200.. => Title::SeasonedHunter,
            100.. => Title::NoviceAdventurer,
            _ => Title::LostWanderer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Title::Legend => "Legend",
            Title::ForestHero => "Forest Hero",
            Title::ValiantWarrior => "Valiant Warrior",
            Title::SeasonedHunter => "Seasoned Hunter",
            Title::NoviceAdventurer => "Novice Adventurer",
            Title::LostWanderer => "Lost Wanderer",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// score = gold held + total strength of everything killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub score: u32,
    pub title: Title,
    pub total_gold: u32,
    pub total_kill_value: u32,
    pub total_treasure_value: u32,
    pub kills_count: usize,
    pub has_princess: bool,
    pub energy: u32,
}

impl ScoreSummary {
    pub fn from_player(player: &Player) -> Self {
        let total_kill_value = player.total_kill_value();
        let score = player.gold + total_kill_value;
        Self {
            score,
            title: Title::for_score(score),
            total_gold: player.gold,
            total_kill_value,
            total_treasure_value: player.total_treasure_value(),
            kills_count: player.kills.len(),
            has_princess: player.has_princess,
            energy: player.energy,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOver {
    pub ending: Ending,
    pub cause: Option<DeathCause>,
    pub killed_by: Option<String>,
    pub summary: ScoreSummary,
}

/// What the leaderboard collaborator receives at a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub score: u32,
    pub title: Title,
    pub total_gold: u32,
    pub total_kill_value: u32,
    pub has_princess: bool,
    pub kills_count: usize,
    pub ending: Ending,
    pub pseudonym: String,
    pub user_id: Option<String>,
}

impl ScoreRecord {
    pub fn new(summary: &ScoreSummary, ending: Ending, identity: &PlayerIdentity) -> Self {
        Self {
            score: summary.score,
            title: summary.title,
            total_gold: summary.total_gold,
            total_kill_value: summary.total_kill_value,
            has_princess: summary.has_princess,
            kills_count: summary.kills_count,
            ending,
            pseudonym: identity.pseudonym().to_string(),
            user_id: identity.user_id.clone(),
        }
    }
}
