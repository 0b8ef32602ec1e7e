use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("map_size must be between 2 and 64, got {0}")]
    MapSize(usize),
    #[error("{field} must be within [0, 1), got {value}")]
    Ratio { field: &'static str, value: f64 },
    #[error("flee table must sum to 1, got {0}")]
    FleeTable(f64),
    #[error("fight model needs a positive sigma and steepness")]
    FightModel,
    #[error("starting_energy must be positive")]
    StartingEnergy,
}

/// Gaussian draw curve plus sigmoid win curve over the energy/strength ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightModel {
    pub draw_peak: f64,
    pub draw_sigma: f64,
    pub win_steepness: f64,
}

impl Default for FightModel {
    fn default() -> Self {
        Self { draw_peak: 0.45, draw_sigma: 0.38, win_steepness: 5.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BribeModel {
    pub accept_max: f64,
    pub accept_center: f64,
    pub accept_steepness: f64,
    pub insult_max: f64,
    pub insult_center: f64,
    pub insult_steepness: f64,
}

impl Default for BribeModel {
    fn default() -> Self {
        Self {
            accept_max: 0.95,
            accept_center: 60.0,
            accept_steepness: 0.05,
            insult_max: 0.55,
            insult_center: 30.0,
            insult_steepness: 0.06,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleeTable {
    pub escape: f64,
    pub caught: f64,
    pub forced_fight: f64,
    pub killed: f64,
}

impl FleeTable {
    pub fn total(&self) -> f64 {
        self.escape + self.caught + self.forced_fight + self.killed
    }
}

impl Default for FleeTable {
    fn default() -> Self {
        Self { escape: 0.45, caught: 0.30, forced_fight: 0.20, killed: 0.05 }
    }
}

/// Rules of one play-through. Every field falls back to the standard game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GameConfig {
    pub map_size: usize,
    pub swamp_ratio: f64,
    pub min_princess_distance: usize,
    pub princess_attempts: u32,
    pub starting_energy: u32,
    pub hidden_treasure_chance: f64,
    pub pet_chance: f64,
    pub tier_variance: i64,
    pub fight: FightModel,
    pub bribe: BribeModel,
    pub flee: FleeTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_size: 11,
            swamp_ratio: 0.20,
            min_princess_distance: 5,
            princess_attempts: 1000,
            starting_energy: 1000,
            hidden_treasure_chance: 0.10,
            pet_chance: 0.5,
            tier_variance: 1,
            fight: FightModel::default(),
            bribe: BribeModel::default(),
            flee: FleeTable::default(),
        }
    }
}

impl GameConfig {
    /// Loads a JSON or YAML rules file; `.yaml`/`.yml` select YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&text, path)
    }

    /// Parses already-decoded text, picking the format from `path`'s extension.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let cfg: GameConfig = if is_yaml {
            serde_yaml::from_str(text)
                .with_context(|| format!("failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(text)
                .with_context(|| format!("failed to parse JSON config: {}", path.display()))?
        };
        cfg.validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=64).contains(&self.map_size) {
            return Err(ConfigError::MapSize(self.map_size));
        }
        for (field, value) in [
            ("swamp_ratio", self.swamp_ratio),
            ("hidden_treasure_chance", self.hidden_treasure_chance),
            ("pet_chance", self.pet_chance),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::Ratio { field, value });
            }
        }
        let total = self.flee.total();
        if (total - 1.0).abs() > 1e-9 {
            return Err(ConfigError::FleeTable(total));
        }
        if self.fight.draw_sigma <= 0.0 || self.fight.win_steepness <= 0.0 {
            return Err(ConfigError::FightModel);
        }
        if self.starting_energy == 0 {
            return Err(ConfigError::StartingEnergy);
        }
        Ok(())
    }

    pub fn tile_count(&self) -> usize {
        self.map_size * self.map_size
    }

    pub fn swamp_target(&self) -> usize {
        (self.tile_count() as f64 * self.swamp_ratio).floor() as usize
    }
}
