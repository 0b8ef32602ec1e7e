//! Static enemy, adjective and treasure tables, and the constructors that
//! assemble concrete enemies from them.

use std::{collections::HashSet, fs, path::Path};

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{builtin_catalogs, DEFAULT_LOCALE};
use crate::Dice;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no built-in catalog for locale '{0}'")]
    UnknownLocale(String),
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected 11 enemy tiers with strengths 0, 10, ..., 100")]
    EnemyLadder,
    #[error("catalog needs at least two distinct adjectives")]
    Adjectives,
    #[error("treasure ladder is empty")]
    Treasures,
    #[error("hidden treasure '{0}' is defined twice")]
    DuplicateHiddenTreasure(String),
    #[error("expected exactly one hidden treasure with effect {0:?}")]
    HiddenEffect(TreasureEffect),
    #[error("name pattern must mention {{name}}")]
    NamePattern,
    #[error("{0} is not an enemy tier")]
    NotATier(u32),
}

/// One of the eleven strength levels. Serialized as its strength (0..=100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct Tier(u8);

impl Tier {
    pub const MAX_LEVEL: u8 = 10;
    pub const MOUSE: Tier = Tier(0);
    pub const DRAGON: Tier = Tier(9);
    pub const SORCERER: Tier = Tier(10);

    /// Clamps `level` into `0..=10`.
    pub fn from_level(level: i64) -> Self {
        Tier(level.clamp(0, Self::MAX_LEVEL as i64) as u8)
    }

    pub fn level(self) -> usize {
        self.0 as usize
    }

    pub fn strength(self) -> u32 {
        self.0 as u32 * 10
    }

    pub fn is_mouse(self) -> bool {
        self == Self::MOUSE
    }
}

impl From<Tier> for u32 {
    fn from(tier: Tier) -> u32 {
        tier.strength()
    }
}

impl TryFrom<u32> for Tier {
    type Error = CatalogError;

    fn try_from(strength: u32) -> Result<Self, Self::Error> {
        if strength % 10 == 0 && strength <= 100 {
            Ok(Tier((strength / 10) as u8))
        } else {
            Err(CatalogError::NotATier(strength))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub strength: u32,
    pub name: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasure {
    pub value: u32,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasureEffect {
    InstantKill,
    DragonKill,
    Teleport,
    SelfDestruct,
    FullHeal,
}

impl TreasureEffect {
    pub const ALL: [TreasureEffect; 5] = [
        TreasureEffect::InstantKill,
        TreasureEffect::DragonKill,
        TreasureEffect::Teleport,
        TreasureEffect::SelfDestruct,
        TreasureEffect::FullHeal,
    ];

    /// Effects that need an enemy to act on.
    pub fn needs_encounter(self) -> bool {
        matches!(self, TreasureEffect::InstantKill | TreasureEffect::DragonKill)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenTreasure {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub effect: TreasureEffect,
}

/// The pet that travels with a sorcerer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    pub tier: Tier,
    pub name: String,
    pub icon: String,
    pub adjectives: Vec<String>,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub tier: Tier,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub adjectives: Vec<String>,
    pub full_name: String,
    pub pet: Option<Companion>,
    pub total_strength: u32,
    pub treasure: Option<Treasure>,
    pub is_princess_captor: bool,
    pub defeated: bool,
}

impl Enemy {
    /// True when the enemy or its pet is a dragon.
    pub fn has_dragon(&self) -> bool {
        self.tier == Tier::DRAGON || self.pet.as_ref().is_some_and(|p| p.tier == Tier::DRAGON)
    }

    pub fn treasure_value(&self) -> u32 {
        self.treasure.as_ref().map_or(0, |t| t.value)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    name_pattern: String,
    enemies: Vec<EnemyTemplate>,
    adjectives: Vec<String>,
    treasures: Vec<Treasure>,
    hidden_treasures: Vec<HiddenTreasure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub name_pattern: String,
    pub enemies: Vec<EnemyTemplate>,
    pub adjectives: Vec<String>,
    pub treasures: Vec<Treasure>,
    pub hidden_treasures: IndexMap<String, HiddenTreasure>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::builtin_locale(DEFAULT_LOCALE)
    }

    pub fn builtin_locale(locale: &str) -> Result<Self, CatalogError> {
        let catalogs = builtin_catalogs();
        let text = catalogs
            .get(locale)
            .ok_or_else(|| CatalogError::UnknownLocale(locale.to_string()))?;
        Self::from_json_str(text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Self::from_file(file)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog: {}", path.display()))?;
        let catalog = Self::from_json_str(&text)
            .with_context(|| format!("failed to load catalog: {}", path.display()))?;
        Ok(catalog)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let ladder_ok = file.enemies.len() == Tier::MAX_LEVEL as usize + 1
            && file
                .enemies
                .iter()
                .enumerate()
                .all(|(i, e)| e.strength == i as u32 * 10);
        if !ladder_ok {
            return Err(CatalogError::EnemyLadder);
        }
        let distinct: HashSet<_> = file.adjectives.iter().collect();
        if distinct.len() < 2 || distinct.len() != file.adjectives.len() {
            return Err(CatalogError::Adjectives);
        }
        if file.treasures.is_empty() {
            return Err(CatalogError::Treasures);
        }
        if !file.name_pattern.contains("{name}") {
            return Err(CatalogError::NamePattern);
        }

        let mut hidden = IndexMap::new();
        for item in file.hidden_treasures {
            if hidden.contains_key(&item.id) {
                return Err(CatalogError::DuplicateHiddenTreasure(item.id));
            }
            hidden.insert(item.id.clone(), item);
        }
        for effect in TreasureEffect::ALL {
            if hidden.values().filter(|h| h.effect == effect).count() != 1 {
                return Err(CatalogError::HiddenEffect(effect));
            }
        }

        Ok(Self {
            name_pattern: file.name_pattern,
            enemies: file.enemies,
            adjectives: file.adjectives,
            treasures: file.treasures,
            hidden_treasures: hidden,
        })
    }

    pub fn template(&self, tier: Tier) -> &EnemyTemplate {
        &self.enemies[tier.level()]
    }

    pub fn hidden_treasure(&self, effect: TreasureEffect) -> Option<&HiddenTreasure> {
        self.hidden_treasures.values().find(|h| h.effect == effect)
    }

    /// Assembles "name + two adjectives" according to the catalog's pattern.
    pub fn full_name(&self, name: &str, adjectives: &[String]) -> String {
        match adjectives {
            [first, second, ..] => self
                .name_pattern
                .replace("{name}", name)
                .replace("{adj1}", first)
                .replace("{adj2}", second),
            _ => name.to_string(),
        }
    }

    fn roll_adjectives(&self, dice: &mut Dice) -> Vec<String> {
        dice.sample_without_replacement(&self.adjectives, 2)
    }

    fn companion(&self, dice: &mut Dice, tier: Tier) -> Companion {
        let template = self.template(tier);
        let adjectives = self.roll_adjectives(dice);
        Companion {
            tier,
            name: template.name.clone(),
            icon: template.icon.clone(),
            full_name: self.full_name(&template.name, &adjectives),
            adjectives,
        }
    }

    /// Builds a fully formed enemy for `tier`.
    ///
    /// A princess captor is always a sorcerer with a dragon and carries no
    /// treasure. Other sorcerers get a random pet (tiers 10..=90) with
    /// probability `pet_chance`.
    pub fn create_enemy(
        &self,
        dice: &mut Dice,
        tier: Tier,
        is_princess_captor: bool,
        pet_chance: f64,
    ) -> Enemy {
        let tier = if is_princess_captor { Tier::SORCERER } else { tier };
        let template = self.template(tier);
        let adjectives = if tier.is_mouse() {
            Vec::new()
        } else {
            self.roll_adjectives(dice)
        };
        let full_name = self.full_name(&template.name, &adjectives);

        let pet = if is_princess_captor {
            Some(self.companion(dice, Tier::DRAGON))
        } else if tier == Tier::SORCERER && dice.chance(pet_chance) {
            let pet_tier = Tier::from_level(dice.uniform_int(1, Tier::DRAGON.level() as i64));
            Some(self.companion(dice, pet_tier))
        } else {
            None
        };
        let total_strength = tier.strength() + pet.as_ref().map_or(0, |p| p.tier.strength());

        let treasure = if is_princess_captor {
            None
        } else {
            dice.choose(&self.treasures).cloned()
        };

        Enemy {
            tier,
            name: template.name.clone(),
            icon: template.icon.clone(),
            description: template.description.clone(),
            adjectives,
            full_name,
            pet,
            total_strength,
            treasure,
            is_princess_captor,
            defeated: false,
        }
    }

    /// With probability `chance`, a uniformly chosen hidden treasure.
    pub fn roll_hidden_treasure(&self, dice: &mut Dice, chance: f64) -> Option<HiddenTreasure> {
        if !dice.chance(chance) {
            return None;
        }
        let idx = dice.index(self.hidden_treasures.len());
        self.hidden_treasures.get_index(idx).map(|(_, item)| item.clone())
    }
}
