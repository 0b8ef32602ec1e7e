use serde::{Deserialize, Serialize};

use crate::catalog::{Enemy, HiddenTreasure};
use crate::map::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRecord {
    pub enemy: Enemy,
    pub treasure_value: u32,
}

/// Ordered hidden treasures. Removal is by index and hands the item back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(Vec<HiddenTreasure>);

impl Inventory {
    pub fn push(&mut self, item: HiddenTreasure) {
        self.0.push(item);
    }

    pub fn take(&mut self, index: usize) -> Option<HiddenTreasure> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Puts a taken item back where it was.
    pub fn restore(&mut self, index: usize, item: HiddenTreasure) {
        let index = index.min(self.0.len());
        self.0.insert(index, item);
    }

    pub fn get(&self, index: usize) -> Option<&HiddenTreasure> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HiddenTreasure> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub energy: u32,
    pub gold: u32,
    pub has_princess: bool,
    pub inventory: Inventory,
    pub kills: Vec<KillRecord>,
}

impl Player {
    pub fn new(position: Position, energy: u32) -> Self {
        Self {
            position,
            energy,
            gold: 0,
            has_princess: false,
            inventory: Inventory::default(),
            kills: Vec::new(),
        }
    }

    /// Clamps the request to `[1, energy]` and deducts it. Callers handle the
    /// zero-energy case before asking.
    pub fn spend_energy(&mut self, requested: i64) -> u32 {
        let spent = requested.clamp(1, self.energy.max(1) as i64) as u32;
        let spent = spent.min(self.energy);
        self.energy -= spent;
        spent
    }

    /// Clamps the request to `[0, gold]` and deducts it.
    pub fn spend_gold(&mut self, requested: i64) -> u32 {
        let spent = requested.clamp(0, self.gold as i64) as u32;
        self.gold -= spent;
        spent
    }

    pub fn record_kill(&mut self, enemy: &Enemy) -> u32 {
        let treasure_value = enemy.treasure_value();
        self.gold += treasure_value;
        self.kills.push(KillRecord { enemy: enemy.clone(), treasure_value });
        treasure_value
    }

    pub fn total_kill_value(&self) -> u32 {
        self.kills.iter().map(|k| k.enemy.total_strength).sum()
    }

    pub fn total_treasure_value(&self) -> u32 {
        self.kills.iter().map(|k| k.treasure_value).sum()
    }
}
