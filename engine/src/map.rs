//! Forest grid generation: start and princess placement, distance-weighted
//! enemy tiers, and connectivity-preserving swamp placement.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Enemy, Tier};
use crate::config::GameConfig;
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// `(row, col)` offset.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub position: Position,
    pub enemy: Enemy,
    pub visited: bool,
    pub cleared: bool,
    pub is_swamp: bool,
    pub is_princess_tile: bool,
    pub is_player_start: bool,
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        !self.is_swamp
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestMap {
    size: usize,
    tiles: Vec<Tile>,
    start: Position,
    princess: Position,
}

impl ForestMap {
    /// Builds a fresh forest. The start and princess tiles stay connected by
    /// non-swamp tiles.
    pub fn generate(config: &GameConfig, catalog: &Catalog, dice: &mut Dice) -> Self {
        let size = config.map_size;
        let start = random_position(dice, size);
        let princess = place_princess(
            dice,
            size,
            start,
            config.min_princess_distance,
            config.princess_attempts,
        );
        let max_distance = max_corner_distance(princess, size);

        let mut tiles = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let position = Position::new(row, col);
                let is_princess_tile = position == princess;
                let enemy = if is_princess_tile {
                    catalog.create_enemy(dice, Tier::SORCERER, true, config.pet_chance)
                } else {
                    let variance = dice.uniform_int(-config.tier_variance, config.tier_variance);
                    let tier =
                        tier_for_distance(position.manhattan(princess), max_distance, variance);
                    catalog.create_enemy(dice, tier, false, config.pet_chance)
                };
                tiles.push(Tile {
                    position,
                    enemy,
                    visited: position == start,
                    cleared: false,
                    is_swamp: false,
                    is_princess_tile,
                    is_player_start: position == start,
                });
            }
        }

        let mut map = Self { size, tiles, start, princess };
        let target = config.swamp_target();
        let placed = map.place_swamps(dice, target);
        debug!(?start, ?princess, placed, target, "generated forest");
        map
    }

    /// A swamp-free forest whose enemies come from `enemy_at`. Used for
    /// hand-built scenarios.
    pub fn with_layout(
        size: usize,
        start: Position,
        princess: Position,
        mut enemy_at: impl FnMut(Position) -> Enemy,
    ) -> Self {
        let tiles = (0..size * size)
            .map(|i| {
                let position = Position::new(i / size, i % size);
                Tile {
                    position,
                    enemy: enemy_at(position),
                    visited: position == start,
                    cleared: false,
                    is_swamp: false,
                    is_princess_tile: position == princess,
                    is_player_start: position == start,
                }
            })
            .collect();
        Self { size, tiles, start, princess }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn princess(&self) -> Position {
        self.princess
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn row(&self, row: usize) -> Option<&[Tile]> {
        let from = row.checked_mul(self.size)?;
        self.tiles.get(from..from + self.size)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if !self.contains(pos) {
            return None;
        }
        self.tiles.get(pos.row * self.size + pos.col)
    }

    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.contains(pos) {
            return None;
        }
        self.tiles.get_mut(pos.row * self.size + pos.col)
    }

    pub fn is_swamp(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|t| t.is_swamp)
    }

    /// Neighbor in `dir`, or `None` when it would leave the grid.
    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = pos.row as i64 + dr;
        let col = pos.col as i64 + dc;
        let limit = self.size as i64;
        if row < 0 || col < 0 || row >= limit || col >= limit {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }

    /// In-bounds, non-swamp neighbors in north/south/west/east order.
    pub fn passable_neighbors(&self, pos: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.step(pos, dir).map(|p| (dir, p)))
            .filter(|&(_, p)| !self.is_swamp(p))
            .collect()
    }

    pub fn passable_positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|t| t.is_passable())
            .map(|t| t.position)
            .collect()
    }

    pub fn swamp_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_swamp).count()
    }

    pub fn is_border(&self, pos: Position) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row + 1 == self.size || pos.col + 1 == self.size
    }

    /// Breadth-first search over 4-neighbors treating swamps as walls.
    pub fn has_path(&self, from: Position, to: Position) -> bool {
        self.shortest_path(from, |p| p == to).is_some()
    }

    /// Shortest passable route from `from` to the first tile satisfying
    /// `goal`, as a list of moves.
    pub fn shortest_path(
        &self,
        from: Position,
        goal: impl Fn(Position) -> bool,
    ) -> Option<Vec<Direction>> {
        if !self.contains(from) {
            return None;
        }
        let mut came_from: Vec<Option<(Position, Direction)>> = vec![None; self.tiles.len()];
        let mut seen = vec![false; self.tiles.len()];
        let mut queue = VecDeque::from([from]);
        seen[self.index(from)] = true;

        while let Some(current) = queue.pop_front() {
            if goal(current) {
                let mut route = Vec::new();
                let mut cursor = current;
                while let Some((prev, dir)) = came_from[self.index(cursor)] {
                    route.push(dir);
                    cursor = prev;
                }
                route.reverse();
                return Some(route);
            }
            for (dir, next) in self.passable_neighbors(current) {
                let idx = self.index(next);
                if !seen[idx] {
                    seen[idx] = true;
                    came_from[idx] = Some((current, dir));
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    fn set_swamp(&mut self, pos: Position, swamp: bool) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.is_swamp = swamp;
        }
    }

    /// Greedy, order-randomized swamp placement. A candidate that would cut
    /// the start off from the princess is reverted.
    fn place_swamps(&mut self, dice: &mut Dice, target: usize) -> usize {
        let (start, princess) = (self.start, self.princess);
        let mut candidates: Vec<Position> = self
            .tiles
            .iter()
            .map(|t| t.position)
            .filter(|&p| p != start && p != princess)
            .collect();
        dice.shuffle(&mut candidates);

        let mut placed = 0;
        for pos in candidates {
            if placed >= target {
                break;
            }
            self.set_swamp(pos, true);
            if self.has_path(start, princess) {
                placed += 1;
            } else {
                self.set_swamp(pos, false);
            }
        }
        placed
    }
}

fn random_position(dice: &mut Dice, size: usize) -> Position {
    let last = size as i64 - 1;
    let row = dice.uniform_int(0, last) as usize;
    let col = dice.uniform_int(0, last) as usize;
    Position::new(row, col)
}

/// Rejection-samples a princess tile at least `min_distance` from `start`.
/// After `attempts` draws the last sample is kept even if it is too close.
pub fn place_princess(
    dice: &mut Dice,
    size: usize,
    start: Position,
    min_distance: usize,
    attempts: u32,
) -> Position {
    let mut pos = start;
    for _ in 0..attempts.max(1) {
        pos = random_position(dice, size);
        if pos != start && pos.manhattan(start) >= min_distance {
            return pos;
        }
    }
    warn!(?start, ?pos, attempts, "princess placement hit the attempt cap");
    pos
}

pub fn max_corner_distance(pos: Position, size: usize) -> usize {
    let last = size.saturating_sub(1);
    [
        Position::new(0, 0),
        Position::new(0, last),
        Position::new(last, 0),
        Position::new(last, last),
    ]
    .into_iter()
    .map(|corner| pos.manhattan(corner))
    .max()
    .unwrap_or(0)
}

/// Closer to the princess means stronger: `round((1 - d/max) * 10) + variance`,
/// clamped to the ladder.
pub fn tier_for_distance(distance: usize, max_distance: usize, variance: i64) -> Tier {
    let normalized = if max_distance == 0 {
        0.0
    } else {
        distance as f64 / max_distance as f64
    };
    let base = ((1.0 - normalized) * 10.0).round() as i64;
    Tier::from_level(base + variance)
}
