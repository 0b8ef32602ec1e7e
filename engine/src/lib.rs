use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod autopilot;
pub mod catalog;
pub mod config;
pub mod content;
pub mod encounter;
pub mod error;
pub mod leaderboard;
pub mod log;
pub mod map;
pub mod phase;
pub mod player;
pub mod score;
pub mod session;

pub use autopilot::Autopilot;
pub use catalog::{Catalog, Companion, Enemy, HiddenTreasure, Tier, Treasure, TreasureEffect};
pub use config::GameConfig;
pub use encounter::{BribeOutcome, FightOutcome, FleeOutcome};
pub use error::GameError;
pub use leaderboard::{InMemoryLeaderboard, JsonFileLeaderboard, Leaderboard, Period, PlayerIdentity};
pub use log::{LogCategory, LogEntry, NarrativeLog};
pub use map::{Direction, ForestMap, Position, Tile};
pub use phase::{Action, Phase};
pub use player::{KillRecord, Player};
pub use score::{DeathCause, Ending, GameOver, ScoreRecord, ScoreSummary, Title};
pub use session::{
    BribeResult, EntryOutcome, FightReport, FightResult, FleeResult, ItemOutcome, MoveOutcome,
    Session, Victory,
};

/// The single random source threaded through generation and every roll.
///
/// All draws are derived from [`Dice::unit`], so a scripted instance can force
/// any outcome in tests.
#[derive(Clone, Debug)]
pub struct Dice {
    rng: ChaCha8Rng,
    script: VecDeque<f64>,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), script: VecDeque::new() }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy(), script: VecDeque::new() }
    }

    /// Replays `rolls` as unit draws, then continues from a seed-0 generator.
    pub fn from_scripted(rolls: Vec<f64>) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(0), script: rolls.into() }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        match self.script.pop_front() {
            Some(u) => u.clamp(0.0, 1.0 - f64::EPSILON),
            None => self.rng.gen_range(0.0..1.0),
        }
    }

    /// Inclusive uniform integer. Returns `min` when the range is empty.
    pub fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min;
        let offset = (self.unit() * (span + 1) as f64).floor() as i64;
        min + offset.min(span)
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.uniform_int(0, len as i64 - 1) as usize
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.index(items.len());
        items.get(idx)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// In-place Fisher–Yates.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.uniform_int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }

    /// `n` distinct elements in random order. `n` larger than the pool yields the whole pool.
    pub fn sample_without_replacement<T: Clone>(&mut self, items: &[T], n: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        let n = n.min(pool.len());
        for i in 0..n {
            let j = self.uniform_int(i as i64, pool.len() as i64 - 1) as usize;
            pool.swap(i, j);
        }
        pool.truncate(n);
        pool
    }

    /// Cumulative-sum draw over `(probability, value)` pairs.
    ///
    /// Residual mass left by rounding falls through to the last entry.
    pub fn weighted_choice<T: Copy>(&mut self, outcomes: &[(f64, T)]) -> Option<T> {
        let roll = self.unit();
        let mut cumulative = 0.0;
        for &(p, value) in outcomes {
            cumulative += p;
            if roll < cumulative {
                return Some(value);
            }
        }
        outcomes.last().map(|&(_, value)| value)
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}
