//! A scripted player used by the simulation harness. It only talks to the
//! session through its public operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::catalog::TreasureEffect;
use crate::error::GameError;
use crate::map::{Direction, Position};
use crate::phase::Phase;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Move(Direction),
    EnterTile,
    Fight(i64),
    Bribe(i64),
    Flee,
    UseItem(usize),
}

#[derive(Debug, Error)]
pub enum AutopilotError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("no ending after {0} steps")]
    Stalled(usize),
    #[error("no route out of the forest from {0:?}")]
    Trapped(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Autopilot {
    /// Energy committed per fight as a multiple of enemy strength.
    pub energy_factor: f64,
    /// Drink the elixir when energy drops below this.
    pub heal_below: u32,
    pub max_steps: usize,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { energy_factor: 1.5, heal_below: 200, max_steps: 10_000 }
    }
}

impl Autopilot {
    pub fn new(energy_factor: f64) -> Self {
        Self { energy_factor, ..Self::default() }
    }

    /// Plays until the session ends. Returns the number of decisions taken.
    pub fn play(&self, session: &mut Session) -> Result<usize, AutopilotError> {
        let mut steps = 0;
        while !session.is_over() {
            if steps >= self.max_steps {
                return Err(AutopilotError::Stalled(steps));
            }
            let decision = self
                .decide(session)
                .ok_or(AutopilotError::Trapped(session.player().position))?;
            trace!(?decision, phase = %session.phase(), "autopilot");
            self.apply(session, decision)?;
            steps += 1;
        }
        Ok(steps)
    }

    pub fn fight_cost(&self, strength: u32) -> i64 {
        ((strength as f64 * self.energy_factor).ceil() as i64).max(1)
    }

    /// `None` when no move can make progress and no item can help.
    pub fn decide(&self, session: &Session) -> Option<Decision> {
        let player = session.player();
        let item = |effect: TreasureEffect| player.inventory.iter().position(|t| t.effect == effect);

        let Some(enemy) = session.active_enemy() else {
            if session.current_tile().is_some_and(|t| !t.cleared) {
                return Some(Decision::EnterTile);
            }
            if player.energy < self.heal_below {
                if let Some(idx) = item(TreasureEffect::FullHeal) {
                    return Some(Decision::UseItem(idx));
                }
            }
            return self
                .next_direction(session)
                .map(Decision::Move)
                .or_else(|| item(TreasureEffect::Teleport).map(Decision::UseItem))
                .or_else(|| item(TreasureEffect::SelfDestruct).map(Decision::UseItem));
        };

        let cost = self.fight_cost(enemy.total_strength);
        let affordable = cost <= player.energy as i64;
        match session.phase() {
            Phase::BribeInput => return Some(Decision::Bribe(player.gold as i64)),
            Phase::FightInput | Phase::ForcedFightInput => return Some(Decision::Fight(cost)),
            _ => {}
        }

        if enemy.is_princess_captor || !affordable {
            if let Some(idx) = item(TreasureEffect::InstantKill) {
                return Some(Decision::UseItem(idx));
            }
        }
        if enemy.has_dragon() {
            if let Some(idx) = item(TreasureEffect::DragonKill) {
                return Some(Decision::UseItem(idx));
            }
        }
        if !affordable {
            if let Some(idx) = item(TreasureEffect::FullHeal) {
                return Some(Decision::UseItem(idx));
            }
            if session.phase() == Phase::Encounter && player.gold > 0 {
                return Some(Decision::Bribe(player.gold as i64));
            }
        }
        Some(Decision::Fight(cost))
    }

    /// Toward the princess, then toward the closest edge and out.
    fn next_direction(&self, session: &Session) -> Option<Direction> {
        let map = session.map();
        let here = session.player().position;
        let princess = map.princess();

        let to_border = || map.shortest_path(here, |p| map.is_border(p));
        let route = if session.player().has_princess || here == princess {
            to_border()
        } else {
            map.shortest_path(here, |p| p == princess).or_else(to_border)
        };
        route.and_then(|route| {
            route.first().copied().or_else(|| {
                Direction::ALL
                    .into_iter()
                    .find(|&dir| map.step(here, dir).is_none())
            })
        })
    }

    pub fn apply(&self, session: &mut Session, decision: Decision) -> Result<(), GameError> {
        match decision {
            Decision::Move(dir) => session.move_player(dir).map(drop),
            Decision::EnterTile => session.enter_current_tile().map(drop),
            Decision::Fight(energy) => session.fight(energy).map(drop),
            Decision::Bribe(gold) => session.bribe(gold).map(drop),
            Decision::Flee => session.flee().map(drop),
            Decision::UseItem(idx) => session.use_item(idx).map(drop),
        }
    }
}
