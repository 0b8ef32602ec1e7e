//! Maps player investment and opponent strength to outcome probabilities,
//! then samples one outcome with [`Dice::weighted_choice`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BribeModel, FightModel, FleeTable};
use crate::{clamp, sigmoid, Dice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FightOutcome {
    Win,
    Draw,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleeOutcome {
    Escape,
    Caught,
    ForcedFight,
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BribeOutcome {
    Accept,
    Reject,
    Insult,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FightOdds {
    pub win: f64,
    pub draw: f64,
    pub lose: f64,
}

/// `reject` is a clamped residual; the three need not sum to 1 when
/// `accept + insult > 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BribeOdds {
    pub accept: f64,
    pub reject: f64,
    pub insult: f64,
}

/// Probability masses for spending `energy` against `strength`.
///
/// Draws peak when forces are equal; winning rises with the ratio. A
/// strength of zero is a certain win.
pub fn fight_odds(model: &FightModel, energy: u32, strength: u32) -> FightOdds {
    if strength == 0 {
        return FightOdds { win: 1.0, draw: 0.0, lose: 0.0 };
    }
    let ratio = energy as f64 / strength as f64;
    let offset = ratio - 1.0;
    let sigma = model.draw_sigma;
    let draw = model.draw_peak * (-(offset * offset) / (2.0 * sigma * sigma)).exp();
    let win = (1.0 - draw) * sigmoid(model.win_steepness * offset);
    FightOdds { win, draw, lose: 1.0 - win - draw }
}

pub fn resolve_fight(dice: &mut Dice, model: &FightModel, energy: u32, strength: u32) -> FightOutcome {
    if strength == 0 {
        return FightOutcome::Win;
    }
    let odds = fight_odds(model, energy, strength);
    let outcome = dice
        .weighted_choice(&[
            (odds.win, FightOutcome::Win),
            (odds.draw, FightOutcome::Draw),
            (odds.lose, FightOutcome::Lose),
        ])
        .unwrap_or(FightOutcome::Lose);
    debug!(energy, strength, win = odds.win, draw = odds.draw, ?outcome, "fight resolved");
    outcome
}

/// Flight ignores all state.
pub fn resolve_flee(dice: &mut Dice, table: &FleeTable) -> FleeOutcome {
    let outcome = dice
        .weighted_choice(&[
            (table.escape, FleeOutcome::Escape),
            (table.caught, FleeOutcome::Caught),
            (table.forced_fight, FleeOutcome::ForcedFight),
            (table.killed, FleeOutcome::Killed),
        ])
        .unwrap_or(FleeOutcome::Killed);
    debug!(?outcome, "flee resolved");
    outcome
}

pub fn bribe_odds(model: &BribeModel, gold: u32) -> BribeOdds {
    let gold = gold as f64;
    let accept = model.accept_max * sigmoid(model.accept_steepness * (gold - model.accept_center));
    let insult = model.insult_max * sigmoid(-model.insult_steepness * (gold - model.insult_center));
    let reject = clamp(1.0 - accept - insult, 0.0, 1.0);
    BribeOdds { accept, reject, insult }
}

pub fn resolve_bribe(dice: &mut Dice, model: &BribeModel, gold: u32) -> BribeOutcome {
    let odds = bribe_odds(model, gold);
    let outcome = dice
        .weighted_choice(&[
            (odds.accept, BribeOutcome::Accept),
            (odds.reject, BribeOutcome::Reject),
            (odds.insult, BribeOutcome::Insult),
        ])
        .unwrap_or(BribeOutcome::Insult);
    debug!(gold, accept = odds.accept, insult = odds.insult, ?outcome, "bribe resolved");
    outcome
}
