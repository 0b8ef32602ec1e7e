use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Exploring,
    Encounter,
    FightInput,
    BribeInput,
    ForcedFight,
    ForcedFightInput,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move,
    EnterTile,
    BeginFight,
    BeginBribe,
    BeginForcedFight,
    CancelInput,
    Fight,
    Flee,
    Bribe,
    UseItem,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Exploring => "exploring",
            Phase::Encounter => "encounter",
            Phase::FightInput => "fight_input",
            Phase::BribeInput => "bribe_input",
            Phase::ForcedFight => "forced_fight",
            Phase::ForcedFightInput => "forced_fight_input",
            Phase::GameOver => "game_over",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::GameOver
    }

    /// Phases in which an enemy is blocking the way.
    pub fn in_encounter(self) -> bool {
        matches!(
            self,
            Phase::Encounter
                | Phase::FightInput
                | Phase::BribeInput
                | Phase::ForcedFight
                | Phase::ForcedFightInput
        )
    }

    pub fn permits(self, action: Action) -> bool {
        use Action::*;
        match self {
            Phase::Start | Phase::GameOver => false,
            Phase::Exploring => matches!(action, Move | EnterTile | UseItem),
            Phase::Encounter => {
                matches!(action, BeginFight | BeginBribe | Fight | Flee | Bribe | UseItem)
            }
            Phase::FightInput => matches!(action, Fight | CancelInput),
            Phase::BribeInput => matches!(action, Bribe | CancelInput),
            Phase::ForcedFight => matches!(action, BeginForcedFight | Fight | UseItem),
            Phase::ForcedFightInput => matches!(action, Fight | CancelInput),
        }
    }

    /// Next phase for the input-gathering actions, whose result does not
    /// depend on a roll. `None` for every other pair.
    pub fn input_transition(self, action: Action) -> Option<Phase> {
        match (self, action) {
            (Phase::Encounter, Action::BeginFight) => Some(Phase::FightInput),
            (Phase::Encounter, Action::BeginBribe) => Some(Phase::BribeInput),
            (Phase::ForcedFight, Action::BeginForcedFight) => Some(Phase::ForcedFightInput),
            (Phase::FightInput | Phase::BribeInput, Action::CancelInput) => Some(Phase::Encounter),
            (Phase::ForcedFightInput, Action::CancelInput) => Some(Phase::ForcedFight),
            _ => None,
        }
    }
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::EnterTile => "enter_tile",
            Action::BeginFight => "begin_fight",
            Action::BeginBribe => "begin_bribe",
            Action::BeginForcedFight => "begin_forced_fight",
            Action::CancelInput => "cancel_input",
            Action::Fight => "fight",
            Action::Flee => "flee",
            Action::Bribe => "bribe",
            Action::UseItem => "use_item",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
