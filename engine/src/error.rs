use thiserror::Error;

use crate::map::Position;
use crate::phase::{Action, Phase};

/// Rejected Game Controller calls. Gameplay branches such as death are
/// results, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,
    #[error("cannot {action} while {phase}")]
    ActionNotAllowed { phase: Phase, action: Action },
    #[error("no active encounter in phase {0}")]
    NoEncounter(Phase),
    #[error("position {0:?} is outside the forest")]
    OffMap(Position),
}
