//! Turn scheduling and termination rules.
//!
//! The machine enforces the single mutation path for the shared ledger: at
//! most one transition is in flight system-wide, and a failed transition
//! returns to the same actor without consuming the turn.

use serde::{Deserialize, Serialize};

use crate::state::{GlobalLedger, PlayerId, Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Crew,
    Imposters,
}

/// Phase of the session-wide turn machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the scheduled player to submit an action.
    AwaitingAction { actor: PlayerId },
    /// A proof is being generated/validated; no other transition may start.
    ProofInFlight { actor: PlayerId },
    /// The transition was accepted; termination is evaluated next.
    Resolved { actor: PlayerId },
    GameOver { winner: Winner },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("it is not {actor}'s turn")]
    NotPlayersTurn { actor: PlayerId },

    #[error("a transition is already in flight")]
    TransitionInFlight,

    #[error("the game is over")]
    GameOver,

    #[error("phase does not permit this operation")]
    InvalidPhase,

    #[error("no alive players left to schedule")]
    NoAlivePlayers,
}

/// Round-robin turn machine over the player list, skipping dead players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMachine {
    phase: Phase,
    player_count: u8,
}

impl TurnMachine {
    pub fn new(player_count: u8) -> Self {
        Self {
            phase: Phase::AwaitingAction {
                actor: PlayerId(0),
            },
            player_count,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `AwaitingAction(actor)` -> `ProofInFlight(actor)`.
    pub fn begin(&mut self, actor: PlayerId) -> Result<(), TurnError> {
        match self.phase {
            Phase::AwaitingAction { actor: expected } if expected == actor => {
                self.phase = Phase::ProofInFlight { actor };
                Ok(())
            }
            Phase::AwaitingAction { .. } => Err(TurnError::NotPlayersTurn { actor }),
            Phase::ProofInFlight { .. } | Phase::Resolved { .. } => {
                Err(TurnError::TransitionInFlight)
            }
            Phase::GameOver { .. } => Err(TurnError::GameOver),
        }
    }

    /// Any failure during proving/validation/consumption: back to the same
    /// actor, no turn consumed.
    pub fn abort(&mut self) -> Result<(), TurnError> {
        match self.phase {
            Phase::ProofInFlight { actor } => {
                self.phase = Phase::AwaitingAction { actor };
                Ok(())
            }
            _ => Err(TurnError::InvalidPhase),
        }
    }

    /// `ProofInFlight(actor)` -> `Resolved(actor)` after the continuity check
    /// and the acting player's own consumption both succeeded.
    pub fn resolve(&mut self) -> Result<PlayerId, TurnError> {
        match self.phase {
            Phase::ProofInFlight { actor } => {
                self.phase = Phase::Resolved { actor };
                Ok(actor)
            }
            _ => Err(TurnError::InvalidPhase),
        }
    }

    /// Evaluates termination and schedules the next alive player.
    ///
    /// Must only be called in `Resolved`; this is the single point where win
    /// conditions are checked.
    pub fn advance(&mut self, ledger: &GlobalLedger, roles: &[Role]) -> Result<Phase, TurnError> {
        let Phase::Resolved { actor } = self.phase else {
            return Err(TurnError::InvalidPhase);
        };

        if let Some(winner) = evaluate_termination(ledger, roles) {
            self.phase = Phase::GameOver { winner };
            return Ok(self.phase);
        }

        let next = next_alive(ledger, actor, self.player_count)
            .ok_or(TurnError::NoAlivePlayers)?;
        self.phase = Phase::AwaitingAction { actor: next };
        Ok(self.phase)
    }
}

/// Win conditions, checked only immediately after a resolved transition.
///
/// Crew win when every item has been collected; imposters win when they are
/// at least as numerous as the alive crew. Collection is checked first since
/// the transition that just resolved may have completed it.
pub fn evaluate_termination(ledger: &GlobalLedger, roles: &[Role]) -> Option<Winner> {
    if ledger.total_items() > 0 && ledger.collected_items() == ledger.total_items() {
        return Some(Winner::Crew);
    }

    let (mut alive_imposters, mut alive_crew) = (0usize, 0usize);
    for player in ledger.alive_players() {
        match roles.get(player.index()) {
            Some(Role::Imposter) => alive_imposters += 1,
            Some(Role::Crew) => alive_crew += 1,
            None => {}
        }
    }
    if alive_imposters >= alive_crew {
        return Some(Winner::Imposters);
    }

    None
}

fn next_alive(ledger: &GlobalLedger, after: PlayerId, player_count: u8) -> Option<PlayerId> {
    (1..=player_count)
        .map(|offset| PlayerId((after.0 + offset) % player_count))
        .find(|&candidate| ledger.is_alive(candidate))
}
