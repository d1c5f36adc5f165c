//! Public-input schema for transition proofs.
//!
//! Public inputs travel with every proof as a tagged structured record, not
//! an untyped blob. Range validation happens before the payload reaches the
//! continuity check.

use serde::{Deserialize, Serialize};

use game_core::{Action, ActionKind, PlayerId, SectionId, StateHash};

/// Schema violations in a proof's public-input vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("payload actor index {actor} exceeds player count {player_count}")]
    ActorOutOfRange { actor: u8, player_count: u8 },

    #[error("payload target {target} for {kind} exceeds limit {limit}")]
    TargetOutOfRange {
        kind: ActionKind,
        target: u16,
        limit: u16,
    },
}

/// The move payload portion of the public inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub actor: u8,
    pub kind: ActionKind,
    /// Section index for moves; player index for eliminations and votes.
    pub target: u16,
}

impl From<&Action> for ActionPayload {
    fn from(action: &Action) -> Self {
        Self {
            actor: action.actor().0,
            kind: action.kind(),
            target: action.target_index(),
        }
    }
}

impl ActionPayload {
    /// Checks every numeric field against its declared range.
    pub fn validate(&self, player_count: u8, section_count: u16) -> Result<(), SchemaError> {
        if self.actor >= player_count {
            return Err(SchemaError::ActorOutOfRange {
                actor: self.actor,
                player_count,
            });
        }

        let limit = match self.kind {
            ActionKind::Move => section_count,
            ActionKind::Eliminate | ActionKind::Vote => player_count as u16,
        };
        if self.target >= limit {
            return Err(SchemaError::TargetOutOfRange {
                kind: self.kind,
                target: self.target,
                limit,
            });
        }

        Ok(())
    }

    /// Reconstructs the typed action this payload describes.
    pub fn to_action(&self) -> Action {
        let actor = PlayerId(self.actor);
        match self.kind {
            ActionKind::Move => Action::Move {
                actor,
                target: SectionId(self.target),
            },
            ActionKind::Eliminate => Action::Eliminate {
                actor,
                target: PlayerId(self.target as u8),
            },
            ActionKind::Vote => Action::Vote {
                actor,
                ballot: PlayerId(self.target as u8),
            },
        }
    }
}

/// Public inputs bound into every transition proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// Hash of the ledger the prover claims to have started from.
    pub declared_input_hash: StateHash,
    /// Hash of the ledger the prover claims the transition produces.
    pub declared_output_hash: StateHash,
    pub payload: ActionPayload,
}

impl PublicInputs {
    pub fn validate(&self, player_count: u8, section_count: u16) -> Result<(), SchemaError> {
        self.payload.validate(player_count, section_count)
    }
}
