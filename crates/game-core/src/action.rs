//! Player actions and legality validation.
//!
//! Legality is checked against the visibility oracle and ledger state
//! *before* any proof request is issued; the proving backend re-derives the
//! transition but never sees an illegal action.

use serde::{Deserialize, Serialize};

use crate::state::{GlobalLedger, LocalView, PlayerId, Role, SectionId};
use crate::visibility;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    Eliminate,
    Vote,
}

/// A state-changing request from one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step into a section inside the actor's visibility window.
    Move { actor: PlayerId, target: SectionId },
    /// Imposter-only: mark a visible crew member dead.
    Eliminate { actor: PlayerId, target: PlayerId },
    /// Record a ballot against another alive player.
    Vote { actor: PlayerId, ballot: PlayerId },
}

impl Action {
    pub fn actor(&self) -> PlayerId {
        match *self {
            Action::Move { actor, .. }
            | Action::Eliminate { actor, .. }
            | Action::Vote { actor, .. } => actor,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Move { .. } => ActionKind::Move,
            Action::Eliminate { .. } => ActionKind::Eliminate,
            Action::Vote { .. } => ActionKind::Vote,
        }
    }

    /// Numeric target carried into the public-input payload.
    pub fn target_index(&self) -> u16 {
        match *self {
            Action::Move { target, .. } => target.0,
            Action::Eliminate { target, .. } => target.0 as u16,
            Action::Vote { ballot, .. } => ballot.0 as u16,
        }
    }
}

/// Legality violations rejected before the prover is ever invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{0} not present in ledger")]
    UnknownActor(PlayerId),

    #[error("{0} is dead and cannot act")]
    ActorDead(PlayerId),

    #[error("{0} has not committed secrets yet")]
    SecretsNotCommitted(PlayerId),

    #[error("{0} is out of bounds")]
    TargetOutOfBounds(SectionId),

    #[error("{target} is outside {actor}'s visibility window")]
    TargetNotVisible { actor: PlayerId, target: SectionId },

    #[error("unknown target {0}")]
    UnknownTarget(PlayerId),

    #[error("target {0} is already dead")]
    TargetDead(PlayerId),

    #[error("{0} is not an imposter and cannot eliminate")]
    NotAnImposter(PlayerId),

    #[error("cannot eliminate {0}: target shares the imposter role")]
    ProtectedRole(PlayerId),

    #[error("{0} cannot vote for themselves")]
    SelfVote(PlayerId),
}

/// Validates an action against the ledger, the actor's own view, and the
/// assigned roles. Pure; on `Err` nothing downstream runs.
pub fn validate_action(
    action: &Action,
    ledger: &GlobalLedger,
    view: &LocalView,
    roles: &[Role],
    rows: u16,
    cols: u16,
) -> Result<(), ActionError> {
    let actor = action.actor();
    let record = ledger
        .record(actor)
        .ok_or(ActionError::UnknownActor(actor))?;
    if !ledger.is_alive(actor) {
        return Err(ActionError::ActorDead(actor));
    }
    if !ledger.has_committed_secrets(actor) {
        return Err(ActionError::SecretsNotCommitted(actor));
    }

    match *action {
        Action::Move { target, .. } => {
            if target.0 >= rows * cols {
                return Err(ActionError::TargetOutOfBounds(target));
            }
            if !view.visible.contains(&target) {
                return Err(ActionError::TargetNotVisible { actor, target });
            }
        }
        Action::Eliminate { target, .. } => {
            if view.role != Role::Imposter {
                return Err(ActionError::NotAnImposter(actor));
            }
            let target_record = ledger
                .record(target)
                .ok_or(ActionError::UnknownTarget(target))?;
            if !ledger.is_alive(target) {
                return Err(ActionError::TargetDead(target));
            }
            if roles.get(target.index()) == Some(&Role::Imposter) {
                return Err(ActionError::ProtectedRole(target));
            }
            if !visibility::is_visible(record.section, target_record.section, rows, cols) {
                return Err(ActionError::TargetNotVisible {
                    actor,
                    target: target_record.section,
                });
            }
        }
        Action::Vote { ballot, .. } => {
            // Votes are a global deliberation act and are exempt from the
            // visibility gate.
            if ballot == actor {
                return Err(ActionError::SelfVote(actor));
            }
            if ledger.record(ballot).is_none() {
                return Err(ActionError::UnknownTarget(ballot));
            }
            if !ledger.is_alive(ballot) {
                return Err(ActionError::TargetDead(ballot));
            }
        }
    }

    Ok(())
}
