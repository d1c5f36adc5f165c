//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from legality validation, proving, verification, and
//! worker coordination so clients can bubble them up with consistent
//! context. A rejected transition always maps to exactly one variant.

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ActionError, PlayerId, StateHash, TurnError};
use zk::{ProofError, SchemaError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The action failed legality validation; no proof was requested and no
    /// state changed.
    #[error("illegal action: {0}")]
    InvalidAction(#[from] ActionError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    /// The proving backend could not produce a proof. The pending transition
    /// is discarded and the turn returns to the same actor.
    #[error("proving failed: {0}")]
    ProverFailure(#[source] ProofError),

    #[error("malformed public inputs: {0}")]
    MalformedInputs(#[from] SchemaError),

    /// The proof declares an input state other than the one the consumer
    /// knows. The consumer's state is retained unchanged.
    #[error("continuity mismatch: known {known}, proof declares {declared}")]
    Desync {
        known: StateHash,
        declared: StateHash,
    },

    #[error("proof verification failed for {player}")]
    VerificationFailure { player: PlayerId },

    #[error("invalid session setup: {0}")]
    Setup(String),

    #[error("session initialization failed: {0}")]
    Initialization(#[source] ProofError),

    #[error("session command channel closed")]
    CommandChannelClosed,

    #[error("session reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
