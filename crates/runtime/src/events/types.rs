//! Typed events carried on each topic.

use serde::{Deserialize, Serialize};

use game_core::{ActionKind, PlayerId, StateHash, Winner};

/// Shared-ledger lifecycle: transitions committed or rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerEvent {
    TransitionAccepted {
        actor: PlayerId,
        kind: ActionKind,
        output_hash: StateHash,
        /// Hash-chain length after the commit, genesis entry included.
        chain_len: u64,
    },
    TransitionRejected {
        actor: PlayerId,
        kind: ActionKind,
        reason: String,
    },
}

/// Proof generation lifecycle for one submitted action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProofEvent {
    ProofStarted {
        actor: PlayerId,
        kind: ActionKind,
    },
    ProofGenerated {
        actor: PlayerId,
        kind: ActionKind,
        generation_time_ms: u64,
    },
    ProofFailed {
        actor: PlayerId,
        kind: ActionKind,
        error: String,
    },
}

/// Turn scheduling and per-player view consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    ViewConsumed { player: PlayerId, accepted: bool },
    TurnAdvanced { next: PlayerId },
    GameOver { winner: Winner },
}
