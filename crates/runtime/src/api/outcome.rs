//! Caller-visible results of an accepted transition.

use game_core::{Phase, PlayerId, StateHash};
use zk::TransitionProof;

/// Per-player result of fanning one accepted transition out to the local
/// views. Failures here are tolerated per player: one player's rejection
/// never rolls back the committed ledger or any other player's view.
#[derive(Clone, Debug)]
pub struct ConsumeReport {
    pub player: PlayerId,
    pub accepted: bool,
    /// Human-readable rejection reason; `None` when accepted.
    pub detail: Option<String>,
}

/// Everything the caller learns from one accepted transition.
#[derive(Clone, Debug)]
pub struct TransitionReceipt {
    /// The attestation consumers re-verified, kept for archival/relay.
    pub proof: TransitionProof,
    /// New head of the ledger's hash chain.
    pub output_hash: StateHash,
    pub generation_time_ms: u64,
    /// One report per player, sorted by player index.
    pub reports: Vec<ConsumeReport>,
    /// Turn phase after termination was evaluated.
    pub phase: Phase,
}
