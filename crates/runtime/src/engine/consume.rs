//! Per-consumer acceptance of a proven transition.

use thiserror::Error;

use game_core::{GlobalLedger, LocalView, StateHash};
use zk::{TransitionProof, Verifier, verify_continuity};

/// Why one consumer refused a transition. The consumer's own state is
/// retained unchanged in every error case.
#[derive(Debug, Clone, Error)]
pub enum ConsumeError {
    #[error("known hash {known} does not match declared input {declared}")]
    Desync {
        known: StateHash,
        declared: StateHash,
    },

    #[error("proof verification failed: {0}")]
    Verification(String),
}

/// Runs one consumer's full acceptance pipeline: continuity check, then
/// independent proof re-verification, then folding the next ledger into the
/// view. Returns the (possibly unchanged) view alongside the outcome so the
/// caller can store it back without branching on ownership.
///
/// Re-delivery of an already-consumed transition is a no-op.
pub fn consume(
    verifier: &dyn Verifier,
    proof: &TransitionProof,
    view: LocalView,
    next: &GlobalLedger,
    rows: u16,
    cols: u16,
) -> (LocalView, Result<(), ConsumeError>) {
    if view.last_known_hash == proof.public.declared_output_hash {
        return (view, Ok(()));
    }

    if !verify_continuity(view.last_known_hash, &proof.public) {
        let err = ConsumeError::Desync {
            known: view.last_known_hash,
            declared: proof.public.declared_input_hash,
        };
        return (view, Err(err));
    }

    match verifier.verify(&proof.bytes, &proof.public) {
        Ok(true) => {
            let folded = view.fold(next, proof.public.declared_output_hash, rows, cols);
            (folded, Ok(()))
        }
        Ok(false) => (
            view,
            Err(ConsumeError::Verification(
                "attestation rejected".to_string(),
            )),
        ),
        Err(e) => (view, Err(ConsumeError::Verification(e.to_string()))),
    }
}
