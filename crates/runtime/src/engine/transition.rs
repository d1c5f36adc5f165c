//! Proof generation for one submitted action.

use tokio::task;

use game_core::{Action, GlobalLedger, LocalView};
use zk::{BackendHandle, CircuitInputs, ProofError, TransitionProof};

use crate::api::{Result, RuntimeError};

/// Output of the proving pipeline, pending acceptance by the session.
#[derive(Clone, Debug)]
pub struct PreparedTransition {
    pub proof: TransitionProof,
    /// Next-ledger contents the prover declares; committed only after the
    /// acting player's own re-verification succeeds.
    pub next_ledger: GlobalLedger,
    pub generation_time_ms: u64,
}

/// Executes the transition constraints and generates the attestation.
///
/// Proving is compute-bound and may take seconds on real backends, so it
/// runs on the blocking pool rather than the async runtime.
pub async fn prove_transition(
    backend: BackendHandle,
    ledger: GlobalLedger,
    view: LocalView,
    action: Action,
) -> Result<PreparedTransition> {
    let prepared = task::spawn_blocking(move || {
        let proving_start = std::time::Instant::now();

        let inputs = CircuitInputs {
            ledger,
            view,
            action,
        };
        let execution = backend.prover().execute(&inputs)?;
        let bytes = backend.prover().generate_proof(&execution.witness)?;
        let proving_time = proving_start.elapsed();

        let proof = backend.package(bytes, execution.declared.public);
        Ok::<_, ProofError>(PreparedTransition {
            proof,
            next_ledger: execution.declared.next_ledger,
            generation_time_ms: proving_time.as_millis() as u64,
        })
    })
    .await
    .map_err(|e| {
        RuntimeError::ProverFailure(ProofError::Generation(format!("proof task failed: {e}")))
    })?
    .map_err(RuntimeError::ProverFailure)?;

    Ok(prepared)
}
