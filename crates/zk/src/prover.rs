//! Collaborator traits for proving, verification, and secret commitment.
//!
//! All backends implement these traits to provide a consistent API. The rest
//! of the workspace treats proof bytes as opaque and re-verifies them
//! independently per consumer; a producer's claim of validity is never
//! trusted transitively.

use serde::{Deserialize, Serialize};

use game_core::{Action, ApplyError, GlobalLedger, LocalView, PlayerId, SecretMaterial};

use crate::inputs::{PublicInputs, SchemaError};

/// Errors raised by proving backends.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("circuit execution failed: {0}")]
    Execution(String),

    #[error("proof generation failed: {0}")]
    Generation(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("illegal transition: {0}")]
    IllegalTransition(#[from] ApplyError),

    #[error("malformed circuit inputs: {0}")]
    MalformedInputs(#[from] SchemaError),

    #[error("secrets for {0} already committed")]
    AlreadyCommitted(PlayerId),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

/// Identifies which proving backend generated a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofBackend {
    /// Deterministic in-process backend; binds proofs to public inputs by
    /// hashing. No zero-knowledge property, intended for co-located sessions
    /// and tests.
    Local,
}

/// Everything the prover needs to execute the transition constraints:
/// the input ledger, the actor's private view, and the requested action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitInputs {
    pub ledger: GlobalLedger,
    pub view: LocalView,
    pub action: Action,
}

/// Opaque witness produced by circuit execution, consumed by proof
/// generation. Callers never inspect the bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Witness(pub(crate) Vec<u8>);

impl Witness {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the prover declares after executing the constraints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclaredOutputs {
    /// Resulting next-ledger contents: the actor's record updated, all other
    /// records unchanged, output hash appended to the chain.
    pub next_ledger: GlobalLedger,
    pub public: PublicInputs,
}

/// Result of executing the constraint circuit.
#[derive(Clone, Debug)]
pub struct Execution {
    pub witness: Witness,
    pub declared: DeclaredOutputs,
}

/// One accepted attestation: proof bytes plus the public-input vector that
/// every consumer re-verifies independently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionProof {
    pub bytes: Vec<u8>,
    pub backend: ProofBackend,
    pub public: PublicInputs,
}

/// Proof generation interface.
pub trait Prover: Send + Sync {
    /// Runs the transition constraints over the inputs, producing a witness
    /// and the declared outputs. Fails on malformed input or an internal
    /// circuit error; no state is touched on failure.
    fn execute(&self, inputs: &CircuitInputs) -> Result<Execution, ProofError>;

    /// Generates the attestation bytes from an executed witness.
    fn generate_proof(&self, witness: &Witness) -> Result<Vec<u8>, ProofError>;
}

/// Proof verification interface. Deterministic and side-effect-free from
/// the caller's point of view.
pub trait Verifier: Send + Sync {
    fn verify(&self, proof_bytes: &[u8], public: &PublicInputs) -> Result<bool, ProofError>;
}

/// Secret-commitment interface: folds a commitment to a player's secret
/// material into the ledger, producing a new ledger value and hash.
pub trait Commitment: Send + Sync {
    fn commit(
        &self,
        ledger: &GlobalLedger,
        secret: &SecretMaterial,
        player: PlayerId,
    ) -> Result<GlobalLedger, ProofError>;
}
