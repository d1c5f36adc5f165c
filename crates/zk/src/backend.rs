//! Deterministic local proving backend and the process-wide backend handle.
//!
//! [`LocalBackend`] executes the transition natively and binds the resulting
//! public inputs into the attestation by hashing. [`BackendHandle`] is the
//! single construction point: initialized once per process, passed by handle
//! to every component that needs a collaborator, shut down explicitly.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use game_core::{GameConfig, GlobalLedger, PlayerId, SecretMaterial};

use crate::digest::{ledger_digest, secret_commitment};
use crate::inputs::{ActionPayload, PublicInputs};
use crate::prover::{
    CircuitInputs, Commitment, DeclaredOutputs, Execution, ProofBackend, ProofError, Prover,
    TransitionProof, Verifier, Witness,
};

const PROOF_DOMAIN: &[u8] = b"transition-proof-v1";

/// In-process backend implementing all three collaborator traits.
#[derive(Clone, Debug)]
pub struct LocalBackend {
    config: GameConfig,
}

impl LocalBackend {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    fn attestation_for(&self, public: &PublicInputs) -> Result<Vec<u8>, ProofError> {
        let encoded =
            bincode::serialize(public).map_err(|e| ProofError::Serialization(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(&encoded);
        Ok(hasher.finalize().to_vec())
    }
}

impl Prover for LocalBackend {
    fn execute(&self, inputs: &CircuitInputs) -> Result<Execution, ProofError> {
        let player_count = inputs.ledger.player_count() as u8;
        let payload = ActionPayload::from(&inputs.action);
        payload.validate(player_count, self.config.section_count())?;

        // Native constraint execution: fold the action into the ledger and
        // chain the content digest of the result.
        let mut next_ledger = inputs.ledger.apply(&inputs.action, inputs.view.role)?;
        let declared_output_hash = ledger_digest(&next_ledger)?;
        next_ledger.hash_chain.push(declared_output_hash);

        let public = PublicInputs {
            declared_input_hash: inputs.ledger.head_hash(),
            declared_output_hash,
            payload,
        };

        let witness =
            bincode::serialize(&public).map_err(|e| ProofError::Serialization(e.to_string()))?;

        Ok(Execution {
            witness: Witness(witness),
            declared: DeclaredOutputs {
                next_ledger,
                public,
            },
        })
    }

    fn generate_proof(&self, witness: &Witness) -> Result<Vec<u8>, ProofError> {
        if witness.is_empty() {
            return Err(ProofError::Generation("empty witness".to_string()));
        }
        let mut hasher = Sha256::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(&witness.0);
        Ok(hasher.finalize().to_vec())
    }
}

impl Verifier for LocalBackend {
    fn verify(&self, proof_bytes: &[u8], public: &PublicInputs) -> Result<bool, ProofError> {
        let expected = self.attestation_for(public)?;
        Ok(proof_bytes == expected.as_slice())
    }
}

impl Commitment for LocalBackend {
    fn commit(
        &self,
        ledger: &GlobalLedger,
        secret: &SecretMaterial,
        player: PlayerId,
    ) -> Result<GlobalLedger, ProofError> {
        let slot = ledger
            .secret_commitments
            .get(player.index())
            .ok_or(ProofError::UnknownPlayer(player))?;
        if slot.is_some() {
            return Err(ProofError::AlreadyCommitted(player));
        }

        let mut next = ledger.clone();
        next.secret_commitments[player.index()] = Some(secret_commitment(secret, player));
        let hash = ledger_digest(&next)?;
        next.hash_chain.push(hash);
        Ok(next)
    }
}

/// Cloneable handle to the process-wide cryptographic backend.
///
/// Construct once via [`BackendHandle::init`], pass by handle to every
/// component, never re-initialize per call.
#[derive(Clone)]
pub struct BackendHandle {
    inner: Arc<LocalBackend>,
}

impl BackendHandle {
    /// Initializes the backend for this process.
    pub fn init(config: GameConfig) -> Result<Self, ProofError> {
        tracing::info!(
            target: "zk::backend",
            rows = config.rows,
            cols = config.cols,
            "cryptographic backend initialized"
        );
        Ok(Self {
            inner: Arc::new(LocalBackend::new(config)),
        })
    }

    pub fn kind(&self) -> ProofBackend {
        ProofBackend::Local
    }

    pub fn prover(&self) -> &dyn Prover {
        self.inner.as_ref()
    }

    pub fn verifier(&self) -> &dyn Verifier {
        self.inner.as_ref()
    }

    pub fn commitment(&self) -> &dyn Commitment {
        self.inner.as_ref()
    }

    /// Wraps generated proof bytes with their public inputs.
    pub fn package(&self, bytes: Vec<u8>, public: PublicInputs) -> TransitionProof {
        TransitionProof {
            bytes,
            backend: self.kind(),
            public,
        }
    }

    /// Releases the backend. Last handle dropped tears down backend state.
    pub fn shutdown(self) {
        tracing::info!(target: "zk::backend", "cryptographic backend shut down");
        drop(self.inner);
    }
}
