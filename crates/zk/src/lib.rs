//! Cryptographic collaborators for proof-gated state transitions.
//!
//! The constraint system itself is opaque to the rest of the workspace:
//! callers talk to the [`Prover`], [`Verifier`], and [`Commitment`] traits
//! and never inspect proof bytes. This crate also owns the public-input
//! schema, the ledger digest function that feeds the hash chain, and the
//! O(1) continuity check every consumer runs before trusting a transition.
pub mod backend;
pub mod continuity;
pub mod digest;
pub mod inputs;
pub mod prover;

pub use backend::{BackendHandle, LocalBackend};
pub use continuity::verify_continuity;
pub use digest::{ledger_digest, role_commitment, secret_commitment};
pub use inputs::{ActionPayload, PublicInputs, SchemaError};
pub use prover::{
    CircuitInputs, Commitment, DeclaredOutputs, Execution, ProofBackend, ProofError, Prover,
    TransitionProof, Verifier, Witness,
};
