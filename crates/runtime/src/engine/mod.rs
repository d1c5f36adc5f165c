//! Transition pipeline: proof generation and per-consumer verification.
mod consume;
mod transition;

pub use consume::{ConsumeError, consume};
pub use transition::{PreparedTransition, prove_transition};
