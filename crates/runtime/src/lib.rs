//! Session orchestration for the proof-gated game core.
//!
//! The runtime owns the shared ledger and every player's local view behind a
//! single session worker, wires up command/event channels, and exposes a
//! cloneable [`RuntimeHandle`] for clients. Exactly one mutation path exists
//! for the ledger: commands are serialized through the worker, and at most
//! one transition is in flight at any time. View consumption fans out as
//! concurrent tasks with a best-effort join.
pub mod api;
pub mod commitment;
pub mod engine;
pub mod events;
pub mod runtime;
pub mod workers;

pub use api::{ConsumeReport, Result, RuntimeError, RuntimeHandle, TransitionReceipt};
pub use commitment::{SessionSetup, assign_roles, initialize};
pub use events::{Event, EventBus, LedgerEvent, ProofEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
