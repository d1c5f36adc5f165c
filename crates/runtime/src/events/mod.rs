//! Topic-based event notifications published by the session worker.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{LedgerEvent, ProofEvent, TurnEvent};
