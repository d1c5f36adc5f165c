//! Deterministic game rules and data types shared across the workspace.
//!
//! `game-core` defines the canonical rules: the visibility oracle, the shared
//! public ledger and per-player local views, action legality, and the turn
//! state machine. Everything here is pure and synchronous; the runtime layer
//! drives these APIs and the zk layer wraps them behind proof collaborators.
pub mod action;
pub mod config;
pub mod state;
pub mod turn;
pub mod visibility;

pub use action::{Action, ActionError, ActionKind, validate_action};
pub use config::GameConfig;
pub use state::{
    ApplyError, GlobalLedger, ItemRecord, LocalView, PlayerId, PlayerRecord, Role, RoleCommitment,
    SecretCommitment, SecretMaterial, SectionId, StateHash, Status, TrackedRecord,
};
pub use turn::{Phase, TurnError, TurnMachine, Winner, evaluate_termination};
pub use visibility::{is_visible, visible_sections};
