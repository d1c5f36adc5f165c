//! Client-facing surface of the runtime.
mod errors;
mod handle;
mod outcome;

pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use outcome::{ConsumeReport, TransitionReceipt};
