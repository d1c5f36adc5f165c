//! Hash-chain continuity check.

use game_core::StateHash;

use crate::inputs::PublicInputs;

/// Binds a proof's declared input state to the consumer's currently-known
/// state. O(1), pure. Every consumer (the ledger owner and each player)
/// runs this before trusting a transition; on a mismatch the previous state
/// is retained and the caller reports a desync.
pub fn verify_continuity(known_hash: StateHash, public: &PublicInputs) -> bool {
    known_hash == public.declared_input_hash
}
