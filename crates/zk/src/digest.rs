//! Deterministic digests for the ledger hash chain and secret commitments.
//!
//! All digests are SHA-256 over a domain tag plus a bincode encoding. The
//! ledger digest covers the ledger's contents but not the chain itself; the
//! chain stores the sequence of these digests.

use sha2::{Digest, Sha256};

use game_core::{
    GlobalLedger, PlayerId, Role, RoleCommitment, SecretCommitment, SecretMaterial, StateHash,
};

use crate::prover::ProofError;

const LEDGER_DOMAIN: &[u8] = b"ledger-digest-v1";
const SECRET_DOMAIN: &[u8] = b"secret-commit-v1";
const ROLE_DOMAIN: &[u8] = b"role-commit-v1";

/// Digest of the ledger's public contents (records, commitments, items,
/// ballots). Two ledgers with equal contents share a digest regardless of
/// how they were reached.
pub fn ledger_digest(ledger: &GlobalLedger) -> Result<StateHash, ProofError> {
    let content = (
        &ledger.records,
        &ledger.secret_commitments,
        &ledger.items,
        &ledger.ballots,
    );
    let bytes =
        bincode::serialize(&content).map_err(|e| ProofError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(LEDGER_DOMAIN);
    hasher.update(&bytes);
    Ok(StateHash(hasher.finalize().into()))
}

/// Hiding commitment to a player's full secret material.
pub fn secret_commitment(secret: &SecretMaterial, player: PlayerId) -> SecretCommitment {
    let mut hasher = Sha256::new();
    hasher.update(SECRET_DOMAIN);
    hasher.update(secret.encrypt_key);
    hasher.update(secret.mask_salt);
    hasher.update([player.0]);
    SecretCommitment(hasher.finalize().into())
}

/// Hiding commitment to a player's role, masked by their salt.
pub fn role_commitment(role: Role, secret: &SecretMaterial, player: PlayerId) -> RoleCommitment {
    let tag: u8 = match role {
        Role::Crew => 0,
        Role::Imposter => 1,
    };
    let mut hasher = Sha256::new();
    hasher.update(ROLE_DOMAIN);
    hasher.update([tag]);
    hasher.update(secret.mask_salt);
    hasher.update([player.0]);
    RoleCommitment(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ItemRecord, PlayerRecord, SectionId, Status};

    fn ledger() -> GlobalLedger {
        let records = vec![PlayerRecord {
            section: SectionId(36),
            status: Status::Alive,
            role_commitment: RoleCommitment([0u8; 32]),
        }];
        GlobalLedger::genesis(
            records,
            vec![ItemRecord {
                section: SectionId(3),
                collected: false,
            }],
        )
    }

    fn secret(byte: u8) -> SecretMaterial {
        SecretMaterial {
            encrypt_key: [byte; 32],
            mask_salt: [byte; 32],
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let a = ledger_digest(&ledger()).unwrap();
        let b = ledger_digest(&ledger()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, StateHash::ZERO);
    }

    #[test]
    fn digest_tracks_content_changes() {
        let base = ledger();
        let mut moved = base.clone();
        moved.records[0].section = SectionId(37);

        assert_ne!(
            ledger_digest(&base).unwrap(),
            ledger_digest(&moved).unwrap()
        );
    }

    #[test]
    fn digest_ignores_chain_history() {
        let base = ledger();
        let mut extended = base.clone();
        extended.hash_chain.push(StateHash([9u8; 32]));

        assert_eq!(
            ledger_digest(&base).unwrap(),
            ledger_digest(&extended).unwrap()
        );
    }

    #[test]
    fn commitments_bind_player_index() {
        let secret = secret(1);
        assert_ne!(
            secret_commitment(&secret, PlayerId(0)),
            secret_commitment(&secret, PlayerId(1))
        );
        assert_ne!(
            role_commitment(Role::Crew, &secret, PlayerId(0)),
            role_commitment(Role::Imposter, &secret, PlayerId(0))
        );
    }
}
