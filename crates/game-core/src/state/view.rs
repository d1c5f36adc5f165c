//! Per-player private derived knowledge.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::state::{GlobalLedger, PlayerId, Role, SectionId, StateHash, Status};
use crate::visibility;

/// Secret inputs a player commits to before their first action.
///
/// Never serialized into the shared ledger; only commitments to it are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretMaterial {
    pub encrypt_key: [u8; 32],
    pub mask_salt: [u8; 32],
}

/// Public-record fields a player tracks from the last consumed ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRecord {
    pub section: SectionId,
    pub status: Status,
}

/// A player's private view of the game, bounded by visibility.
///
/// Exclusively owned by that player; mutated only through that player's own
/// consumption step, never by any other component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalView {
    pub player: PlayerId,
    pub role: Role,
    pub secret: SecretMaterial,
    pub section: SectionId,
    pub visible: BTreeSet<SectionId>,
    pub last_known_hash: StateHash,
    pub tracked: Vec<TrackedRecord>,
}

impl LocalView {
    /// Derives the initial view for a player. Independent of the shared
    /// ledger's existence: only the starting position matters.
    pub fn initial(
        player: PlayerId,
        role: Role,
        secret: SecretMaterial,
        start: SectionId,
        rows: u16,
        cols: u16,
    ) -> Self {
        Self {
            player,
            role,
            secret,
            section: start,
            visible: visibility::visible_sections(start, rows, cols),
            last_known_hash: StateHash::ZERO,
            tracked: Vec::new(),
        }
    }

    /// Folds an accepted next ledger into this view: own position and the
    /// visibility window are recomputed, the last-known hash refreshed, and
    /// tracked public records updated. Pure; verification happens upstream.
    pub fn fold(&self, next: &GlobalLedger, output_hash: StateHash, rows: u16, cols: u16) -> Self {
        let section = next
            .record(self.player)
            .map(|r| r.section)
            .unwrap_or(self.section);

        Self {
            player: self.player,
            role: self.role,
            secret: self.secret,
            section,
            visible: visibility::visible_sections(section, rows, cols),
            last_known_hash: output_hash,
            tracked: next
                .records
                .iter()
                .map(|r| TrackedRecord {
                    section: r.section,
                    status: r.status,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemRecord, PlayerRecord, RoleCommitment};

    fn secret(byte: u8) -> SecretMaterial {
        SecretMaterial {
            encrypt_key: [byte; 32],
            mask_salt: [byte.wrapping_add(1); 32],
        }
    }

    #[test]
    fn initial_view_anchors_visibility_at_start() {
        let view = LocalView::initial(
            PlayerId(0),
            Role::Crew,
            secret(1),
            SectionId(0),
            8,
            8,
        );
        assert_eq!(view.section, SectionId(0));
        assert_eq!(view.visible.len(), 4);
        assert_eq!(view.last_known_hash, StateHash::ZERO);
        assert!(view.tracked.is_empty());
    }

    #[test]
    fn fold_recomputes_window_and_refreshes_hash() {
        let view = LocalView::initial(
            PlayerId(1),
            Role::Crew,
            secret(2),
            SectionId(36),
            8,
            8,
        );

        let records = vec![
            PlayerRecord {
                section: SectionId(36),
                status: Status::Alive,
                role_commitment: RoleCommitment([0u8; 32]),
            },
            PlayerRecord {
                section: SectionId(27),
                status: Status::Alive,
                role_commitment: RoleCommitment([0u8; 32]),
            },
        ];
        let next = GlobalLedger::genesis(records, Vec::<ItemRecord>::new());
        let output_hash = StateHash([7u8; 32]);

        let folded = view.fold(&next, output_hash, 8, 8);
        assert_eq!(folded.section, SectionId(27));
        assert_eq!(folded.visible, crate::visible_sections(SectionId(27), 8, 8));
        assert_eq!(folded.last_known_hash, output_hash);
        assert_eq!(folded.tracked.len(), 2);
        // Private material is untouched by folding.
        assert_eq!(folded.role, view.role);
        assert_eq!(folded.secret, view.secret);
    }
}
