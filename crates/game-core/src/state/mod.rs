//! Shared ledger state and per-player local views.
//!
//! [`GlobalLedger`] is the single public game state plus its hash chain. It
//! has immutable snapshot semantics: an accepted transition produces a new
//! ledger value, never an in-place mutation. Secret material never appears
//! here; only commitments to it do.
mod view;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use view::{LocalView, SecretMaterial, TrackedRecord};

use crate::action::Action;

/// Index of a player in the shared ledger's record list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Row-major index of a grid section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u16);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {}", self.0)
    }
}

/// A link in the ledger's hash chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHash(pub [u8; 32]);

impl StateHash {
    /// Genesis hash: the chain starts from all zeroes before any commitment.
    pub const ZERO: StateHash = StateHash([0u8; 32]);
}

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateHash({})", hex::encode(&self.0[..8]))
    }
}

/// Hiding commitment to a player's secret material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretCommitment(pub [u8; 32]);

/// Hiding commitment to a player's role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCommitment(pub [u8; 32]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Crew,
    Imposter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Alive,
    Dead,
}

/// Public record the ledger keeps for each player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub section: SectionId,
    pub status: Status,
    pub role_commitment: RoleCommitment,
}

/// Public record for a collectible item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub section: SectionId,
    pub collected: bool,
}

/// Errors surfaced when folding an action into the ledger.
///
/// Legality is validated before any proof request; these guard structural
/// soundness at application time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("actor {0} not present in ledger")]
    ActorMissing(PlayerId),

    #[error("target {0} not present in ledger")]
    TargetMissing(PlayerId),
}

/// The single shared public game state plus its hash chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalLedger {
    /// One public record per player, indexed by [`PlayerId`].
    pub records: Vec<PlayerRecord>,
    /// Commitments to per-player secret material, `None` until committed.
    pub secret_commitments: Vec<Option<SecretCommitment>>,
    /// Collectible items placed at initialization.
    pub items: Vec<ItemRecord>,
    /// Open ballots for the current vote tally, indexed by voter.
    pub ballots: Vec<Option<PlayerId>>,
    /// Running sequence of state hashes; index 0 is [`StateHash::ZERO`].
    pub hash_chain: Vec<StateHash>,
}

impl GlobalLedger {
    /// Builds the genesis ledger: per-player records, uncollected items, no
    /// secret commitments, and a zero-hash chain head.
    pub fn genesis(records: Vec<PlayerRecord>, items: Vec<ItemRecord>) -> Self {
        let player_count = records.len();
        Self {
            records,
            secret_commitments: vec![None; player_count],
            items,
            ballots: vec![None; player_count],
            hash_chain: vec![StateHash::ZERO],
        }
    }

    pub fn player_count(&self) -> usize {
        self.records.len()
    }

    /// Latest hash in the chain; what every consumer must know to accept the
    /// next transition.
    pub fn head_hash(&self) -> StateHash {
        *self
            .hash_chain
            .last()
            .expect("hash chain always holds the genesis entry")
    }

    pub fn record(&self, player: PlayerId) -> Option<&PlayerRecord> {
        self.records.get(player.index())
    }

    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.record(player)
            .is_some_and(|r| r.status == Status::Alive)
    }

    pub fn has_committed_secrets(&self, player: PlayerId) -> bool {
        self.secret_commitments
            .get(player.index())
            .is_some_and(Option::is_some)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status == Status::Alive)
            .map(|(i, _)| PlayerId(i as u8))
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn collected_items(&self) -> usize {
        self.items.iter().filter(|i| i.collected).count()
    }

    /// Computes the next-ledger contents for `action` without touching the
    /// hash chain. The proving backend appends the declared output hash.
    ///
    /// Only the actor's record (and any directly affected record/item/ballot)
    /// changes; everything else carries over unchanged.
    pub fn apply(&self, action: &Action, actor_role: Role) -> Result<GlobalLedger, ApplyError> {
        let mut next = self.clone();

        match *action {
            Action::Move { actor, target } => {
                let record = next
                    .records
                    .get_mut(actor.index())
                    .ok_or(ApplyError::ActorMissing(actor))?;
                record.section = target;

                // Crew collect any item sitting on the destination section.
                if actor_role == Role::Crew {
                    for item in next.items.iter_mut() {
                        if item.section == target {
                            item.collected = true;
                        }
                    }
                }
            }
            Action::Eliminate { actor, target } => {
                if actor.index() >= next.records.len() {
                    return Err(ApplyError::ActorMissing(actor));
                }
                let record = next
                    .records
                    .get_mut(target.index())
                    .ok_or(ApplyError::TargetMissing(target))?;
                record.status = Status::Dead;
            }
            Action::Vote { actor, ballot } => {
                if ballot.index() >= next.records.len() {
                    return Err(ApplyError::TargetMissing(ballot));
                }
                let slot = next
                    .ballots
                    .get_mut(actor.index())
                    .ok_or(ApplyError::ActorMissing(actor))?;
                *slot = Some(ballot);
                next.close_tally_if_complete();
            }
        }

        Ok(next)
    }

    /// When every alive player has a ballot, eliminates the plurality target
    /// and resets all ballots. Ties eliminate nobody.
    fn close_tally_if_complete(&mut self) {
        let alive: Vec<PlayerId> = self.alive_players().collect();
        let all_voted = alive
            .iter()
            .all(|p| self.ballots[p.index()].is_some());
        if !all_voted {
            return;
        }

        let mut counts = vec![0usize; self.records.len()];
        for voter in &alive {
            if let Some(ballot) = self.ballots[voter.index()] {
                counts[ballot.index()] += 1;
            }
        }

        let max = counts.iter().copied().max().unwrap_or(0);
        let leaders: Vec<usize> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == max && c > 0)
            .map(|(i, _)| i)
            .collect();

        if let [target] = leaders.as_slice() {
            self.records[*target].status = Status::Dead;
        }

        self.ballots.iter_mut().for_each(|b| *b = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger(player_count: u8) -> GlobalLedger {
        let records = (0..player_count)
            .map(|_| PlayerRecord {
                section: SectionId(36),
                status: Status::Alive,
                role_commitment: RoleCommitment([0u8; 32]),
            })
            .collect();
        let items = vec![
            ItemRecord {
                section: SectionId(10),
                collected: false,
            },
            ItemRecord {
                section: SectionId(20),
                collected: false,
            },
        ];
        GlobalLedger::genesis(records, items)
    }

    #[test]
    fn genesis_chain_starts_at_zero() {
        let ledger = test_ledger(3);
        assert_eq!(ledger.head_hash(), StateHash::ZERO);
        assert_eq!(ledger.hash_chain.len(), 1);
        assert!(!ledger.has_committed_secrets(PlayerId(0)));
    }

    #[test]
    fn move_updates_only_the_actor() {
        let ledger = test_ledger(3);
        let action = Action::Move {
            actor: PlayerId(1),
            target: SectionId(37),
        };

        let next = ledger.apply(&action, Role::Imposter).unwrap();
        assert_eq!(next.records[1].section, SectionId(37));
        assert_eq!(next.records[0], ledger.records[0]);
        assert_eq!(next.records[2], ledger.records[2]);
    }

    #[test]
    fn crew_move_collects_item_but_imposter_does_not() {
        let ledger = test_ledger(3);
        let action = Action::Move {
            actor: PlayerId(0),
            target: SectionId(10),
        };

        let as_crew = ledger.apply(&action, Role::Crew).unwrap();
        assert_eq!(as_crew.collected_items(), 1);

        let as_imposter = ledger.apply(&action, Role::Imposter).unwrap();
        assert_eq!(as_imposter.collected_items(), 0);
    }

    #[test]
    fn eliminate_marks_target_dead() {
        let ledger = test_ledger(3);
        let action = Action::Eliminate {
            actor: PlayerId(0),
            target: PlayerId(2),
        };

        let next = ledger.apply(&action, Role::Imposter).unwrap();
        assert_eq!(next.records[2].status, Status::Dead);
        assert!(next.is_alive(PlayerId(0)));
        assert!(next.is_alive(PlayerId(1)));
    }

    #[test]
    fn tally_closes_on_plurality_once_all_alive_voted() {
        let ledger = test_ledger(3);

        let after_first = ledger
            .apply(
                &Action::Vote {
                    actor: PlayerId(0),
                    ballot: PlayerId(2),
                },
                Role::Crew,
            )
            .unwrap();
        // Tally still open: views differ only in the recorded ballot.
        assert!(after_first.is_alive(PlayerId(2)));
        assert_eq!(after_first.ballots[0], Some(PlayerId(2)));

        let after_second = after_first
            .apply(
                &Action::Vote {
                    actor: PlayerId(1),
                    ballot: PlayerId(2),
                },
                Role::Crew,
            )
            .unwrap();
        let closed = after_second
            .apply(
                &Action::Vote {
                    actor: PlayerId(2),
                    ballot: PlayerId(0),
                },
                Role::Crew,
            )
            .unwrap();

        assert_eq!(closed.records[2].status, Status::Dead);
        assert!(closed.ballots.iter().all(Option::is_none));
    }

    #[test]
    fn tied_tally_eliminates_nobody_and_resets() {
        let mut ledger = test_ledger(2);
        ledger = ledger
            .apply(
                &Action::Vote {
                    actor: PlayerId(0),
                    ballot: PlayerId(1),
                },
                Role::Crew,
            )
            .unwrap();
        ledger = ledger
            .apply(
                &Action::Vote {
                    actor: PlayerId(1),
                    ballot: PlayerId(0),
                },
                Role::Crew,
            )
            .unwrap();

        assert!(ledger.is_alive(PlayerId(0)));
        assert!(ledger.is_alive(PlayerId(1)));
        assert!(ledger.ballots.iter().all(Option::is_none));
    }

    #[test]
    fn apply_rejects_out_of_range_indices() {
        let ledger = test_ledger(2);
        let result = ledger.apply(
            &Action::Eliminate {
                actor: PlayerId(0),
                target: PlayerId(9),
            },
            Role::Imposter,
        );
        assert_eq!(result, Err(ApplyError::TargetMissing(PlayerId(9))));
    }
}
