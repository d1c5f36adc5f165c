//! Session initialization: role assignment, item placement, and the secret
//! commitment phase.
//!
//! Initialization is deterministic in the game seed: the same seed, player
//! count, and config always produce the same genesis ledger. Play cannot
//! start until every player's secret material has been committed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use game_core::{
    GameConfig, GlobalLedger, ItemRecord, LocalView, PlayerId, PlayerRecord, Role, SecretMaterial,
    SectionId, Status,
};
use zk::{BackendHandle, role_commitment};

use crate::api::{Result, RuntimeError};

/// Everything the session worker needs to start play.
pub struct SessionSetup {
    /// Genesis ledger with all secret commitments folded in.
    pub ledger: GlobalLedger,
    /// One view per player, anchored at the committed genesis hash.
    pub views: Vec<LocalView>,
    pub roles: Vec<Role>,
}

/// Deterministically assigns `imposter_count` imposters among the players.
pub fn assign_roles(player_count: u8, imposter_count: u8, seed: u64) -> Vec<Role> {
    let mut order: Vec<usize> = (0..player_count as usize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut roles = vec![Role::Crew; player_count as usize];
    for &index in order.iter().take(imposter_count as usize) {
        roles[index] = Role::Imposter;
    }
    roles
}

/// Scatters items across the grid, never on the shared starting section.
///
/// Uses a separate rng stream from role assignment so the two draws stay
/// independent under the same seed.
fn place_items(config: &GameConfig) -> Vec<ItemRecord> {
    let mut candidates: Vec<u16> = (0..config.section_count())
        .filter(|&s| SectionId(s) != config.start_section)
        .collect();
    let mut rng = StdRng::seed_from_u64(config.game_seed.wrapping_add(1));
    candidates.shuffle(&mut rng);

    candidates
        .into_iter()
        .take(config.item_count as usize)
        .map(|section| ItemRecord {
            section: SectionId(section),
            collected: false,
        })
        .collect()
}

/// Builds the committed genesis ledger and per-player views.
///
/// Every player's secret material is committed through the backend before
/// play starts; the commitment phase is public, so each view is handed the
/// committed genesis hash and the initial tracked records.
pub fn initialize(
    config: &GameConfig,
    secrets: &[SecretMaterial],
    roles: &[Role],
    backend: &BackendHandle,
) -> Result<SessionSetup> {
    if secrets.is_empty() {
        return Err(RuntimeError::Setup(
            "a session needs at least one player".to_string(),
        ));
    }
    if roles.len() != secrets.len() {
        return Err(RuntimeError::Setup(format!(
            "{} roles for {} players",
            roles.len(),
            secrets.len()
        )));
    }
    if !config.contains(config.start_section) {
        return Err(RuntimeError::Setup(format!(
            "start {} lies outside the {}x{} grid",
            config.start_section, config.rows, config.cols
        )));
    }

    let records: Vec<PlayerRecord> = roles
        .iter()
        .zip(secrets)
        .enumerate()
        .map(|(i, (&role, secret))| PlayerRecord {
            section: config.start_section,
            status: Status::Alive,
            role_commitment: role_commitment(role, secret, PlayerId(i as u8)),
        })
        .collect();

    let mut ledger = GlobalLedger::genesis(records, place_items(config));
    for (i, secret) in secrets.iter().enumerate() {
        ledger = backend
            .commitment()
            .commit(&ledger, secret, PlayerId(i as u8))
            .map_err(RuntimeError::Initialization)?;
    }

    let committed_hash = ledger.head_hash();
    let views: Vec<LocalView> = roles
        .iter()
        .zip(secrets)
        .enumerate()
        .map(|(i, (&role, &secret))| {
            LocalView::initial(
                PlayerId(i as u8),
                role,
                secret,
                config.start_section,
                config.rows,
                config.cols,
            )
            .fold(&ledger, committed_hash, config.rows, config.cols)
        })
        .collect();

    info!(
        target: "runtime::commitment",
        players = secrets.len(),
        items = ledger.total_items(),
        head = %committed_hash,
        "session committed"
    );

    Ok(SessionSetup {
        ledger,
        views,
        roles: roles.to_vec(),
    })
}
