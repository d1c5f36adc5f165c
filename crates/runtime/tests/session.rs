//! End-to-end session tests driving the runtime through its public handle.

use game_core::{
    GameConfig, Phase, PlayerId, Role, SecretMaterial, SectionId, Status, TurnError, Winner,
};
use runtime::{Event, ProofEvent, Runtime, RuntimeConfig, RuntimeError, Topic};

fn secrets(n: u8) -> Vec<SecretMaterial> {
    (0..n)
        .map(|i| SecretMaterial {
            encrypt_key: [i + 1; 32],
            mask_salt: [i + 101; 32],
        })
        .collect()
}

fn start(game: GameConfig, roles: Vec<Role>) -> Runtime {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Runtime::builder()
        .config(RuntimeConfig {
            game,
            ..RuntimeConfig::default()
        })
        .secrets(secrets(roles.len() as u8))
        .roles(roles)
        .build()
        .expect("session should start")
}

#[tokio::test]
async fn accepted_move_advances_ledger_and_every_view() {
    let runtime = start(
        GameConfig::default(),
        vec![Role::Imposter, Role::Crew, Role::Crew],
    );
    let handle = runtime.handle();

    let before = handle.query_ledger().await.unwrap();
    // Genesis plus one commitment per player.
    assert_eq!(before.hash_chain.len(), 4);

    let receipt = handle
        .request_move(PlayerId(0), SectionId(37))
        .await
        .unwrap();

    assert_eq!(receipt.reports.len(), 3);
    assert!(receipt.reports.iter().all(|r| r.accepted));
    assert_eq!(
        receipt.phase,
        Phase::AwaitingAction {
            actor: PlayerId(1)
        }
    );

    let after = handle.query_ledger().await.unwrap();
    assert_eq!(after.head_hash(), receipt.output_hash);
    assert_eq!(after.hash_chain.len(), 5);
    assert_eq!(after.records[0].section, SectionId(37));

    // A non-acting player's view consumed the same transition.
    let observer = handle.query_view(PlayerId(2)).await.unwrap().unwrap();
    assert_eq!(observer.last_known_hash, receipt.output_hash);
    assert_eq!(observer.tracked[0].section, SectionId(37));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn only_the_scheduled_player_may_act() {
    let runtime = start(
        GameConfig::default(),
        vec![Role::Imposter, Role::Crew, Role::Crew],
    );
    let handle = runtime.handle();

    let before = handle.query_ledger().await.unwrap().head_hash();
    let result = handle.request_move(PlayerId(1), SectionId(37)).await;
    assert!(matches!(
        result,
        Err(RuntimeError::Turn(TurnError::NotPlayersTurn { .. }))
    ));

    assert_eq!(handle.query_ledger().await.unwrap().head_hash(), before);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn illegal_move_is_rejected_without_any_state_change() {
    let runtime = start(
        GameConfig::default(),
        vec![Role::Imposter, Role::Crew, Role::Crew],
    );
    let handle = runtime.handle();

    let before = handle.query_ledger().await.unwrap();
    // Section 0 is far outside the visibility window around the center.
    let result = handle.request_move(PlayerId(0), SectionId(0)).await;
    assert!(matches!(result, Err(RuntimeError::InvalidAction(_))));

    let after = handle.query_ledger().await.unwrap();
    assert_eq!(after, before);
    // The turn was not consumed.
    assert_eq!(
        handle.query_phase().await.unwrap(),
        Phase::AwaitingAction {
            actor: PlayerId(0)
        }
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn elimination_can_hand_imposters_the_win() {
    let runtime = start(
        GameConfig::default(),
        vec![Role::Imposter, Role::Crew, Role::Crew],
    );
    let handle = runtime.handle();

    // Everyone shares the starting section, so the target is visible. One
    // elimination leaves one imposter against one crew member.
    let receipt = handle
        .request_elimination(PlayerId(0), PlayerId(1))
        .await
        .unwrap();

    assert_eq!(
        receipt.phase,
        Phase::GameOver {
            winner: Winner::Imposters
        }
    );
    let ledger = handle.query_ledger().await.unwrap();
    assert_eq!(ledger.records[1].status, Status::Dead);

    // Nothing further is accepted.
    let result = handle.request_move(PlayerId(2), SectionId(37)).await;
    assert!(matches!(
        result,
        Err(RuntimeError::Turn(TurnError::GameOver))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn collecting_the_last_item_hands_crew_the_win() {
    // 2x2 grid: every section is visible from every other, so the crew can
    // walk straight onto the item.
    let game = GameConfig {
        rows: 2,
        cols: 2,
        imposter_count: 1,
        item_count: 1,
        game_seed: 7,
        start_section: GameConfig::center_section(2, 2),
    };
    let runtime = start(game, vec![Role::Imposter, Role::Crew, Role::Crew]);
    let handle = runtime.handle();

    let ledger = handle.query_ledger().await.unwrap();
    assert_eq!(ledger.total_items(), 1);
    let item_section = ledger.items[0].section;
    assert_ne!(item_section, game.start_section);

    // Imposter moves first; imposters never collect.
    let receipt = handle
        .request_move(PlayerId(0), item_section)
        .await
        .unwrap();
    assert_eq!(
        receipt.phase,
        Phase::AwaitingAction {
            actor: PlayerId(1)
        }
    );
    assert_eq!(handle.query_ledger().await.unwrap().collected_items(), 0);

    let receipt = handle
        .request_move(PlayerId(1), item_section)
        .await
        .unwrap();
    assert_eq!(
        receipt.phase,
        Phase::GameOver {
            winner: Winner::Crew
        }
    );
    assert_eq!(handle.query_ledger().await.unwrap().collected_items(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn completed_vote_eliminates_the_plurality_target() {
    let runtime = start(
        GameConfig::default(),
        vec![Role::Imposter, Role::Crew, Role::Crew],
    );
    let handle = runtime.handle();

    handle.request_vote(PlayerId(0), PlayerId(1)).await.unwrap();
    handle.request_vote(PlayerId(1), PlayerId(0)).await.unwrap();
    let receipt = handle.request_vote(PlayerId(2), PlayerId(0)).await.unwrap();

    let ledger = handle.query_ledger().await.unwrap();
    assert_eq!(ledger.records[0].status, Status::Dead);
    assert!(ledger.ballots.iter().all(Option::is_none));

    // The imposter is gone but two crew remain, so play continues and the
    // dead player is skipped in the rotation.
    assert_eq!(
        receipt.phase,
        Phase::AwaitingAction {
            actor: PlayerId(1)
        }
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn proof_lifecycle_events_are_published() {
    let runtime = start(
        GameConfig::default(),
        vec![Role::Imposter, Role::Crew, Role::Crew],
    );
    let handle = runtime.handle();
    let mut proof_rx = handle.subscribe(Topic::Proof);

    handle
        .request_move(PlayerId(0), SectionId(37))
        .await
        .unwrap();

    let started = proof_rx.recv().await.unwrap();
    assert!(matches!(
        started,
        Event::Proof(ProofEvent::ProofStarted {
            actor: PlayerId(0),
            ..
        })
    ));
    let generated = proof_rx.recv().await.unwrap();
    assert!(matches!(
        generated,
        Event::Proof(ProofEvent::ProofGenerated { .. })
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn builder_rejects_missing_or_inconsistent_setup() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let missing = Runtime::builder().build();
    assert!(matches!(missing, Err(RuntimeError::Setup(_))));

    let mismatched = Runtime::builder()
        .secrets(secrets(3))
        .roles(vec![Role::Crew; 2])
        .build();
    assert!(matches!(mismatched, Err(RuntimeError::Setup(_))));

    let all_imposters = Runtime::builder()
        .secrets(secrets(2))
        .roles(vec![Role::Imposter; 2])
        .build();
    assert!(matches!(all_imposters, Err(RuntimeError::Setup(_))));
}
