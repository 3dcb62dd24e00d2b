//! Waiting room, hybrid assembly, match start, and resignation.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chimera_core::engine::{START_FAILED_MESSAGE, START_MESSAGE};
use chimera_core::{
    CreationError, EntityId, GameError, GameStatus, HybridSpec, LifecycleError, Phase,
};
use chimera_runtime::{
    GenerationError, HybridImager, HybridNamer, Repositories, Runtime, ServiceError,
};
use common::*;

/// Namer that counts how often it is asked.
#[derive(Default)]
struct CountingNamer {
    calls: AtomicUsize,
}

#[async_trait]
impl HybridNamer for CountingNamer {
    async fn generate_name(&self, creature_names: &[String]) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("The {}", creature_names.join("-")))
    }
}

struct BrokenNamer;

#[async_trait]
impl HybridNamer for BrokenNamer {
    async fn generate_name(&self, _: &[String]) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("namer offline".into()))
    }
}

struct BrokenImager;

#[async_trait]
impl HybridImager for BrokenImager {
    async fn generate_image(&self, _: &[String]) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("renderer crashed".into()))
    }
}

/// Create, join, overflow, leave, and rejoin a waiting room.
#[tokio::test]
async fn test_waiting_room_lifecycle() {
    let runtime = runtime();
    let handle = runtime.handle();

    let game = handle.create_game("Arena", alice()).expect("create");
    assert_eq!(game.status, GameStatus::WaitingForPlayers);
    assert_eq!(game.join_code.len(), 6);
    assert_eq!(game.players.len(), 1);

    let err = handle
        .join_game("NOPE42", bob())
        .await
        .expect_err("unknown code");
    assert!(matches!(err, ServiceError::JoinCodeNotFound(_)));

    let err = handle
        .join_game(&game.join_code, alice())
        .await
        .expect_err("host rejoins");
    assert!(matches!(err, ServiceError::AlreadyJoined));

    // Join codes match case-insensitively.
    let joined = handle
        .join_game(&game.join_code.to_lowercase(), bob())
        .await
        .expect("bob joins");
    assert_eq!(joined.players.len(), 2);

    let err = handle
        .join_game(&game.join_code, carol())
        .await
        .expect_err("room is full");
    assert!(matches!(err, ServiceError::GameFull));

    let left = handle.leave_game(game.id, BOB).await.expect("bob leaves");
    assert_eq!(left.players.len(), 1);
    let err = handle
        .leave_game(game.id, BOB)
        .await
        .expect_err("already gone");
    assert!(matches!(err, ServiceError::PlayerNotInGame));

    let rejoined = handle
        .join_game(&game.join_code, carol())
        .await
        .expect("carol takes the seat");
    assert_eq!(rejoined.players[1].email, CAROL);
}

/// Starting checks seats and hybrids before anything runs.
#[tokio::test]
async fn test_start_requires_ready_players() {
    let runtime = runtime();
    let handle = runtime.handle();

    let solo = handle.create_game("Solo", alice()).expect("create");
    let err = handle.start_game(solo.id).await.expect_err("one player");
    assert!(matches!(
        err,
        ServiceError::Lifecycle(LifecycleError::NotEnoughPlayers)
    ));

    let id = lobby(&handle).await;
    handle
        .create_hybrids(id, ALICE, strong_specs())
        .await
        .expect("alice hybrids");
    let err = handle.start_game(id).await.expect_err("bob not ready");
    assert!(matches!(
        err,
        ServiceError::Lifecycle(LifecycleError::PlayersNotReady)
    ));
    assert_eq!(err.error_code(), "players_not_ready");
}

/// Hybrid creation is validated in order and happens once per player.
#[tokio::test]
async fn test_hybrid_creation_rules() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = lobby(&handle).await;

    let reused = [HybridSpec::new([1, 2], 1), HybridSpec::new([2, 3], 3)];
    let err = handle
        .create_hybrids(id, ALICE, reused)
        .await
        .expect_err("creature reused");
    assert!(matches!(
        err,
        ServiceError::Creation(CreationError::EntityReused(EntityId(2)))
    ));

    let unknown = [HybridSpec::new([1, 2], 1), HybridSpec::new([3, 99], 3)];
    let err = handle
        .create_hybrids(id, ALICE, unknown)
        .await
        .expect_err("unknown creature");
    assert!(matches!(
        err,
        ServiceError::Creation(CreationError::InvalidEntities(ref ids)) if ids == &[EntityId(99)]
    ));

    let game = handle
        .create_hybrids(id, ALICE, strong_specs())
        .await
        .expect("valid hybrids");
    let alice = game.player(ALICE).expect("alice");
    assert!(alice.has_created);
    assert_eq!(alice.hybrids.len(), 2);
    assert_eq!(alice.hybrids[0].selected_ability, Some(EntityId(1)));
    assert_eq!(game.message, "Alice created their hybrids.");

    let err = handle
        .create_hybrids(id, ALICE, sturdy_specs())
        .await
        .expect_err("second creation");
    assert!(matches!(
        err,
        ServiceError::Creation(CreationError::HybridsAlreadyCreated)
    ));

    let err = handle
        .create_hybrids(id, CAROL, sturdy_specs())
        .await
        .expect_err("outsider");
    assert!(matches!(err, ServiceError::PlayerNotInGame));
}

/// A successful start names and illustrates every hybrid and opens round 1.
#[tokio::test]
async fn test_start_opens_round_one() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = ready(&handle, strong_specs(), sturdy_specs()).await;

    let job = handle.start_game(id).await.expect("start accepted");
    let err = handle.start_game(id).await.expect_err("already starting");
    assert!(matches!(
        err,
        ServiceError::Lifecycle(LifecycleError::GameAlreadyStarted)
    ));
    job.await.expect("start job");

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::InProgress);
    assert_eq!(game.phase, Some(Phase::Planning));
    assert_eq!(game.round_count, 1);
    assert_eq!(game.message, START_MESSAGE);
    assert!(game.action_deadline.is_some());
    for player in &game.players {
        assert!(player.hybrids[0].is_active);
        assert!(!player.hybrids[1].is_active);
        for hybrid in &player.hybrids {
            assert!(hybrid.generated_name.is_some());
            assert!(hybrid.image_url.is_some());
        }
    }
    let lion_wolf = &game.player(ALICE).expect("alice").hybrids[0];
    assert_eq!(
        lion_wolf.image_url.as_deref(),
        Some("/assets/hybrids/lion_wolf.png")
    );

    let err = handle
        .leave_game(id, BOB)
        .await
        .expect_err("match running");
    assert!(matches!(err, ServiceError::CannotLeaveAfterStart));
    let err = handle
        .join_game(&game.join_code, carol())
        .await
        .expect_err("room is full");
    assert!(matches!(err, ServiceError::GameFull));
    let err = handle
        .create_hybrids(id, ALICE, sturdy_specs())
        .await
        .expect_err("hybrids exist");
    assert!(matches!(
        err,
        ServiceError::Creation(CreationError::HybridsAlreadyCreated)
    ));
}

/// Names are generated once per creature combination across matches.
#[tokio::test]
async fn test_generated_names_are_cached() {
    let namer = Arc::new(CountingNamer::default());
    let runtime = Runtime::builder()
        .repositories(Repositories::in_memory(catalog()))
        .namer(namer.clone())
        .enable_timeout_worker(false)
        .build();
    let handle = runtime.handle();

    let first = started(&handle, strong_specs(), sturdy_specs()).await;
    assert_eq!(namer.calls.load(Ordering::SeqCst), 4);
    let second = started(&handle, strong_specs(), sturdy_specs()).await;
    assert_eq!(namer.calls.load(Ordering::SeqCst), 4);

    let a = handle.get_game(first).await.expect("first");
    let b = handle.get_game(second).await.expect("second");
    let name = a.players[0].hybrids[0].generated_name.clone();
    assert_eq!(name.as_deref(), Some("The Lion-Wolf"));
    assert_eq!(b.players[0].hybrids[0].generated_name, name);
}

/// A broken namer falls back to the derived name; the match still starts.
#[tokio::test]
async fn test_name_failure_falls_back() {
    let runtime = Runtime::builder()
        .repositories(Repositories::in_memory(catalog()))
        .namer(Arc::new(BrokenNamer))
        .enable_timeout_worker(false)
        .build();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::InProgress);
    let hybrid = &game.players[0].hybrids[0];
    assert_eq!(hybrid.generated_name.as_deref(), Some(hybrid.name.as_str()));
}

/// A broken imager leaves the game in the error state with no deadline.
#[tokio::test]
async fn test_image_failure_marks_game_errored() {
    let runtime = Runtime::builder()
        .repositories(Repositories::in_memory(catalog()))
        .imager(Arc::new(BrokenImager))
        .enable_timeout_worker(false)
        .build();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::Error);
    assert_eq!(game.message, START_FAILED_MESSAGE);
    assert!(game.action_deadline.is_none());
    assert_eq!(game.round_count, 0);
}

/// Resignation ends the match without a winner and counts stats once.
#[tokio::test]
async fn test_resignation_and_leaderboard() {
    let runtime = runtime();
    let handle = runtime.handle();

    // Alice wins a decisive match first.
    let won = started(&handle, strong_specs(), fragile_specs()).await;
    loop {
        handle
            .submit_action(won, ALICE, chimera_core::PendingAction::BasicAttack, 0)
            .await
            .expect("alice attacks");
        let outcome = handle
            .submit_action(won, BOB, chimera_core::PendingAction::Defend, 0)
            .await
            .expect("bob defends");
        if outcome.game.is_finished() {
            break;
        }
    }

    let resigned = started(&handle, strong_specs(), sturdy_specs()).await;
    let game = handle.end_game(resigned, BOB).await.expect("bob resigns");
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, None);
    assert_eq!(game.message, "Player resigned: Bob");
    assert!(game.stats_counted);

    let err = handle
        .end_game(resigned, ALICE)
        .await
        .expect_err("already over");
    assert!(matches!(
        err,
        ServiceError::Lifecycle(LifecycleError::GameFinished)
    ));

    let bob = handle.player_stats(BOB).expect("stats").expect("bob row");
    assert_eq!(bob.games_played, 2);
    assert_eq!(bob.wins, 0);
    assert_eq!(bob.resignations, 1);

    let board = handle.leaderboard(10).expect("leaderboard");
    let order: Vec<&str> = board.iter().map(|row| row.email.as_str()).collect();
    assert_eq!(order, vec![ALICE, BOB]);
    assert_eq!(board[0].wins, 1);
    assert_eq!(board[0].games_played, 2);
}
