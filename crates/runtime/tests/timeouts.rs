//! Deadline handling: auto-rest, double timeout, abandonment, and claims.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration as StdDuration;

use chimera_core::engine::{ABANDONED_SUMMARY, DOUBLE_TIMEOUT_SUMMARY, INACTIVITY_MESSAGE};
use chimera_core::{Game, GameId, GameStatus, PendingAction, Phase};
use chimera_runtime::repository::Result as RepoResult;
use chimera_runtime::{
    GameRepository, InMemoryEntityRepo, InMemoryGameRepo, InMemoryStatsRepo, Repositories,
    RepositoryError, Runtime, RuntimeHandle, ServiceConfig,
};
use chrono::{DateTime, Duration, Utc};
use common::*;

fn later() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(10)
}

/// Moves the stored deadline of `id` into the past.
fn expire_deadline(handle: &RuntimeHandle, id: GameId) {
    let games = &handle.repositories().games;
    let mut game = games.get_game(id).expect("load").expect("game exists");
    game.action_deadline = Some(Utc::now() - Duration::seconds(1));
    games.update_game(&game).expect("store");
}

/// Game store that can be told to reject writes.
struct FlakyGames {
    inner: InMemoryGameRepo,
    reject_updates: AtomicBool,
}

impl FlakyGames {
    fn new() -> Self {
        Self {
            inner: InMemoryGameRepo::new(),
            reject_updates: AtomicBool::new(false),
        }
    }
}

impl GameRepository for FlakyGames {
    fn create_game(&self, game: Game) -> RepoResult<Game> {
        self.inner.create_game(game)
    }

    fn get_game(&self, id: GameId) -> RepoResult<Option<Game>> {
        self.inner.get_game(id)
    }

    fn update_game(&self, game: &Game) -> RepoResult<()> {
        if self.reject_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("writes disabled".into()));
        }
        self.inner.update_game(game)
    }

    fn find_by_join_code(&self, join_code: &str) -> RepoResult<Option<Game>> {
        self.inner.find_by_join_code(join_code)
    }

    fn claim_timed_out_game_ids(
        &self,
        now: DateTime<Utc>,
        limit: usize,
        reclaim_after: Duration,
        worker_id: &str,
    ) -> RepoResult<Vec<GameId>> {
        self.inner
            .claim_timed_out_game_ids(now, limit, reclaim_after, worker_id)
    }

    fn release_claim(&self, id: GameId, worker_id: &str) -> RepoResult<()> {
        self.inner.release_claim(id, worker_id)
    }
}

/// The silent player rests automatically and the round resolves.
#[tokio::test]
async fn test_silent_player_is_auto_rested() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    handle
        .submit_action(id, ALICE, PendingAction::BasicAttack, 0)
        .await
        .expect("alice submits");

    // Nothing is due before the deadline.
    let report = handle.sweep_timeouts(Utc::now()).await.expect("sweep");
    assert!(report.claimed.is_empty());

    let report = handle.sweep_timeouts(later()).await.expect("sweep");
    assert_eq!(report.claimed, vec![id]);
    assert_eq!(report.handled, 1);
    assert_eq!(report.failed, 0);

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::InProgress);
    assert_eq!(game.round_count, 2);
    assert!(game.last_round_summary.contains("Bob REST"));
    assert!(game.action_deadline.is_some());
}

/// Nobody acted: the match ends without a winner and without stats.
#[tokio::test]
async fn test_double_timeout_finishes_without_winner() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    let report = handle.sweep_timeouts(later()).await.expect("sweep");
    assert_eq!(report.handled, 1);

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.phase, Some(Phase::Resolved));
    assert_eq!(game.winner, None);
    assert_eq!(game.message, INACTIVITY_MESSAGE);
    assert_eq!(game.last_round_summary, DOUBLE_TIMEOUT_SUMMARY);
    assert!(game.stats_counted);
    assert!(handle.player_stats(ALICE).expect("stats").is_none());

    // Finished games are never claimed again.
    let report = handle.sweep_timeouts(later()).await.expect("sweep");
    assert!(report.claimed.is_empty());
}

/// A running game that lost a seat is closed as abandoned.
#[tokio::test]
async fn test_game_missing_a_player_is_abandoned() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    let games = &handle.repositories().games;
    let mut game = games.get_game(id).expect("load").expect("game exists");
    game.players.pop();
    games.update_game(&game).expect("store");

    handle.sweep_timeouts(later()).await.expect("sweep");

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, None);
    assert_eq!(game.last_round_summary, ABANDONED_SUMMARY);
}

/// Reading a game past its deadline applies the timeout on the spot.
#[tokio::test]
async fn test_get_game_applies_overdue_timeout() {
    let runtime = runtime();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    handle
        .submit_action(id, BOB, PendingAction::Defend, 0)
        .await
        .expect("bob submits");
    expire_deadline(&handle, id);

    let game = handle.get_game(id).await.expect("read");
    assert_eq!(game.round_count, 2);
    assert!(game.last_round_summary.contains("Alice REST"));

    let stored = handle
        .repositories()
        .games
        .get_game(id)
        .expect("load")
        .expect("game exists");
    assert_eq!(stored.round_count, 2);
}

/// Two workers never hold the same game; stale claims are taken over.
#[tokio::test]
async fn test_claims_are_exclusive_until_stale() {
    let games = Arc::new(InMemoryGameRepo::new());
    let repos = Repositories::new(
        games.clone(),
        Arc::new(InMemoryEntityRepo::new(catalog())),
        Arc::new(InMemoryStatsRepo::new()),
    );
    let runtime = runtime_with(repos);
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    let now = later();
    let reclaim = Duration::seconds(120);
    assert_eq!(
        games
            .claim_timed_out_game_ids(now, 10, reclaim, "worker-a")
            .expect("claim"),
        vec![id]
    );
    assert!(
        games
            .claim_timed_out_game_ids(now, 10, reclaim, "worker-b")
            .expect("claim")
            .is_empty()
    );

    // Releasing someone else's claim is a no-op.
    games.release_claim(id, "worker-b").expect("release");
    let claim = games.claim(id).expect("read claim").expect("still claimed");
    assert_eq!(claim.worker_id, "worker-a");

    let stale = now + reclaim;
    assert_eq!(
        games
            .claim_timed_out_game_ids(stale, 10, reclaim, "worker-b")
            .expect("claim"),
        vec![id]
    );
    let claim = games.claim(id).expect("read claim").expect("claimed");
    assert_eq!(claim.worker_id, "worker-b");
    assert_eq!(claim.claimed_at, stale);
}

/// A failed handling keeps the claim; the next stale pass retries it.
#[tokio::test]
async fn test_failed_handling_keeps_claim() {
    let games = Arc::new(FlakyGames::new());
    let repos = Repositories::new(
        games.clone(),
        Arc::new(InMemoryEntityRepo::new(catalog())),
        Arc::new(InMemoryStatsRepo::new()),
    );
    let config = ServiceConfig::default().with_worker_id("sweeper");
    let reclaim = Duration::from_std(config.reclaim_after).expect("reclaim fits");
    let runtime = Runtime::builder()
        .config(config)
        .repositories(repos)
        .enable_timeout_worker(false)
        .build();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    games.reject_updates.store(true, Ordering::SeqCst);
    let now = later();
    let report = handle.sweep_timeouts(now).await.expect("sweep");
    assert_eq!(report.claimed, vec![id]);
    assert_eq!(report.failed, 1);
    let claim = games.inner.claim(id).expect("read claim").expect("kept");
    assert_eq!(claim.worker_id, "sweeper");

    // Still fresh: nobody picks it up.
    let report = handle.sweep_timeouts(now).await.expect("sweep");
    assert!(report.claimed.is_empty());

    games.reject_updates.store(false, Ordering::SeqCst);
    let report = handle.sweep_timeouts(now + reclaim).await.expect("sweep");
    assert_eq!(report.handled, 1);
    assert!(games.inner.claim(id).expect("read claim").is_none());

    let game = handle.get_game(id).await.expect("reload");
    assert_eq!(game.status, GameStatus::Finished);
}

/// A decisive round whose store fails credits nobody; the retry credits once.
#[tokio::test]
async fn test_failed_store_does_not_credit_stats() {
    let games = Arc::new(FlakyGames::new());
    let repos = Repositories::new(
        games.clone(),
        Arc::new(InMemoryEntityRepo::new(catalog())),
        Arc::new(InMemoryStatsRepo::new()),
    );
    let runtime = runtime_with(repos);
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), fragile_specs()).await;

    let mut rounds = 0;
    let game = loop {
        rounds += 1;
        assert!(rounds <= 5, "match should end quickly");
        handle
            .submit_action(id, ALICE, PendingAction::BasicAttack, 0)
            .await
            .expect("alice attacks");

        games.reject_updates.store(true, Ordering::SeqCst);
        handle
            .submit_action(id, BOB, PendingAction::BasicAttack, 0)
            .await
            .expect_err("store rejected");
        games.reject_updates.store(false, Ordering::SeqCst);

        let stored = games.get_game(id).expect("load").expect("game exists");
        assert_eq!(stored.status, GameStatus::InProgress);
        assert!(!stored.stats_counted);
        assert!(handle.player_stats(ALICE).expect("stats").is_none());
        assert!(handle.player_stats(BOB).expect("stats").is_none());

        let outcome = handle
            .submit_action(id, BOB, PendingAction::BasicAttack, 0)
            .await
            .expect("bob retries");
        assert!(outcome.resolved);
        if outcome.game.is_finished() {
            break outcome.game;
        }
    };

    assert_eq!(game.winner.as_deref(), Some("Alice"));
    let stored = games.get_game(id).expect("load").expect("game exists");
    assert!(stored.stats_counted);
    let alice = handle.player_stats(ALICE).expect("stats").expect("alice row");
    assert_eq!((alice.games_played, alice.wins), (1, 1));
    let bob = handle.player_stats(BOB).expect("stats").expect("bob row");
    assert_eq!((bob.games_played, bob.wins), (1, 0));
}

/// A resignation whose store fails leaves the leaderboard untouched.
#[tokio::test]
async fn test_failed_resignation_store_does_not_credit_stats() {
    let games = Arc::new(FlakyGames::new());
    let repos = Repositories::new(
        games.clone(),
        Arc::new(InMemoryEntityRepo::new(catalog())),
        Arc::new(InMemoryStatsRepo::new()),
    );
    let runtime = runtime_with(repos);
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    games.reject_updates.store(true, Ordering::SeqCst);
    handle.end_game(id, BOB).await.expect_err("store rejected");
    games.reject_updates.store(false, Ordering::SeqCst);
    assert!(handle.player_stats(BOB).expect("stats").is_none());

    let game = handle.end_game(id, BOB).await.expect("resign");
    assert!(game.stats_counted);
    let bob = handle.player_stats(BOB).expect("stats").expect("bob row");
    assert_eq!((bob.games_played, bob.resignations), (1, 1));
}

/// The background worker finishes idle matches on its own.
#[tokio::test]
async fn test_worker_sweeps_in_background() {
    let config = ServiceConfig {
        action_timeout: StdDuration::ZERO,
        poll_interval: StdDuration::from_millis(20),
        ..ServiceConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .repositories(Repositories::in_memory(catalog()))
        .build();
    let handle = runtime.handle();
    let id = started(&handle, strong_specs(), sturdy_specs()).await;

    let metrics = runtime.metrics();
    tokio::time::timeout(StdDuration::from_secs(5), async {
        while metrics.snapshot().handled == 0 {
            tokio::time::sleep(StdDuration::from_millis(20)).await;
        }
    })
    .await
    .expect("worker handled the game");

    let game = handle
        .repositories()
        .games
        .get_game(id)
        .expect("load")
        .expect("game exists");
    assert!(game.is_finished());
    assert_eq!(game.last_round_summary, DOUBLE_TIMEOUT_SUMMARY);
    assert!(metrics.snapshot().sweeps >= 1);

    runtime.shutdown().await.expect("shutdown");
}
