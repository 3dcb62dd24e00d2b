//! Match lobby and lifecycle: create, join, leave, start, resign, read.

use std::sync::Arc;

use chimera_core::engine::{begin_match, check_startable, fail_start, resign};
use chimera_core::{Game, GameId, GameStatus, LifecycleError, Player};
use chrono::Utc;
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::settle_stats;
use super::timeout::TimeoutCoordinator;
use crate::api::{Result, ServiceError};
use crate::config::ServiceConfig;
use crate::generation::GenerationService;
use crate::locks::GameLocks;
use crate::repository::{Repositories, RepositoryError};

pub const JOIN_CODE_LEN: usize = 6;
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const JOIN_CODE_ATTEMPTS: usize = 8;

pub const STARTING_MESSAGE: &str = "Your hybrid is being created. This may take a few moments.";
pub const JOINED_MESSAGE: &str = "Second player joined. Waiting for the game to start.";
pub const PLAYER_LEFT_MESSAGE: &str = "A player left. Waiting for a new participant.";

/// Generated artwork and name for one hybrid, by seat and slot.
struct Presentation {
    seat: usize,
    slot: usize,
    name: String,
    image_url: String,
}

#[derive(Clone)]
pub struct MatchService {
    repos: Repositories,
    locks: GameLocks,
    generation: Arc<GenerationService>,
    timeouts: TimeoutCoordinator,
    config: Arc<ServiceConfig>,
}

impl MatchService {
    pub fn new(
        repos: Repositories,
        locks: GameLocks,
        generation: Arc<GenerationService>,
        timeouts: TimeoutCoordinator,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            repos,
            locks,
            generation,
            timeouts,
            config,
        }
    }

    /// Opens a waiting room seated by `host` under a fresh join code.
    pub fn create_game(&self, name: &str, host: Player) -> Result<Game> {
        let mut last_err = None;
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let game = Game::new(name, generate_join_code(), host.clone());
            match self.repos.games.create_game(game) {
                Ok(game) => {
                    info!(game_id = %game.id, join_code = %game.join_code, host = %host.email, "game created");
                    return Ok(game);
                }
                Err(RepositoryError::DuplicateJoinCode(code)) => {
                    last_err = Some(RepositoryError::DuplicateJoinCode(code));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err
            .unwrap_or_else(|| RepositoryError::Unavailable("join code space exhausted".into()))
            .into())
    }

    /// Seats `player` in the waiting room identified by `join_code`.
    pub async fn join_game(&self, join_code: &str, player: Player) -> Result<Game> {
        let found = self
            .repos
            .games
            .find_by_join_code(join_code)?
            .ok_or_else(|| ServiceError::JoinCodeNotFound(join_code.to_owned()))?;
        let _guard = self.locks.acquire(found.id).await;

        let mut game = self.load(found.id)?;
        if game.player(&player.email).is_some() {
            return Err(ServiceError::AlreadyJoined);
        }
        if game.players.len() >= chimera_core::GameConfig::PLAYERS_PER_GAME {
            return Err(ServiceError::GameFull);
        }
        if game.status != GameStatus::WaitingForPlayers {
            return Err(LifecycleError::GameAlreadyStarted.into());
        }

        info!(game_id = %game.id, player = %player.email, "player joined");
        game.players.push(player);
        game.message = JOINED_MESSAGE.to_owned();
        self.repos.games.update_game(&game)?;
        Ok(game)
    }

    /// Removes `email` from a game that has not started.
    pub async fn leave_game(&self, game_id: GameId, email: &str) -> Result<Game> {
        let _guard = self.locks.acquire(game_id).await;

        let mut game = self.load(game_id)?;
        if game.status != GameStatus::WaitingForPlayers {
            return Err(ServiceError::CannotLeaveAfterStart);
        }
        let seat = game
            .player_index(email)
            .ok_or(ServiceError::PlayerNotInGame)?;

        game.players.remove(seat);
        game.message = PLAYER_LEFT_MESSAGE.to_owned();
        self.repos.games.update_game(&game)?;
        info!(game_id = %game_id, player = email, "player left");
        Ok(game)
    }

    /// Moves a ready waiting room to `starting` and spawns the start job.
    ///
    /// The returned handle completes once the job stored either a running
    /// match or a terminal `error` state.
    pub async fn start_game(&self, game_id: GameId) -> Result<JoinHandle<()>> {
        {
            let _guard = self.locks.acquire(game_id).await;
            let mut game = self.load(game_id)?;
            check_startable(&game)?;
            if game.status != GameStatus::WaitingForPlayers {
                return Err(LifecycleError::GameAlreadyStarted.into());
            }
            game.status = GameStatus::Starting;
            game.message = STARTING_MESSAGE.to_owned();
            self.repos.games.update_game(&game)?;
        }

        let service = self.clone();
        Ok(tokio::spawn(async move {
            service.run_start_job(game_id).await;
        }))
    }

    async fn run_start_job(&self, game_id: GameId) {
        match self.complete_start(game_id).await {
            Ok(Some(game)) => {
                info!(game_id = %game_id, round = game.round_count, "match started");
            }
            Ok(None) => {
                info!(game_id = %game_id, "start job found the game no longer starting");
            }
            Err(e) => {
                error!(game_id = %game_id, error = %e, "match start failed");
                if let Err(e) = self.mark_start_failed(game_id).await {
                    error!(game_id = %game_id, error = %e, "failed to record start failure");
                }
            }
        }
    }

    /// Generates presentation without holding the lock, then opens round 1.
    async fn complete_start(&self, game_id: GameId) -> Result<Option<Game>> {
        let snapshot = self.load(game_id)?;

        let mut presentations = Vec::new();
        for (seat, player) in snapshot.players.iter().enumerate() {
            for (slot, hybrid) in player.hybrids.iter().enumerate() {
                let creature_names = hybrid.entity_names();
                let name = match self.generation.generate_or_fetch_name(&creature_names).await {
                    Ok((name, source)) => {
                        info!(game_id = %game_id, seat, slot, ?source, name = %name, "hybrid name assigned");
                        name
                    }
                    Err(e) => {
                        warn!(game_id = %game_id, seat, slot, error = %e, "hybrid name fallback");
                        hybrid.name.clone()
                    }
                };
                let image_url = self.generation.ensure_hybrid_image(&creature_names).await?;
                presentations.push(Presentation {
                    seat,
                    slot,
                    name,
                    image_url,
                });
            }
        }

        let _guard = self.locks.acquire(game_id).await;
        let mut game = self.load(game_id)?;
        if game.status != GameStatus::Starting {
            return Ok(None);
        }
        for presentation in presentations {
            let hybrid = game
                .players
                .get_mut(presentation.seat)
                .and_then(|p| p.hybrids.get_mut(presentation.slot));
            if let Some(hybrid) = hybrid {
                hybrid.generated_name = Some(presentation.name);
                hybrid.image_url = Some(presentation.image_url);
            }
        }
        begin_match(&mut game, &self.config.game)?;
        game.action_deadline = Some(Utc::now() + self.config.action_timeout_delta());
        self.repos.games.update_game(&game)?;
        Ok(Some(game))
    }

    async fn mark_start_failed(&self, game_id: GameId) -> Result<()> {
        let _guard = self.locks.acquire(game_id).await;
        let mut game = self.load(game_id)?;
        if game.status == GameStatus::Starting {
            fail_start(&mut game);
            self.repos.games.update_game(&game)?;
        }
        Ok(())
    }

    /// Ends the match because `email` resigned. Nobody is credited a win.
    pub async fn end_game(&self, game_id: GameId, email: &str) -> Result<Game> {
        let _guard = self.locks.acquire(game_id).await;

        let mut game = self.load(game_id)?;
        resign(&mut game, email)?;
        self.repos.games.update_game(&game)?;
        settle_stats(&self.repos, &mut game, Some(email));
        info!(game_id = %game_id, player = email, "player resigned");
        Ok(game)
    }

    /// Loads a game, first applying timeout handling if its deadline passed.
    pub async fn get_game(&self, game_id: GameId) -> Result<Game> {
        let _guard = self.locks.acquire(game_id).await;

        let mut game = self.load(game_id)?;
        let outcome = self.timeouts.apply(&mut game, Utc::now())?;
        if outcome.changed() {
            self.repos.games.update_game(&game)?;
            settle_stats(&self.repos, &mut game, None);
        }
        Ok(game)
    }

    fn load(&self, game_id: GameId) -> Result<Game> {
        self.repos
            .games
            .get_game(game_id)?
            .ok_or(ServiceError::GameNotFound(game_id))
    }
}

fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| {
            let index = rng.gen_range(0..JOIN_CODE_ALPHABET.len());
            char::from(JOIN_CODE_ALPHABET[index])
        })
        .collect()
}
