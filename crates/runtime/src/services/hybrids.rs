use std::sync::Arc;

use chimera_core::creation::{CreationError, referenced_ids};
use chimera_core::{Game, GameId, GameStatus, HybridSpec, LifecycleError, create_hybrids};
use tracing::info;

use crate::api::{Result, ServiceError};
use crate::config::ServiceConfig;
use crate::locks::GameLocks;
use crate::repository::Repositories;

/// Pre-match hybrid assembly.
#[derive(Clone)]
pub struct HybridService {
    repos: Repositories,
    locks: GameLocks,
    config: Arc<ServiceConfig>,
}

impl HybridService {
    pub fn new(repos: Repositories, locks: GameLocks, config: Arc<ServiceConfig>) -> Self {
        Self {
            repos,
            locks,
            config,
        }
    }

    /// Builds and stores both hybrids for `email`.
    ///
    /// Only allowed while the game waits for players, and only once per
    /// player.
    pub async fn create_hybrids(
        &self,
        game_id: GameId,
        email: &str,
        specs: [HybridSpec; 2],
    ) -> Result<Game> {
        let _guard = self.locks.acquire(game_id).await;

        let mut game = self
            .repos
            .games
            .get_game(game_id)?
            .ok_or(ServiceError::GameNotFound(game_id))?;
        let seat = game
            .player_index(email)
            .ok_or(ServiceError::PlayerNotInGame)?;
        if game.players[seat].has_created {
            return Err(CreationError::HybridsAlreadyCreated.into());
        }
        if game.status != GameStatus::WaitingForPlayers {
            return Err(LifecycleError::GameAlreadyStarted.into());
        }

        let catalog = self.repos.entities.entities_by_ids(&referenced_ids(&specs))?;
        let player = &mut game.players[seat];
        create_hybrids(player, &specs, &catalog, &self.config.game)?;

        let names: Vec<&str> = player.hybrids.iter().map(|h| h.name.as_str()).collect();
        info!(game_id = %game_id, player = email, hybrids = ?names, "hybrids created");
        game.message = format!("{} created their hybrids.", player.display_name);

        self.repos.games.update_game(&game)?;
        Ok(game)
    }
}
