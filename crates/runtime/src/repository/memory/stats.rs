use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::RwLock;

use chimera_core::Game;

use crate::repository::{PlayerStats, RepositoryError, Result, StatsRepository};

/// In-memory leaderboard keyed by player email.
pub struct InMemoryStatsRepo {
    players: RwLock<HashMap<String, PlayerStats>>,
}

impl InMemoryStatsRepo {
    pub fn new() -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStatsRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsRepository for InMemoryStatsRepo {
    fn update_stats_on_game_end(&self, game: &Game, resigned_email: Option<&str>) -> Result<()> {
        let mut players = self
            .players
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        for player in &game.players {
            let entry = players
                .entry(player.email.clone())
                .or_insert_with(|| PlayerStats {
                    email: player.email.clone(),
                    ..PlayerStats::default()
                });
            entry.display_name = player.display_name.clone();
            entry.games_played += 1;

            let won = game.winner.as_deref() == Some(player.display_name.as_str())
                && !player.is_wiped_out();
            if won {
                entry.wins += 1;
            }
            if resigned_email == Some(player.email.as_str()) {
                entry.resignations += 1;
            }
        }
        Ok(())
    }

    fn stats(&self, email: &str) -> Result<Option<PlayerStats>> {
        let players = self
            .players
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(players.get(email).cloned())
    }

    fn top_players(&self, limit: usize) -> Result<Vec<PlayerStats>> {
        let players = self
            .players
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ranked: Vec<PlayerStats> = players.values().cloned().collect();
        ranked.sort_by(|a, b| {
            (Reverse(a.wins), Reverse(a.games_played), &a.email).cmp(&(
                Reverse(b.wins),
                Reverse(b.games_played),
                &b.email,
            ))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}
