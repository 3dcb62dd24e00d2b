//! Game services: every operation that loads, mutates and stores a game.
//!
//! Each mutating call holds the game's [`GameLocks`](crate::GameLocks) guard
//! from load to store. Mutations happen on an owned copy of the aggregate; if
//! storing fails the copy is dropped and the stored game stays authoritative.
mod hybrids;
mod matches;
mod submission;
mod timeout;

use chimera_core::Game;
use tracing::warn;

use crate::repository::Repositories;

pub use hybrids::HybridService;
pub use matches::{JOIN_CODE_LEN, JOINED_MESSAGE, MatchService, PLAYER_LEFT_MESSAGE, STARTING_MESSAGE};
pub use submission::{SubmissionCoordinator, SubmitOutcome};
pub use timeout::{SweepReport, TimeoutCoordinator, TimeoutOutcome};

/// Credits a finished game to the leaderboard and stores the counted flag.
///
/// Call only after the finished game itself is stored. A stored finished game
/// never transitions again, so counters are credited at most once even when
/// the flag write below fails.
pub(crate) fn settle_stats(repos: &Repositories, game: &mut Game, resigned: Option<&str>) {
    if !game.is_finished() || game.stats_counted {
        return;
    }
    if let Err(err) = repos.stats.update_stats_on_game_end(game, resigned) {
        warn!(game_id = %game.id, error = %err, "failed to update stats");
        return;
    }
    game.stats_counted = true;
    if let Err(err) = repos.games.update_game(game) {
        warn!(game_id = %game.id, error = %err, "failed to store stats flag");
    }
}
