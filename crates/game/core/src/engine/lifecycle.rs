//! Match-level transitions outside a regular round: start, inactivity
//! expiry, resignation, and failed starts.

use super::finalize::start_round;
use crate::config::GameConfig;
use crate::error::{ErrorKind, GameError};
use crate::state::{Game, GameStatus, Phase};

pub const START_MESSAGE: &str = "The game has started. Choose your actions.";
pub const START_FAILED_MESSAGE: &str = "Failed to create hybrid names or images. Please try again.";
pub const INACTIVITY_MESSAGE: &str = "Match ended due to inactivity";
pub const ABANDONED_SUMMARY: &str = "No resolution was reached due to inactivity.";
pub const DOUBLE_TIMEOUT_SUMMARY: &str =
    "Round timed out: both players failed to submit actions within the allotted time.";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("a match needs exactly two players")]
    NotEnoughPlayers,

    #[error("both players must create their hybrids before the match starts")]
    PlayersNotReady,

    #[error("game has already started")]
    GameAlreadyStarted,

    #[error("player is not part of this game")]
    PlayerNotInGame,

    #[error("game is already finished")]
    GameFinished,
}

impl GameError for LifecycleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::PlayerNotInGame => ErrorKind::NotFound,
            _ => ErrorKind::StateConflict,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughPlayers => "not_enough_players",
            Self::PlayersNotReady => "players_not_ready",
            Self::GameAlreadyStarted => "game_already_started",
            Self::PlayerNotInGame => "player_not_in_game",
            Self::GameFinished => "game_finished",
        }
    }
}

/// Checks that `game` may leave the waiting room.
pub fn check_startable(game: &Game) -> Result<(), LifecycleError> {
    if !matches!(game.status, GameStatus::WaitingForPlayers | GameStatus::Starting) {
        return Err(LifecycleError::GameAlreadyStarted);
    }
    if game.players.len() != GameConfig::PLAYERS_PER_GAME {
        return Err(LifecycleError::NotEnoughPlayers);
    }
    let ready = game
        .players
        .iter()
        .all(|p| p.has_created && p.hybrids.len() == GameConfig::HYBRIDS_PER_PLAYER);
    if !ready {
        return Err(LifecycleError::PlayersNotReady);
    }
    Ok(())
}

/// Puts a ready game into round 1 planning.
///
/// Every hybrid starts from its base stats; hybrids without base vigor get
/// `config.starting_vigor`. The first hybrid of each player fights first.
/// The caller arms the action deadline.
pub fn begin_match(game: &mut Game, config: &GameConfig) -> Result<(), LifecycleError> {
    check_startable(game)?;

    for player in &mut game.players {
        for (index, hybrid) in player.hybrids.iter_mut().enumerate() {
            if hybrid.base.vigor <= 0 {
                hybrid.base.vigor = config.starting_vigor;
            }
            hybrid.reset_to_base();
            hybrid.is_defeated = false;
            hybrid.is_active = index == 0;
            hybrid.last_action = None;
        }
    }

    game.status = GameStatus::InProgress;
    game.phase = Some(Phase::Planning);
    game.round_count = 1;
    game.turn_number = 1;
    game.winner = None;
    game.last_round_summary.clear();
    game.message = START_MESSAGE.to_owned();
    game.clear_submissions();
    for player in &mut game.players {
        for hybrid in player.hybrids.iter_mut().filter(|h| h.is_fighting()) {
            start_round(hybrid, game.round_count);
        }
    }
    Ok(())
}

/// Ends the match with no winner because nobody acted in time.
///
/// Stats are marked counted without crediting anyone.
pub fn expire_for_inactivity(game: &mut Game, summary: &str) {
    game.status = GameStatus::Finished;
    game.phase = Some(Phase::Resolved);
    game.winner = None;
    game.message = INACTIVITY_MESSAGE.to_owned();
    game.last_round_summary = summary.to_owned();
    game.stats_counted = true;
    game.action_deadline = None;
}

/// Ends the match because `email` resigned. Returns the resigner's display name.
pub fn resign(game: &mut Game, email: &str) -> Result<String, LifecycleError> {
    if game.is_finished() {
        return Err(LifecycleError::GameFinished);
    }
    let name = game
        .player(email)
        .map(|p| p.display_name.clone())
        .ok_or(LifecycleError::PlayerNotInGame)?;

    game.status = GameStatus::Finished;
    game.phase = Some(Phase::Resolved);
    game.winner = None;
    game.action_deadline = None;
    game.message = format!("Player resigned: {name}");
    Ok(name)
}

/// Terminal state for a start job that could not finish.
pub fn fail_start(game: &mut Game) {
    game.status = GameStatus::Error;
    game.phase = None;
    game.action_deadline = None;
    game.message = START_FAILED_MESSAGE.to_owned();
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::state::PendingAction;

    fn lobby() -> Game {
        let mut game = duel(
            vec![
                hybrid("A1", stats(10, 3, 2, 1), false),
                hybrid("A2", stats(12, 2, 2, 1), false),
            ],
            vec![
                hybrid("B1", stats(10, 3, 2, 1), false),
                hybrid("B2", stats(12, 2, 2, 1), false),
            ],
        );
        game.status = GameStatus::Starting;
        game.phase = None;
        game.round_count = 0;
        for player in &mut game.players {
            for hybrid in &mut player.hybrids {
                hybrid.base.vigor = 0;
                hybrid.current.hit_points = 1;
            }
        }
        game
    }

    #[test]
    fn begin_match_opens_round_one() {
        let mut game = lobby();
        game.players[0].submit(PendingAction::Rest, None);
        begin_match(&mut game, &GameConfig::default()).expect("starts");

        assert_eq!(game.status, GameStatus::InProgress);
        assert_eq!(game.phase, Some(Phase::Planning));
        assert_eq!(game.round_count, 1);
        assert_eq!(game.message, START_MESSAGE);
        assert!(!game.players[0].has_submitted_action);
        for player in &game.players {
            let first = &player.hybrids[0];
            let second = &player.hybrids[1];
            assert!(first.is_active && !second.is_active);
            assert_eq!(first.current.vigor, GameConfig::DEFAULT_STARTING_VIGOR);
            assert_eq!(first.current.hit_points, first.base.hit_points);
            // round-start energy trickle only reaches the active hybrid
            assert_eq!(first.current.energy, first.base.energy + 1);
            assert_eq!(second.current.energy, second.base.energy);
        }
    }

    #[test]
    fn begin_match_requires_created_hybrids() {
        let mut game = lobby();
        game.players[1].has_created = false;
        assert_eq!(
            begin_match(&mut game, &GameConfig::default()),
            Err(LifecycleError::PlayersNotReady)
        );

        let mut game = lobby();
        game.players.pop();
        assert_eq!(
            begin_match(&mut game, &GameConfig::default()),
            Err(LifecycleError::NotEnoughPlayers)
        );

        let mut game = lobby();
        game.status = GameStatus::InProgress;
        assert_eq!(check_startable(&game), Err(LifecycleError::GameAlreadyStarted));
    }

    #[test]
    fn inactivity_marks_stats_counted() {
        let mut game = lobby();
        expire_for_inactivity(&mut game, DOUBLE_TIMEOUT_SUMMARY);
        assert_eq!(game.status, GameStatus::Finished);
        assert!(game.stats_counted);
        assert!(game.winner.is_none());
        assert_eq!(game.message, INACTIVITY_MESSAGE);
        assert_eq!(game.last_round_summary, DOUBLE_TIMEOUT_SUMMARY);
    }

    #[test]
    fn resign_finishes_without_winner() {
        let mut game = lobby();
        assert_eq!(resign(&mut game, "b@example.com"), Ok("Bob".to_owned()));
        assert_eq!(game.message, "Player resigned: Bob");
        assert_eq!(game.phase, Some(Phase::Resolved));
        assert_eq!(
            resign(&mut game, "b@example.com"),
            Err(LifecycleError::GameFinished)
        );

        let mut game = lobby();
        assert_eq!(
            resign(&mut game, "nobody@example.com"),
            Err(LifecycleError::PlayerNotInGame)
        );
    }
}
