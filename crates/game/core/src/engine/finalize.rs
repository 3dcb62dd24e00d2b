//! Win detection and the hand-off to the next planning round.

use super::{RoundContext, RoundReport};
use crate::config::GameConfig;
use crate::state::{Game, GameStatus, Hybrid, Phase};

pub const NEW_ROUND_MESSAGE: &str = "New round. Choose your actions.";

/// Closes the round: records the summary and either ends the match or opens
/// the next planning round.
///
/// When both sides are wiped out in the same round the first seat loses.
pub fn finalize_round(game: &mut Game, ctx: RoundContext) -> RoundReport {
    let round = ctx.round;
    let summary = ctx.summary();
    game.last_round_summary = summary.clone();

    let winner_seat = if game.players[0].is_wiped_out() {
        Some(1)
    } else if game.players[1].is_wiped_out() {
        Some(0)
    } else {
        None
    };

    if let Some(seat) = winner_seat {
        let name = game.players[seat].display_name.clone();
        game.status = GameStatus::Finished;
        game.phase = Some(Phase::Resolved);
        game.action_deadline = None;
        game.message = format!("Victory for {name}");
        game.winner = Some(name.clone());
        return RoundReport {
            round,
            finished: true,
            winner: Some(name),
            summary,
        };
    }

    game.round_count += 1;
    game.turn_number = 1;
    game.clear_submissions();
    let next = game.round_count;
    for player in &mut game.players {
        for hybrid in player.hybrids.iter_mut().filter(|h| h.is_fighting()) {
            start_round(hybrid, next);
        }
    }
    game.phase = Some(Phase::Planning);
    game.message = NEW_ROUND_MESSAGE.to_owned();

    RoundReport {
        round,
        finished: false,
        winner: None,
        summary,
    }
}

/// Round-start upkeep for a fighting hybrid: energy trickle, fatigue, and
/// expiry of round-scoped buffs.
pub(crate) fn start_round(hybrid: &mut Hybrid, round: u32) {
    hybrid.current.energy += GameConfig::ROUND_ENERGY_GAIN;
    let fatigue = GameConfig::fatigue_penalty(round);
    hybrid.current.defense = (hybrid.current.defense - fatigue).max(0);
    hybrid.modifiers.clear_round_buffs();
}
