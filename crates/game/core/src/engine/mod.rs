//! Round resolution state machine.
//!
//! [`resolve_round`] turns the two submitted actions of a planning round into
//! a single outcome:
//!
//! ```text
//! stun override -> pre-effects (p1, p2) -> plans -> execution -> reserves -> finalize
//! ```
//!
//! Everything here is synchronous and in-memory. Callers are responsible for
//! serializing access per game and persisting the mutated aggregate.
pub mod execute;
pub mod finalize;
pub mod lifecycle;
pub mod plans;
pub mod pre_effects;
pub mod reserve;

pub use execute::execute_plans;
pub use finalize::{NEW_ROUND_MESSAGE, finalize_round};
pub use lifecycle::{
    ABANDONED_SUMMARY, DOUBLE_TIMEOUT_SUMMARY, INACTIVITY_MESSAGE, LifecycleError,
    START_FAILED_MESSAGE, START_MESSAGE, begin_match, check_startable, expire_for_inactivity,
    fail_start, resign,
};
pub use plans::{Plan, PlanAction, build_plans};
pub use pre_effects::{apply_pre_effects, apply_stun_overrides};
pub use reserve::bring_in_reserve;

use crate::config::GameConfig;
use crate::rng::RoundRng;
use crate::state::{Game, Hybrid, Phase, Player};

/// Position of a hybrid inside a game: player index plus hybrid index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub player: usize,
    pub hybrid: usize,
}

/// Narrative accumulated while a round resolves.
#[derive(Clone, Debug, Default)]
pub struct RoundContext {
    pub round: u32,
    lines: Vec<String>,
}

impl RoundContext {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            lines: Vec::new(),
        }
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn summary(&self) -> String {
        self.lines.join("\n")
    }

    /// Inclusive expiry round for an effect lasting `rounds` rounds from now.
    pub fn until(&self, rounds: u32) -> u32 {
        self.round + rounds.max(1) - 1
    }
}

/// What a resolved round produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// Round that was resolved.
    pub round: u32,
    pub finished: bool,
    /// Display name of the winner when the round ended the match.
    pub winner: Option<String>,
    pub summary: String,
}

/// Resolves the current planning round of `game`.
///
/// Returns `None` without touching the game when it does not seat exactly two
/// players that each have a fighting hybrid.
pub fn resolve_round(game: &mut Game, rng: &mut (impl RoundRng + ?Sized)) -> Option<RoundReport> {
    if game.players.len() != GameConfig::PLAYERS_PER_GAME {
        return None;
    }
    let first = Slot {
        player: 0,
        hybrid: game.players[0].active_index()?,
    };
    let second = Slot {
        player: 1,
        hybrid: game.players[1].active_index()?,
    };

    game.phase = Some(Phase::Resolving);
    game.action_deadline = None;
    let mut ctx = RoundContext::new(game.round_count);

    apply_stun_overrides(game, [first, second], &mut ctx);
    apply_pre_effects(game, first, second, &mut ctx);
    apply_pre_effects(game, second, first, &mut ctx);

    let plans = build_plans(game, [first, second], ctx.round, rng);
    execute_plans(game, &plans, &mut ctx, rng);

    for player in &mut game.players {
        bring_in_reserve(player, &mut ctx);
    }

    Some(finalize_round(game, ctx))
}

/// Borrows two hybrids owned by different players at once.
pub(crate) fn pair_mut(
    players: &mut [Player],
    actor: Slot,
    target: Slot,
) -> (&mut Hybrid, &mut Hybrid) {
    debug_assert_ne!(actor.player, target.player);
    if actor.player < target.player {
        let (left, right) = players.split_at_mut(target.player);
        (
            &mut left[actor.player].hybrids[actor.hybrid],
            &mut right[0].hybrids[target.hybrid],
        )
    } else {
        let (left, right) = players.split_at_mut(actor.player);
        (
            &mut right[0].hybrids[actor.hybrid],
            &mut left[target.player].hybrids[target.hybrid],
        )
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::ability::{Ability, SkillEffect};
    use crate::config::GameConfig;
    use crate::state::{
        CombatStats, Entity, EntityId, Game, GameStatus, Hybrid, Phase, PendingAction, Player,
    };

    pub fn stats(hit_points: i32, attack: i32, defense: i32, agility: i32) -> CombatStats {
        CombatStats {
            hit_points,
            attack,
            defense,
            agility,
            energy: 2,
            vigor: GameConfig::DEFAULT_STARTING_VIGOR,
        }
    }

    pub fn entity(id: u32, name: &str, key: &str, effect: SkillEffect) -> Entity {
        Entity {
            id: EntityId(id),
            name: name.to_owned(),
            hit_points: 10,
            attack: 3,
            defense: 1,
            agility: 2,
            energy: 1,
            vigor_cost: 1,
            ability: Ability {
                name: format!("{name} Move"),
                description: String::new(),
                cost: 1,
                key: key.to_owned(),
                effect,
            },
        }
    }

    pub fn hybrid(name: &str, stats: CombatStats, active: bool) -> Hybrid {
        Hybrid {
            name: name.to_owned(),
            base: stats,
            current: stats,
            is_active: active,
            ..Hybrid::default()
        }
    }

    /// Two-player game in round 1 planning; each player gets the given hybrids.
    pub fn duel(first: Vec<Hybrid>, second: Vec<Hybrid>) -> Game {
        let mut a = Player::new("a@example.com", "Alice");
        a.hybrids = first;
        a.has_created = true;
        let mut b = Player::new("b@example.com", "Bob");
        b.hybrids = second;
        b.has_created = true;
        Game {
            status: GameStatus::InProgress,
            phase: Some(Phase::Planning),
            round_count: 1,
            turn_number: 1,
            players: vec![a, b],
            ..Game::default()
        }
    }

    pub fn submit(game: &mut Game, player: usize, action: PendingAction, entity: Option<u32>) {
        game.players[player].submit(action, entity.map(EntityId));
    }
}
