//! Self-play duel between two bots.
//!
//! The bots build random valid hybrids from the catalog and pick random
//! actions each round. Now and then one bot stays silent so the round is
//! settled by a timeout sweep instead of a second submission.

use std::env;

use anyhow::{Context, Result, anyhow, bail, ensure};
use chimera_core::{Entity, Game, GameStatus, HybridSpec, PendingAction, Player};
use chimera_runtime::{RuntimeHandle, ServiceConfig};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

const MAX_ROUNDS: u32 = 200;
const SILENT_CHANCE: f64 = 0.15;
const THREE_CREATURE_CHANCE: f64 = 0.5;

const ACTIONS_WITH_ABILITY: &[PendingAction] = &[
    PendingAction::BasicAttack,
    PendingAction::BasicAttack,
    PendingAction::Ability,
    PendingAction::Defend,
    PendingAction::Rest,
];
const ACTIONS_WITHOUT_ABILITY: &[PendingAction] = &[
    PendingAction::BasicAttack,
    PendingAction::BasicAttack,
    PendingAction::Defend,
    PendingAction::Rest,
];

/// Reads `CHIMERA_DUEL_SEED`, ignoring values that are not a `u64`.
pub fn seed_from_env() -> Option<u64> {
    env::var("CHIMERA_DUEL_SEED")
        .ok()
        .and_then(|value| value.trim().parse().ok())
}

pub struct DuelDriver {
    handle: RuntimeHandle,
    rng: StdRng,
    /// How far past "now" a forced sweep looks so the silent bot's deadline has passed.
    sweep_offset: Duration,
}

impl DuelDriver {
    pub fn new(handle: RuntimeHandle, config: &ServiceConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let timeout = Duration::from_std(config.action_timeout)
            .unwrap_or_else(|_| Duration::seconds(60));
        Self {
            handle,
            rng,
            sweep_offset: timeout + Duration::seconds(1),
        }
    }

    /// Plays one full match and returns the finished game.
    pub async fn run(mut self) -> Result<Game> {
        let host = Player::new("ember@bots.local", "Ember");
        let guest = Player::new("frost@bots.local", "Frost");
        let host_email = host.email.clone();

        let game = self.handle.create_game("Self-play duel", host)?;
        let id = game.id;
        info!(game_id = %id, join_code = %game.join_code, "duel created");
        self.handle.join_game(&game.join_code, guest.clone()).await?;

        let catalog = self.handle.catalog()?;
        let [host_specs, guest_specs] = pick_hybrids(&mut self.rng, &catalog)?;
        self.handle
            .create_hybrids(id, &host_email, host_specs)
            .await?;
        self.handle
            .create_hybrids(id, &guest.email, guest_specs)
            .await?;

        self.handle
            .start_game(id)
            .await?
            .await
            .context("start job panicked")?;
        let mut game = self.handle.get_game(id).await?;
        if game.status != GameStatus::InProgress {
            bail!("duel failed to start: {}", game.message);
        }
        announce(&game);

        while !game.is_finished() {
            if game.round_count > MAX_ROUNDS {
                warn!(game_id = %id, rounds = game.round_count, "round cap reached; host resigns");
                game = self.handle.end_game(id, &host_email).await?;
                break;
            }
            game = self.play_round(&game).await?;
        }
        Ok(game)
    }

    async fn play_round(&mut self, game: &Game) -> Result<Game> {
        let round = game.round_count;
        let silent = if self.rng.gen_bool(SILENT_CHANCE) {
            Some(self.rng.gen_range(0..game.players.len()))
        } else {
            None
        };

        for (seat, player) in game.players.iter().enumerate() {
            if silent == Some(seat) {
                info!(game_id = %game.id, round, player = %player.email, "bot stays silent");
                continue;
            }
            let action = self.pick_action(player);
            debug!(game_id = %game.id, round, player = %player.email, %action, "bot submits");
            self.handle
                .submit_action(game.id, &player.email, action, 0)
                .await?;
        }

        if silent.is_some() {
            let report = self
                .handle
                .sweep_timeouts(Utc::now() + self.sweep_offset)
                .await?;
            ensure!(
                report.failed == 0,
                "timeout sweep failed for {} game(s)",
                report.failed
            );
        }

        let next = self.handle.get_game(game.id).await?;
        ensure!(
            next.round_count > round || next.is_finished(),
            "round {round} of game {} did not resolve",
            game.id
        );
        print_summary(round, &next);
        Ok(next)
    }

    fn pick_action(&mut self, player: &Player) -> PendingAction {
        let has_ability = player
            .active_hybrid()
            .is_some_and(|hybrid| hybrid.selected_ability.is_some());
        let choices = if has_ability {
            ACTIONS_WITH_ABILITY
        } else {
            ACTIONS_WITHOUT_ABILITY
        };
        choices
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(PendingAction::BasicAttack)
    }
}

/// Splits a shuffled catalog into four disjoint hybrids of two or three creatures.
fn pick_hybrids(rng: &mut StdRng, catalog: &[Entity]) -> Result<[[HybridSpec; 2]; 2]> {
    let mut ids: Vec<u32> = catalog.iter().map(|entity| entity.id.0).collect();
    ensure!(
        ids.len() >= 8,
        "a duel needs at least 8 creatures, the catalog has {}",
        ids.len()
    );
    ids.shuffle(rng);

    let mut specs = Vec::with_capacity(4);
    let mut remaining = ids.as_slice();
    for index in 0..4 {
        let reserved = (3 - index) * 2;
        let size = if remaining.len() >= 3 + reserved
            && rng.gen_bool(THREE_CREATURE_CHANCE)
        {
            3
        } else {
            2
        };
        let (members, rest) = remaining.split_at(size);
        let selected = *members
            .choose(rng)
            .context("hybrid without creatures")?;
        specs.push(HybridSpec::new(members.iter().copied(), selected));
        remaining = rest;
    }

    let [a, b, c, d]: [HybridSpec; 4] = specs
        .try_into()
        .map_err(|_| anyhow!("expected four hybrid specs"))?;
    Ok([[a, b], [c, d]])
}

fn announce(game: &Game) {
    for player in &game.players {
        let hybrids: Vec<&str> = player
            .hybrids
            .iter()
            .map(|hybrid| hybrid.display_name())
            .collect();
        info!(game_id = %game.id, player = %player.display_name, ?hybrids, "duel started");
    }
}

/// Writes the round narrative to stdout; it is match output, not a log line.
fn print_summary(round: u32, game: &Game) {
    println!("--- Round {round} ---");
    println!("{}", game.last_round_summary);
    if game.is_finished() {
        println!("{}", game.message);
    }
}
