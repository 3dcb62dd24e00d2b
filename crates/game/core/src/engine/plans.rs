//! Converts declared actions into ordered, executable plans.

use std::cmp::Reverse;

use rand::seq::SliceRandom;

use super::Slot;
use crate::ability::{BASIC_ATTACK_KEY, StrikeKind};
use crate::rng::RoundRng;
use crate::state::{EntityId, Game, PendingAction};
use crate::stats::effective_agility;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanAction {
    BasicAttack,
    Ability { entity: EntityId, strike: StrikeKind },
}

/// One executable strike: who acts, on whom, and how.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub actor: Slot,
    pub target: Slot,
    pub action: PlanAction,
    /// Action identifier: `basic_attack` or the ability's skill key.
    pub key: String,
    /// Upper-cased label used in the round log.
    pub label: String,
}

impl Plan {
    pub fn strike(&self) -> StrikeKind {
        match self.action {
            PlanAction::BasicAttack => StrikeKind::Basic,
            PlanAction::Ability { strike, .. } => strike,
        }
    }
}

/// Builds 0-2 plans ordered by effective agility, fastest first.
///
/// Equal agility is broken uniformly at random through `rng`.
pub fn build_plans(
    game: &Game,
    slots: [Slot; 2],
    round: u32,
    rng: &mut (impl RoundRng + ?Sized),
) -> Vec<Plan> {
    let mut ranked: Vec<(i32, Plan)> = Vec::with_capacity(2);
    for (actor, target) in [(slots[0], slots[1]), (slots[1], slots[0])] {
        if let Some(plan) = plan_for(game, actor, target) {
            let hybrid = &game.players[actor.player].hybrids[actor.hybrid];
            ranked.push((effective_agility(hybrid, round), plan));
        }
    }

    ranked.sort_by_key(|(agility, _)| Reverse(*agility));
    let mut start = 0;
    while start < ranked.len() {
        let agility = ranked[start].0;
        let end = ranked[start..]
            .iter()
            .position(|(a, _)| *a != agility)
            .map_or(ranked.len(), |offset| start + offset);
        ranked[start..end].shuffle(rng);
        start = end;
    }

    ranked.into_iter().map(|(_, plan)| plan).collect()
}

fn plan_for(game: &Game, actor: Slot, target: Slot) -> Option<Plan> {
    let player = &game.players[actor.player];
    let hybrid = &player.hybrids[actor.hybrid];
    match player.pending_action {
        PendingAction::BasicAttack => Some(Plan {
            actor,
            target,
            action: PlanAction::BasicAttack,
            key: BASIC_ATTACK_KEY.to_owned(),
            label: "BASIC ATTACK".to_owned(),
        }),
        PendingAction::Ability => {
            let id = player.pending_entity.or(hybrid.selected_ability)?;
            let ability = &hybrid.entity(id)?.ability;
            let strike = ability.effect.strike(&ability.key)?;
            Some(Plan {
                actor,
                target,
                action: PlanAction::Ability { entity: id, strike },
                key: ability.key.clone(),
                label: ability.headline(),
            })
        }
        _ => None,
    }
}
