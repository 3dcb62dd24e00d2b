//! Cost payment and instant effects, applied before any damage.

use super::{RoundContext, Slot, pair_mut};
use crate::ability::InstantEffect;
use crate::config::GameConfig;
use crate::state::{EntityId, Game, Hybrid, PendingAction};

const VULNERABLE_TAG: &str = " (not enough VIG: Vulnerable, +25% damage taken this round)";

/// Forces stunned hybrids to skip, overriding whatever their owner declared.
pub fn apply_stun_overrides(game: &mut Game, slots: [Slot; 2], ctx: &mut RoundContext) {
    for slot in slots {
        let player = &mut game.players[slot.player];
        let hybrid = &player.hybrids[slot.hybrid];
        if hybrid.modifiers.is_stunned(ctx.round) {
            ctx.log(format!(
                "{}'s {} is stunned and skips the round",
                player.display_name,
                hybrid.display_name()
            ));
            player.pending_action = PendingAction::Skip;
            player.pending_entity = None;
        }
    }
}

/// Pays costs and applies instant effects for the player at `actor`.
pub fn apply_pre_effects(game: &mut Game, actor: Slot, opponent: Slot, ctx: &mut RoundContext) {
    let round = ctx.round;
    let player = &game.players[actor.player];
    let name = player.display_name.clone();
    let action = player.pending_action;
    let pending_entity = player.pending_entity;

    let (me, foe) = pair_mut(&mut game.players, actor, opponent);
    me.modifiers.attack_halved_this_round = false;
    me.modifiers.vulnerable_this_round = false;
    me.modifiers.ignores_defense_this_round = me.modifiers.ignores_defense_until_round >= round;
    me.last_action = Some(action.to_string());

    match action {
        PendingAction::Defend => {
            if me.current.vigor > 0 {
                me.current.vigor -= 1;
                me.modifiers.defend_stance_active = true;
                ctx.log(format!("{name} DEFEND: spent 1 VIG (+50% Defense this round)"));
            } else {
                me.modifiers.defend_stance_active = false;
                ctx.log(format!("{name} DEFEND: 0 VIG, no defense bonus"));
            }
        }
        PendingAction::BasicAttack => {
            if me.current.vigor > 0 {
                me.current.vigor -= 1;
                ctx.log(format!("{name} BASIC ATTACK: spent 1 VIG"));
            } else {
                me.modifiers.attack_halved_this_round = true;
                ctx.log(format!("{name} BASIC ATTACK: 0 VIG, attack halved this round"));
            }
        }
        PendingAction::Rest => {
            let cap = me.base.vigor.max(me.current.vigor);
            me.current.vigor = (me.current.vigor + GameConfig::REST_VIGOR_GAIN).min(cap);
            me.current.energy += GameConfig::REST_ENERGY_GAIN;
            ctx.log(format!(
                "{name} REST: VIG {}, Energy {}",
                me.current.vigor, me.current.energy
            ));
        }
        PendingAction::Ability => {
            let entity = pending_entity.or(me.selected_ability);
            apply_ability(me, foe, entity, &name, ctx);
        }
        PendingAction::Skip | PendingAction::None => {}
    }
}

fn apply_ability(
    me: &mut Hybrid,
    foe: &mut Hybrid,
    entity: Option<EntityId>,
    name: &str,
    ctx: &mut RoundContext,
) {
    let Some(entity) = entity.and_then(|id| me.entity(id)).cloned() else {
        ctx.log(format!("{name} ABILITY: no usable ability, action wasted"));
        return;
    };
    let ability = &entity.ability;

    let energy_spent = me.current.energy.min(ability.cost).max(0);
    me.current.energy -= energy_spent;

    let vigor_cost = entity.vigor_cost.max(0);
    let vigor_spent = if me.current.vigor >= vigor_cost {
        me.current.vigor -= vigor_cost;
        vigor_cost
    } else {
        let spent = me.current.vigor.max(0);
        me.current.vigor = 0;
        me.modifiers.vulnerable_this_round = true;
        spent
    };
    let vulnerable = if me.modifiers.vulnerable_this_round {
        VULNERABLE_TAG
    } else {
        ""
    };
    let costs = format!("Costs: Energy {energy_spent}, VIG {vigor_spent}{vulnerable}");
    let headline = ability.headline();
    let foe_name = foe.display_name().to_owned();

    let effects = ability.effect.instant_effects();
    if effects.is_empty() {
        ctx.log(format!("{name} ABILITY: {headline}. {costs}"));
        return;
    }

    for effect in effects {
        let detail = match effect {
            InstantEffect::OpponentAttackDebuff { percent, rounds } => {
                foe.modifiers.attack_debuff_percent = percent;
                foe.modifiers.attack_debuff_until_round = ctx.until(rounds);
                format!("lowers {foe_name}'s Attack by {percent}% for {rounds} round(s)")
            }
            InstantEffect::AttackBuff {
                percent,
                rounds,
                ignores_defense_rounds,
            } => {
                me.modifiers.attack_buff_percent = percent;
                me.modifiers.attack_buff_until_round = ctx.until(rounds);
                match ignores_defense_rounds {
                    Some(ignore_rounds) => {
                        me.modifiers.ignores_defense_this_round = true;
                        me.modifiers.ignores_defense_until_round = ctx.until(ignore_rounds);
                        format!("raises Attack by {percent}% and ignores defense")
                    }
                    None => format!("raises Attack by {percent}%"),
                }
            }
            InstantEffect::DefenseBuff {
                multiplier,
                rounds,
                cannot_attack_rounds,
            } => {
                me.modifiers.defense_buff_multiplier = multiplier;
                me.modifiers.defense_buff_until_round = ctx.until(rounds);
                match cannot_attack_rounds {
                    Some(lock_rounds) => {
                        me.modifiers.cannot_attack_until_round = ctx.until(lock_rounds);
                        format!("multiplies Defense by {multiplier}x but cannot attack")
                    }
                    None => format!("multiplies Defense by {multiplier}x"),
                }
            }
            InstantEffect::RestoreEnergy { amount } => {
                me.current.energy += amount;
                format!("restores {amount} Energy")
            }
            InstantEffect::OpponentAgilityDebuff { percent, rounds } => {
                foe.modifiers.agility_debuff_percent = percent;
                foe.modifiers.agility_debuff_until_round = ctx.until(rounds);
                format!("lowers {foe_name}'s Agility by {percent}% for {rounds} round(s)")
            }
        };
        ctx.log(format!("{name} ABILITY: {headline} {detail}. {costs}"));
    }
}
