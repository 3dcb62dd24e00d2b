//! Runs ordered plans and writes the damage narrative.

use super::{Plan, RoundContext, pair_mut};
use crate::ability::StrikeKind;
use crate::combat::{DamageRoll, apply_damage, calculate_damage};
use crate::config::GameConfig;
use crate::rng::RoundRng;
use crate::state::{Game, Hybrid};
use crate::stats::{effective_attack, effective_defense, scale_down};

/// Executes `plans` in order against `game`.
///
/// A plan is skipped when either side is already defeated or the actor is
/// locked out of attacking this round. Defeat is checked for both sides after
/// every plan.
pub fn execute_plans(
    game: &mut Game,
    plans: &[Plan],
    ctx: &mut RoundContext,
    rng: &mut (impl RoundRng + ?Sized),
) {
    for plan in plans {
        let actor_owner = game.players[plan.actor.player].display_name.clone();
        let target_owner = game.players[plan.target.player].display_name.clone();
        let (actor, target) = pair_mut(&mut game.players, plan.actor, plan.target);

        if actor.is_defeated || target.is_defeated {
            continue;
        }
        if actor.modifiers.cannot_attack(ctx.round) {
            ctx.log(format!(
                "{actor_owner}'s {} cannot attack this round",
                actor.display_name()
            ));
            continue;
        }

        let names = Names {
            actor_owner: &actor_owner,
            target_owner: &target_owner,
        };
        strike(plan, &names, actor, target, ctx, rng);

        if target.settle_defeat() {
            ctx.log(format!("{target_owner}'s {} is defeated!", target.display_name()));
        }
        if actor.settle_defeat() {
            ctx.log(format!("{actor_owner}'s {} is defeated!", actor.display_name()));
        }
    }
}

struct Names<'a> {
    actor_owner: &'a str,
    target_owner: &'a str,
}

fn strike(
    plan: &Plan,
    names: &Names<'_>,
    actor: &mut Hybrid,
    target: &mut Hybrid,
    ctx: &mut RoundContext,
    rng: &mut (impl RoundRng + ?Sized),
) {
    let round = ctx.round;
    let kind = plan.strike();
    let mut roll = DamageRoll {
        attack: effective_attack(actor, round),
        defense: effective_defense(target, round),
        bonus: 0,
        defense_ignored: actor.modifiers.ignores_defense_this_round,
        halved: actor.modifiers.attack_halved_this_round,
        vulnerable: target.modifiers.vulnerable_this_round,
    };

    let mut extras = Vec::new();
    match kind {
        StrikeKind::Basic | StrikeKind::Stun { .. } => {}
        StrikeKind::Swift {
            agility_divisor,
            ignore_defense_percent,
        } => {
            if ignore_defense_percent > 0 {
                roll.defense = scale_down(roll.defense, ignore_defense_percent);
                extras.push(format!("{ignore_defense_percent}% of defense ignored"));
            }
            roll.bonus = actor.current.agility.max(0) / agility_divisor.max(1) as i32;
            extras.push(format!("+{} from agility", roll.bonus));
        }
        StrikeKind::Charge { extra_attack, .. } => {
            roll.attack += extra_attack;
            extras.push(format!("+{extra_attack} charge attack"));
        }
    }

    let outcome = calculate_damage(&roll);
    apply_damage(target, outcome.total);

    let mut line = format!(
        "{} {}: Attack {}, Defense {}",
        names.actor_owner, plan.label, roll.attack, outcome.defense
    );
    if roll.defense_ignored {
        line.push_str(" (defense ignored)");
    }
    line.push_str(&format!("; base damage {}", outcome.base));
    if !extras.is_empty() {
        line.push_str(&format!(" ({})", extras.join(", ")));
    }
    if roll.halved {
        line.push_str(" (halved due to 0 VIG)");
    }
    if roll.vulnerable {
        line.push_str("; +25% vs Vulnerable");
    }
    line.push_str(&format!("; final damage {}", outcome.total));
    ctx.log(line);

    let mut tags = Vec::new();
    if target.modifiers.defend_stance_active {
        tags.push("defend bonus".to_owned());
    }
    let mods = &target.modifiers;
    if mods.defense_buff_multiplier > 0 && mods.defense_buff_until_round >= round {
        tags.push(format!("defense x{}", mods.defense_buff_multiplier));
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" ({})", tags.join(", "))
    };
    ctx.log(format!(
        "{}'s {} takes {} damage{tags}",
        names.target_owner,
        target.display_name(),
        outcome.total
    ));

    match kind {
        StrikeKind::Charge { recoil_percent, .. } => {
            let recoil = (outcome.total * recoil_percent as i32 / 100).max(GameConfig::MIN_DAMAGE);
            apply_damage(actor, recoil);
            ctx.log(format!(
                "{}'s {} takes {recoil} recoil damage",
                names.actor_owner,
                actor.display_name()
            ));
        }
        StrikeKind::Stun {
            chance_percent,
            rounds,
        } => {
            if target.current.hit_points > 0 && rng.chance(chance_percent) {
                target.modifiers.stunned_until_round = round + rounds;
                ctx.log(format!(
                    "{}'s {} is stunned until round {}",
                    names.target_owner,
                    target.display_name(),
                    round + rounds
                ));
            } else {
                ctx.log(format!("{}'s stun fails", names.actor_owner));
            }
        }
        StrikeKind::Basic | StrikeKind::Swift { .. } => {}
    }
}
