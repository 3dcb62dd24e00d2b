//! Layering order for each stat:
//!
//! ```text
//! agility = current * (1 - debuff%)                      floor 0
//! defense = current * multiplier (if active) * 3/2 (if defending)   floor 0
//! attack  = current * (1 - debuff%) * (1 + buff%)        floor 0
//! ```
//!
//! Every step truncates toward zero.

use crate::config::GameConfig;
use crate::state::Hybrid;

/// `value * (100 - percent) / 100`, with `percent` capped at 100.
pub fn scale_down(value: i32, percent: u32) -> i32 {
    let percent = i64::from(percent.min(100));
    (i64::from(value) * (100 - percent) / 100) as i32
}

/// `value * (100 + percent) / 100`.
pub fn scale_up(value: i32, percent: u32) -> i32 {
    let scaled = i64::from(value) * (100 + i64::from(percent)) / 100;
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn effective_agility(hybrid: &Hybrid, round: u32) -> i32 {
    let mods = &hybrid.modifiers;
    let mut agility = hybrid.current.agility;
    if mods.agility_debuff_percent > 0 && mods.agility_debuff_until_round >= round {
        agility = scale_down(agility, mods.agility_debuff_percent);
    }
    agility.max(0)
}

pub fn effective_defense(hybrid: &Hybrid, round: u32) -> i32 {
    let mods = &hybrid.modifiers;
    let mut defense = hybrid.current.defense;
    if mods.defense_buff_multiplier > 0 && mods.defense_buff_until_round >= round {
        defense = defense.saturating_mul(mods.defense_buff_multiplier as i32);
    }
    if mods.defend_stance_active {
        defense = defense.saturating_mul(GameConfig::DEFEND_NUMERATOR) / GameConfig::DEFEND_DENOMINATOR;
    }
    defense.max(0)
}

pub fn effective_attack(hybrid: &Hybrid, round: u32) -> i32 {
    let mods = &hybrid.modifiers;
    let mut attack = hybrid.current.attack;
    if mods.attack_debuff_percent > 0 && mods.attack_debuff_until_round >= round {
        attack = scale_down(attack, mods.attack_debuff_percent);
    }
    if mods.attack_buff_percent > 0 && mods.attack_buff_until_round >= round {
        attack = scale_up(attack, mods.attack_buff_percent);
    }
    attack.max(0)
}
