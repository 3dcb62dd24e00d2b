//! Damage calculation and application.

use crate::config::GameConfig;
use crate::state::Hybrid;

/// Inputs for one strike, already reduced to effective values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageRoll {
    pub attack: i32,
    pub defense: i32,
    /// Added after the minimum-damage floor (swift agility bonus).
    pub bonus: i32,
    pub defense_ignored: bool,
    pub halved: bool,
    pub vulnerable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Defense actually subtracted (zero when ignored).
    pub defense: i32,
    /// Damage before the halved and vulnerable adjustments.
    pub base: i32,
    pub total: i32,
}

/// Calculate damage from a strike.
///
/// # Formula
///
/// ```text
/// defense = 0 if ignored
/// base    = max(attack - defense, 1) + bonus
/// if halved:     base = max(floor(base / 2), 1)
/// if vulnerable: base = ceil(base * 5 / 4)
/// ```
pub fn calculate_damage(roll: &DamageRoll) -> DamageOutcome {
    let defense = if roll.defense_ignored { 0 } else { roll.defense };
    let base = (roll.attack - defense).max(GameConfig::MIN_DAMAGE) + roll.bonus.max(0);

    let mut total = base;
    if roll.halved {
        total = (total / 2).max(GameConfig::MIN_DAMAGE);
    }
    if roll.vulnerable {
        let num = GameConfig::VULNERABLE_NUMERATOR;
        let den = GameConfig::VULNERABLE_DENOMINATOR;
        total = (total * num + den - 1) / den;
    }

    DamageOutcome {
        defense,
        base,
        total,
    }
}

/// Subtracts `damage` from the hybrid's hit points, clamped at zero.
pub fn apply_damage(hybrid: &mut Hybrid, damage: i32) {
    hybrid.current.hit_points = (hybrid.current.hit_points - damage.max(0)).max(0);
}
