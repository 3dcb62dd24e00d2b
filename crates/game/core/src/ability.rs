//! Ability definitions and their effect model.
//!
//! An [`Ability`] is configured as a flat [`SkillEffect`] record where every
//! knob is optional and a zero value means "absent". The resolver never reads
//! the flat record directly: it asks for the typed [`InstantEffect`] list that
//! runs during pre-effects and for the optional [`StrikeKind`] that runs as an
//! ordered plan.

/// Default duration, in rounds, for timed effects configured without one.
pub const DEFAULT_EFFECT_ROUNDS: u32 = 1;
pub const DEFAULT_SWIFT_AGILITY_DIVISOR: u32 = 2;
pub const DEFAULT_CHARGE_EXTRA_ATTACK: i32 = 5;
pub const DEFAULT_CHARGE_RECOIL_PERCENT: u32 = 20;
pub const DEFAULT_STUN_CHANCE_PERCENT: u32 = 50;
pub const DEFAULT_STUN_ROUNDS: u32 = 1;

/// Skill key used by plans that are plain basic attacks.
pub const BASIC_ATTACK_KEY: &str = "basic_attack";

/// Named ability owned by a catalog entity.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Ability {
    pub name: String,
    pub description: String,
    /// Energy cost.
    pub cost: i32,
    /// Strike identifier used when the ability executes as a plan.
    pub key: String,
    pub effect: SkillEffect,
}

impl Ability {
    /// Upper-cased name used in round log headlines.
    pub fn headline(&self) -> String {
        self.name.to_uppercase()
    }
}

/// Flat effect record as authored in the entity catalog.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillEffect {
    pub opponent_attack_debuff_percent: Option<u32>,
    pub opponent_attack_debuff_duration: Option<u32>,
    pub opponent_agility_debuff_percent: Option<u32>,
    pub opponent_agility_debuff_duration: Option<u32>,

    pub attack_buff_percent: Option<u32>,
    pub attack_buff_duration: Option<u32>,
    pub attack_ignores_defense: bool,
    pub attack_ignores_defense_duration: Option<u32>,

    pub defense_buff_multiplier: Option<u32>,
    pub defense_buff_duration: Option<u32>,
    pub cannot_attack: bool,
    pub cannot_attack_duration: Option<u32>,

    pub restore_energy: Option<i32>,

    /// When set, the ability also runs as an ordered strike identified by the
    /// owning ability's `key`.
    pub executes_plan: bool,

    pub swift_agility_divisor: Option<u32>,
    pub swift_ignore_defense_percent: Option<u32>,
    pub charge_extra_attack: Option<i32>,
    pub charge_recoil_percent: Option<u32>,
    pub stun_chance_percent: Option<u32>,
    pub stun_duration: Option<u32>,
}

fn present(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

fn rounds(value: Option<u32>) -> u32 {
    present(value).unwrap_or(DEFAULT_EFFECT_ROUNDS)
}

/// Effect applied immediately during pre-effects, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstantEffect {
    OpponentAttackDebuff {
        percent: u32,
        rounds: u32,
    },
    AttackBuff {
        percent: u32,
        rounds: u32,
        /// Rounds during which the holder's strikes bypass defense.
        ignores_defense_rounds: Option<u32>,
    },
    DefenseBuff {
        multiplier: u32,
        rounds: u32,
        /// Rounds during which the holder may not strike.
        cannot_attack_rounds: Option<u32>,
    },
    RestoreEnergy {
        amount: i32,
    },
    OpponentAgilityDebuff {
        percent: u32,
        rounds: u32,
    },
}

/// Strike variant executed as an ordered plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeKind {
    Basic,
    Swift {
        agility_divisor: u32,
        ignore_defense_percent: u32,
    },
    Charge {
        extra_attack: i32,
        recoil_percent: u32,
    },
    Stun {
        chance_percent: u32,
        rounds: u32,
    },
}

impl SkillEffect {
    /// Typed list of the effects that apply during pre-effects.
    pub fn instant_effects(&self) -> Vec<InstantEffect> {
        let mut effects = Vec::new();

        if let Some(percent) = present(self.opponent_attack_debuff_percent) {
            effects.push(InstantEffect::OpponentAttackDebuff {
                percent,
                rounds: rounds(self.opponent_attack_debuff_duration),
            });
        }
        if let Some(percent) = present(self.attack_buff_percent) {
            effects.push(InstantEffect::AttackBuff {
                percent,
                rounds: rounds(self.attack_buff_duration),
                ignores_defense_rounds: self
                    .attack_ignores_defense
                    .then(|| rounds(self.attack_ignores_defense_duration)),
            });
        }
        if let Some(multiplier) = present(self.defense_buff_multiplier) {
            effects.push(InstantEffect::DefenseBuff {
                multiplier,
                rounds: rounds(self.defense_buff_duration),
                cannot_attack_rounds: self
                    .cannot_attack
                    .then(|| rounds(self.cannot_attack_duration)),
            });
        }
        if let Some(amount) = self.restore_energy.filter(|v| *v > 0) {
            effects.push(InstantEffect::RestoreEnergy { amount });
        }
        if let Some(percent) = present(self.opponent_agility_debuff_percent) {
            effects.push(InstantEffect::OpponentAgilityDebuff {
                percent,
                rounds: rounds(self.opponent_agility_debuff_duration),
            });
        }

        effects
    }

    /// Strike this effect executes, or `None` for pre-effect-only abilities.
    ///
    /// The variant follows the strike parameters that are present; an
    /// ability with none of them falls back to a hint in its skill key
    /// (`"swift_pounce"` -> swift) and finally to a basic strike. Missing
    /// parameters take their defaults.
    pub fn strike(&self, key: &str) -> Option<StrikeKind> {
        if !self.executes_plan {
            return None;
        }
        let set = |v: Option<u32>| present(v).is_some();
        let key = key.to_ascii_lowercase();

        let kind = if set(self.stun_chance_percent) || set(self.stun_duration) || key.contains("stun")
        {
            StrikeKind::Stun {
                chance_percent: present(self.stun_chance_percent)
                    .unwrap_or(DEFAULT_STUN_CHANCE_PERCENT),
                rounds: present(self.stun_duration).unwrap_or(DEFAULT_STUN_ROUNDS),
            }
        } else if self.charge_extra_attack.is_some_and(|v| v > 0)
            || set(self.charge_recoil_percent)
            || key.contains("charge")
        {
            StrikeKind::Charge {
                extra_attack: self
                    .charge_extra_attack
                    .filter(|v| *v > 0)
                    .unwrap_or(DEFAULT_CHARGE_EXTRA_ATTACK),
                recoil_percent: present(self.charge_recoil_percent)
                    .unwrap_or(DEFAULT_CHARGE_RECOIL_PERCENT),
            }
        } else if set(self.swift_agility_divisor)
            || set(self.swift_ignore_defense_percent)
            || key.contains("swift")
        {
            StrikeKind::Swift {
                agility_divisor: present(self.swift_agility_divisor)
                    .unwrap_or(DEFAULT_SWIFT_AGILITY_DIVISOR),
                ignore_defense_percent: self.swift_ignore_defense_percent.unwrap_or(0).min(100),
            }
        } else {
            StrikeKind::Basic
        };
        Some(kind)
    }
}
