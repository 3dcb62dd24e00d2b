use super::entity::{Entity, EntityId};

/// Combat numbers tracked twice per hybrid: once as the base snapshot taken at
/// creation and once as the live values mutated by rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub hit_points: i32,
    pub attack: i32,
    pub defense: i32,
    pub agility: i32,
    pub energy: i32,
    pub vigor: i32,
}

/// Round-scoped modifiers. `*_until_round` fields are inclusive: the modifier
/// is active while the current round is at or below the stored value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundModifiers {
    pub stunned_until_round: u32,

    pub attack_debuff_percent: u32,
    pub attack_debuff_until_round: u32,
    pub attack_buff_percent: u32,
    pub attack_buff_until_round: u32,

    pub defense_buff_multiplier: u32,
    pub defense_buff_until_round: u32,
    pub defend_stance_active: bool,

    pub agility_debuff_percent: u32,
    pub agility_debuff_until_round: u32,

    pub cannot_attack_until_round: u32,
    pub ignores_defense_until_round: u32,

    // Reset at pre-effects.
    pub attack_halved_this_round: bool,
    pub vulnerable_this_round: bool,
    pub ignores_defense_this_round: bool,
}

impl RoundModifiers {
    pub fn is_stunned(&self, round: u32) -> bool {
        self.stunned_until_round >= round
    }

    pub fn cannot_attack(&self, round: u32) -> bool {
        self.cannot_attack_until_round >= round
    }

    /// Drops everything that only lasts until the end of a round.
    pub fn clear_round_buffs(&mut self) {
        self.defend_stance_active = false;
        self.defense_buff_multiplier = 0;
        self.defense_buff_until_round = 0;
        self.attack_buff_percent = 0;
        self.attack_buff_until_round = 0;
        self.attack_debuff_percent = 0;
        self.attack_debuff_until_round = 0;
        self.attack_halved_this_round = false;
        self.vulnerable_this_round = false;
        self.ignores_defense_this_round = false;
    }
}

/// Fighting unit fused from two or three catalog entities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hybrid {
    /// Derived name: component names sorted case-insensitively, joined with " + ".
    pub name: String,
    pub generated_name: Option<String>,
    pub image_url: Option<String>,
    pub base_entities: Vec<Entity>,
    pub base: CombatStats,
    pub current: CombatStats,
    pub selected_ability: Option<EntityId>,
    pub is_active: bool,
    pub is_defeated: bool,
    pub modifiers: RoundModifiers,
    pub last_action: Option<String>,
}

impl Hybrid {
    /// Generated name when present, otherwise the derived one.
    pub fn display_name(&self) -> &str {
        self.generated_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn is_fighting(&self) -> bool {
        self.is_active && !self.is_defeated
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.base_entities.iter().find(|entity| entity.id == id)
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.base_entities.iter().map(|e| e.name.clone()).collect()
    }

    /// Restores live stats to the base snapshot and clears every modifier.
    pub fn reset_to_base(&mut self) {
        self.current = self.base;
        self.modifiers = RoundModifiers::default();
    }

    /// Marks the hybrid defeated once hit points reach zero. Returns true on the transition.
    pub fn settle_defeat(&mut self) -> bool {
        if self.is_defeated || self.current.hit_points > 0 {
            return false;
        }
        self.is_defeated = true;
        self.is_active = false;
        true
    }
}
