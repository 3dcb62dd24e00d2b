use crate::ability::Ability;

/// Catalog identifier. Zero is reserved for "no entity".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u32);

impl EntityId {
    pub const NONE: Self = Self(0);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Catalog creature that contributes stats and one ability to a hybrid.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub hit_points: i32,
    pub attack: i32,
    pub defense: i32,
    pub agility: i32,
    pub energy: i32,
    /// Vigor spent when this entity's ability is used.
    pub vigor_cost: i32,
    pub ability: Ability,
}
