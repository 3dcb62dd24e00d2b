//! One-time hybrid assembly before a match starts.
//!
//! Each player submits exactly two [`HybridSpec`]s. Validation runs in a
//! fixed order so the first failing rule is the one reported:
//!
//! 1. the player has not created hybrids yet
//! 2. each hybrid lists 2 or 3 creatures
//! 3. the selected-ability creature belongs to its own hybrid
//! 4. no creature appears twice across both hybrids
//! 5. every creature exists in the catalog

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::error::{ErrorKind, GameError};
use crate::state::{CombatStats, Entity, EntityId, Hybrid, Player};

/// Requested composition for one hybrid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridSpec {
    pub entity_ids: Vec<EntityId>,
    /// Creature whose ability this hybrid may use for the whole match.
    pub selected_entity: EntityId,
}

impl HybridSpec {
    pub fn new(entity_ids: impl IntoIterator<Item = u32>, selected_entity: u32) -> Self {
        Self {
            entity_ids: entity_ids.into_iter().map(EntityId).collect(),
            selected_entity: EntityId(selected_entity),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CreationError {
    #[error("hybrids were already created for this player")]
    HybridsAlreadyCreated,

    #[error("hybrid {hybrid} has {count} creatures; expected 2 or 3")]
    InvalidHybridCount { hybrid: usize, count: usize },

    #[error("hybrid {hybrid} selects an ability from a creature it does not contain")]
    InvalidSelectedAbility { hybrid: usize },

    #[error("creature {0} is used more than once")]
    EntityReused(EntityId),

    #[error("unknown creatures: {0:?}")]
    InvalidEntities(Vec<EntityId>),
}

impl GameError for CreationError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::HybridsAlreadyCreated => ErrorKind::StateConflict,
            _ => ErrorKind::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::HybridsAlreadyCreated => "hybrids_already_created",
            Self::InvalidHybridCount { .. } => "invalid_hybrid_count",
            Self::InvalidSelectedAbility { .. } => "invalid_selected_ability",
            Self::EntityReused(_) => "entity_reused",
            Self::InvalidEntities(_) => "invalid_entities",
        }
    }
}

/// Checks composition rules that need no catalog access.
pub fn validate_specs(specs: &[HybridSpec; 2]) -> Result<(), CreationError> {
    let allowed = GameConfig::MIN_ENTITIES_PER_HYBRID..=GameConfig::MAX_ENTITIES_PER_HYBRID;
    for (hybrid, spec) in specs.iter().enumerate() {
        if !allowed.contains(&spec.entity_ids.len()) {
            return Err(CreationError::InvalidHybridCount {
                hybrid,
                count: spec.entity_ids.len(),
            });
        }
    }
    for (hybrid, spec) in specs.iter().enumerate() {
        if !spec.entity_ids.contains(&spec.selected_entity) {
            return Err(CreationError::InvalidSelectedAbility { hybrid });
        }
    }

    let mut seen = HashSet::new();
    for id in specs.iter().flat_map(|spec| spec.entity_ids.iter()) {
        if !seen.insert(*id) {
            return Err(CreationError::EntityReused(*id));
        }
    }
    Ok(())
}

/// Every creature id referenced by `specs`, in submission order.
pub fn referenced_ids(specs: &[HybridSpec; 2]) -> Vec<EntityId> {
    specs
        .iter()
        .flat_map(|spec| spec.entity_ids.iter().copied())
        .collect()
}

/// Component names sorted case-insensitively and joined with `" + "`.
pub fn derived_name<S: AsRef<str>>(names: &[S]) -> String {
    let mut sorted: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
    sorted.sort_by_key(|name| name.to_lowercase());
    sorted.join(" + ")
}

/// Fuses catalog entities into an inactive hybrid.
pub fn assemble_hybrid(
    spec: &HybridSpec,
    catalog: &[Entity],
    config: &GameConfig,
) -> Result<Hybrid, CreationError> {
    let mut parts = Vec::with_capacity(spec.entity_ids.len());
    let mut missing = Vec::new();
    for id in &spec.entity_ids {
        match catalog.iter().find(|entity| entity.id == *id) {
            Some(entity) => parts.push(entity.clone()),
            None => missing.push(*id),
        }
    }
    if !missing.is_empty() {
        return Err(CreationError::InvalidEntities(missing));
    }

    let mut base = parts.iter().fold(CombatStats::default(), |acc, e| CombatStats {
        hit_points: acc.hit_points + e.hit_points,
        attack: acc.attack + e.attack,
        defense: acc.defense + e.defense,
        agility: acc.agility + e.agility,
        energy: acc.energy + e.energy,
        vigor: 0,
    });
    base.energy = base
        .energy
        .clamp(GameConfig::MIN_HYBRID_ENERGY, GameConfig::MAX_HYBRID_ENERGY);
    base.vigor = config.starting_vigor;

    let names: Vec<&str> = parts.iter().map(|e| e.name.as_str()).collect();
    Ok(Hybrid {
        name: derived_name(&names),
        base_entities: parts,
        base,
        current: base,
        selected_ability: Some(spec.selected_entity),
        ..Hybrid::default()
    })
}

/// Validates `specs` and installs both hybrids on `player`.
///
/// `catalog` must contain at least the entities referenced by `specs`; the
/// player is left untouched on any error.
pub fn create_hybrids(
    player: &mut Player,
    specs: &[HybridSpec; 2],
    catalog: &[Entity],
    config: &GameConfig,
) -> Result<(), CreationError> {
    if player.has_created || !player.hybrids.is_empty() {
        return Err(CreationError::HybridsAlreadyCreated);
    }
    validate_specs(specs)?;

    let missing: Vec<EntityId> = referenced_ids(specs)
        .into_iter()
        .filter(|id| !catalog.iter().any(|entity| entity.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(CreationError::InvalidEntities(missing));
    }

    let hybrids = specs
        .iter()
        .map(|spec| assemble_hybrid(spec, catalog, config))
        .collect::<Result<Vec<_>, _>>()?;
    player.hybrids = hybrids;
    player.has_created = true;
    Ok(())
}
