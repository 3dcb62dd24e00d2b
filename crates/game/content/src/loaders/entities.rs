//! Creature catalog loader.
//!
//! Loads entities from a RON list. `Option` fields may be written bare
//! (`attack_buff_percent: 30`) because the loader enables `implicit_some`.

use std::collections::HashSet;
use std::path::Path;

use chimera_core::{Entity, EntityId};
use ron::extensions::Extensions;

use crate::loaders::{LoadResult, read_file};

/// Loader for the creature catalog from RON files.
pub struct EntityLoader;

impl EntityLoader {
    /// Load and validate the catalog at `path`.
    ///
    /// RON format: `[ (name: "Lion", hit_points: 12, ..., ability: (...)), ... ]`
    ///
    /// Entries without an `id` are numbered by position, starting at 1.
    pub fn load(path: &Path) -> LoadResult<Vec<Entity>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid creature catalog {}: {}", path.display(), e))
    }

    /// Parse and validate a catalog held in memory.
    pub fn parse(content: &str) -> LoadResult<Vec<Entity>> {
        let mut entities: Vec<Entity> = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse creature catalog RON: {}", e))?;

        Self::validate(&mut entities)?;
        Ok(entities)
    }

    /// Cross-entry checks: unique ids, names and skill keys; plan-executing
    /// abilities must carry a key.
    pub fn validate(entities: &mut [Entity]) -> LoadResult<()> {
        if entities.is_empty() {
            anyhow::bail!("creature catalog is empty");
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut keys = HashSet::new();

        for (index, entity) in entities.iter_mut().enumerate() {
            if entity.id.is_none() {
                entity.id = EntityId(index as u32 + 1);
            }
            if !ids.insert(entity.id) {
                anyhow::bail!("duplicate creature id {}", entity.id.0);
            }

            let name = entity.name.trim();
            if name.is_empty() {
                anyhow::bail!("creature {} has no name", entity.id.0);
            }
            if !names.insert(name.to_lowercase()) {
                anyhow::bail!("duplicate creature name '{}'", name);
            }

            let key = entity.ability.key.trim();
            if entity.ability.effect.executes_plan && key.is_empty() {
                anyhow::bail!(
                    "creature '{}' executes its ability as a plan but has no skill key",
                    name
                );
            }
            if !key.is_empty() && !keys.insert(key.to_owned()) {
                anyhow::bail!("duplicate skill key '{}'", key);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chimera_core::StrikeKind;
    use std::io::Write;

    const CATALOG: &str = r#"[
        (
            name: "Lion",
            hit_points: 12, attack: 5, defense: 2, agility: 3, energy: 1, vigor_cost: 1,
            ability: (
                name: "Roar",
                cost: 1,
                key: "roar",
                effect: (opponent_attack_debuff_percent: 30),
            ),
        ),
        (
            name: "Cheetah",
            hit_points: 8, attack: 4, defense: 1, agility: 7, energy: 1, vigor_cost: 2,
            ability: (
                name: "Swift Pounce",
                cost: 2,
                key: "swift_pounce",
                effect: (executes_plan: true, swift_agility_divisor: 2),
            ),
        ),
    ]"#;

    #[test]
    fn numbers_entries_and_reads_bare_options() {
        let entities = EntityLoader::parse(CATALOG).expect("valid catalog");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, EntityId(1));
        assert_eq!(entities[1].id, EntityId(2));
        assert_eq!(
            entities[0].ability.effect.opponent_attack_debuff_percent,
            Some(30)
        );
        assert!(matches!(
            entities[1].ability.effect.strike(&entities[1].ability.key),
            Some(StrikeKind::Swift { agility_divisor: 2, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_names_ignoring_case() {
        let content = r#"[(name: "Owl"), (name: "owl")]"#;
        let err = EntityLoader::parse(content).expect_err("duplicate");
        assert!(err.to_string().contains("duplicate creature name"));
    }

    #[test]
    fn plan_abilities_need_a_key() {
        let content = r#"[(name: "Bull", ability: (name: "Charge", effect: (executes_plan: true)))]"#;
        let err = EntityLoader::parse(content).expect_err("missing key");
        assert!(err.to_string().contains("no skill key"));
    }

    #[test]
    fn rejects_duplicate_skill_keys() {
        let content = r#"[
            (name: "Bull", ability: (key: "charge")),
            (name: "Rhino", ability: (key: "charge")),
        ]"#;
        let err = EntityLoader::parse(content).expect_err("duplicate key");
        assert!(err.to_string().contains("duplicate skill key"));
    }

    #[test]
    fn load_reports_path_on_failure() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[]").expect("write");
        let err = EntityLoader::load(file.path()).expect_err("empty catalog");
        assert!(err.to_string().contains("creature catalog"));

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{CATALOG}").expect("write");
        assert_eq!(EntityLoader::load(file.path()).expect("loads").len(), 2);
    }
}
