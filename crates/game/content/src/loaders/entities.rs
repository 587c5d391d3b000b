//! Entity template loader.
//!
//! Templates reference skills by class and rank, and by name for extras,
//! so the skill table must be loaded first.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use combat_core::skill::{SkillEntry, SkillTable};
use combat_core::{BaseStats, CombatEntity};

use crate::loaders::{LoadResult, read_file};
use crate::specs::EntitySpec;

/// Templates by name.
pub type Templates = BTreeMap<String, Arc<CombatEntity>>;

/// Loader for entity templates from RON files.
pub struct EntityLoader;

impl EntityLoader {
    /// RON format: `Vec<EntitySpec>`.
    pub fn load(path: &Path, skills: &SkillTable) -> LoadResult<Templates> {
        let content = read_file(path)?;
        Self::parse(&content, skills).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str, skills: &SkillTable) -> LoadResult<Templates> {
        let specs: Vec<EntitySpec> =
            ron::from_str(content).context("Failed to parse entity templates RON")?;

        let mut templates = Templates::new();
        for spec in specs {
            let name = spec.name.clone();
            let template = Self::build(spec, skills)
                .with_context(|| format!("Failed to build template '{name}'"))?;
            if templates.insert(name.clone(), Arc::new(template)).is_some() {
                anyhow::bail!("duplicate entity template '{name}'");
            }
        }
        Ok(templates)
    }

    pub fn build(spec: EntitySpec, skills: &SkillTable) -> LoadResult<CombatEntity> {
        let mut base = BaseStats::defaults();
        for &(stat, value) in &spec.stats {
            base[stat] = value;
        }

        let mut entity = CombatEntity::new(spec.name, base)
            .with_level(spec.level)
            .with_attack_type(spec.attack_type)
            .with_attribute(spec.attribute);
        entity.weaknesses = spec.weaknesses;
        entity.resistances = spec.resistances;

        let mut known = Vec::new();
        if let Some(class) = &spec.class {
            if !skills.classes().any(|c| c == class) {
                return Err(anyhow!("unknown class '{class}'"));
            }
            known.extend(skills.known_at(class, spec.rank));
        }
        for name in &spec.skills {
            let entry = skills
                .by_name(name)
                .ok_or_else(|| anyhow!("unknown skill '{name}'"))?;
            known.push(entry.clone());
        }

        for entry in known {
            entity = match entry {
                SkillEntry::Active(skill) => entity.with_active(skill),
                SkillEntry::Passive(skill) => entity.with_passive(skill),
            };
        }
        Ok(entity)
    }
}
