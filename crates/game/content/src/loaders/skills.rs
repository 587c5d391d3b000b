//! Skill catalogue loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use combat_core::SkillId;
use combat_core::skill::{SkillEntry, SkillTable};

use crate::interpreter::{DataActiveSkill, DataPassiveSkill};
use crate::loaders::{LoadResult, read_file};
use crate::specs::SkillSpec;

/// `class → rank → skills`, as written in `skills.ron`.
pub type SkillCatalog = BTreeMap<String, BTreeMap<u32, Vec<SkillSpec>>>;

/// Loader for the class → rank → skill table from RON files.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<SkillTable> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<SkillTable> {
        let catalog: SkillCatalog =
            ron::from_str(content).context("Failed to parse skill catalogue RON")?;
        Self::build(catalog)
    }

    /// Assign ids in class, rank, then file order and build the table.
    ///
    /// Skill names are global: the same name under two classes is an error.
    pub fn build(catalog: SkillCatalog) -> LoadResult<SkillTable> {
        let mut builder = SkillTable::builder();
        let mut next_id = 1;
        for (class, ranks) in catalog {
            for (rank, specs) in ranks {
                for spec in specs {
                    let id = SkillId(next_id);
                    next_id += 1;
                    let name = spec.name().to_owned();
                    let entry = match spec {
                        SkillSpec::Active(active) => {
                            anyhow::ensure!(
                                active.targeting.min <= active.targeting.max,
                                "skill '{name}' accepts fewer targets than it requires"
                            );
                            SkillEntry::Active(Arc::new(DataActiveSkill::new(id, active)))
                        }
                        SkillSpec::Passive(passive) => {
                            SkillEntry::Passive(Arc::new(DataPassiveSkill::new(id, passive)))
                        }
                    };
                    anyhow::ensure!(
                        builder.insert(&class, rank, entry),
                        "duplicate skill '{name}' (class '{class}', rank {rank})"
                    );
                }
            }
        }
        Ok(builder.build())
    }
}
