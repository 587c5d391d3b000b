//! Encounter assembly from loaded content.

use anyhow::{Result, anyhow};
use combat_content::ContentSet;
use combat_core::{CombatConfig, CombatEngine, Team};

/// Names and placement for one headless encounter.
#[derive(Clone, Debug)]
pub struct EncounterSpec {
    pub seed: u64,
    pub distance: u8,
    pub party: Vec<String>,
    pub enemies: Vec<String>,
}

pub fn build(content: &ContentSet, spec: &EncounterSpec) -> Result<CombatEngine> {
    anyhow::ensure!(!spec.party.is_empty(), "the party is empty");
    anyhow::ensure!(!spec.enemies.is_empty(), "no enemies given");
    anyhow::ensure!(
        spec.party.len() + spec.enemies.len() <= CombatConfig::MAX_ENTITIES,
        "at most {} entities may join one encounter",
        CombatConfig::MAX_ENTITIES
    );
    anyhow::ensure!(
        spec.distance <= CombatConfig::MAX_DISTANCE,
        "distance must be at most {}",
        CombatConfig::MAX_DISTANCE
    );

    let mut builder = CombatEngine::builder(content.config.clone());
    builder.seed(spec.seed).default_distance(spec.distance);
    let roster = [(Team::Players, &spec.party), (Team::Opponents, &spec.enemies)];
    for (team, names) in roster {
        for name in names {
            let template = content.template(name).ok_or_else(|| {
                let known: Vec<&str> = content.template_names().collect();
                anyhow!("unknown entity '{name}' (known: {})", known.join(", "))
            })?;
            let id = builder.join(team, template);
            tracing::debug!(id = id.0, %name, ?team, "joined encounter");
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use combat_core::{BaseStats, CombatEntity, SkillTable};

    fn content() -> ContentSet {
        let mut templates = BTreeMap::new();
        for name in ["Hero", "Slime"] {
            templates.insert(
                name.to_owned(),
                Arc::new(CombatEntity::new(name, BaseStats::defaults())),
            );
        }
        ContentSet {
            config: CombatConfig::default(),
            skills: SkillTable::default(),
            templates,
        }
    }

    fn spec(party: &[&str], enemies: &[&str]) -> EncounterSpec {
        EncounterSpec {
            seed: 1,
            distance: 2,
            party: party.iter().map(|s| s.to_string()).collect(),
            enemies: enemies.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn joins_both_sides() {
        let engine = build(&content(), &spec(&["Hero"], &["Slime", "Slime"])).unwrap();
        assert_eq!(engine.living(Team::Players).len(), 1);
        assert_eq!(engine.living(Team::Opponents).len(), 2);
    }

    #[test]
    fn unknown_names_list_the_known_ones() {
        let Err(error) = build(&content(), &spec(&["Hero"], &["Dragon"])) else {
            panic!("an unknown template must be rejected");
        };
        assert!(error.to_string().contains("known: Hero, Slime"));
    }

    #[test]
    fn empty_sides_are_rejected() {
        assert!(build(&content(), &spec(&[], &["Slime"])).is_err());
    }
}
