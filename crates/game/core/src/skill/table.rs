//! Immutable class → rank → skill lookup built once at content load.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ActiveSkill, PassiveSkill, SkillId};

#[derive(Clone, Debug)]
pub enum SkillEntry {
    Active(Arc<dyn ActiveSkill>),
    Passive(Arc<dyn PassiveSkill>),
}

impl SkillEntry {
    pub fn id(&self) -> SkillId {
        match self {
            Self::Active(skill) => skill.id(),
            Self::Passive(skill) => skill.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Active(skill) => skill.name(),
            Self::Passive(skill) => skill.name(),
        }
    }
}

/// Read-only skill catalogue. Construct through [`SkillTableBuilder`].
#[derive(Clone, Debug, Default)]
pub struct SkillTable {
    classes: BTreeMap<String, BTreeMap<u32, Vec<SkillEntry>>>,
    by_name: BTreeMap<String, SkillEntry>,
}

impl SkillTable {
    pub fn builder() -> SkillTableBuilder {
        SkillTableBuilder::default()
    }

    /// Skills unlocked exactly at `rank`.
    pub fn at_rank(&self, class: &str, rank: u32) -> &[SkillEntry] {
        self.classes
            .get(class)
            .and_then(|ranks| ranks.get(&rank))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every skill a member of `class` knows at `rank`, lowest rank first.
    pub fn known_at(&self, class: &str, rank: u32) -> Vec<SkillEntry> {
        self.classes
            .get(class)
            .map(|ranks| {
                ranks
                    .range(..=rank)
                    .flat_map(|(_, entries)| entries.iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn by_name(&self, name: &str) -> Option<&SkillEntry> {
        self.by_name.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SkillTableBuilder {
    table: SkillTable,
}

impl SkillTableBuilder {
    /// Add a skill under `class` at `rank`. Returns false if a skill with the
    /// same name is already present.
    pub fn insert(&mut self, class: &str, rank: u32, entry: SkillEntry) -> bool {
        if self.table.by_name.contains_key(entry.name()) {
            return false;
        }
        self.table
            .by_name
            .insert(entry.name().to_owned(), entry.clone());
        self.table
            .classes
            .entry(class.to_owned())
            .or_default()
            .entry(rank)
            .or_default()
            .push(entry);
        true
    }

    pub fn build(self) -> SkillTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::state::EntityId;

    struct Named(u32, &'static str);

    impl PassiveSkill for Named {
        fn id(&self) -> SkillId {
            SkillId(self.0)
        }

        fn name(&self) -> &str {
            self.1
        }

        fn effects(&self, _owner: EntityId) -> Vec<Arc<dyn Effect>> {
            Vec::new()
        }
    }

    fn passive(id: u32, name: &'static str) -> SkillEntry {
        SkillEntry::Passive(Arc::new(Named(id, name)))
    }

    #[test]
    fn known_at_includes_lower_ranks() {
        let mut builder = SkillTable::builder();
        builder.insert("knight", 1, passive(1, "guard"));
        builder.insert("knight", 3, passive(2, "bulwark"));
        builder.insert("knight", 5, passive(3, "fortress"));
        let table = builder.build();

        let names: Vec<_> = table
            .known_at("knight", 3)
            .iter()
            .map(|e| e.name().to_owned())
            .collect();
        assert_eq!(names, vec!["guard", "bulwark"]);
        assert_eq!(table.at_rank("knight", 5).len(), 1);
        assert!(table.at_rank("mage", 1).is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut builder = SkillTable::builder();
        assert!(builder.insert("knight", 1, passive(1, "guard")));
        assert!(!builder.insert("mage", 1, passive(2, "guard")));
        assert_eq!(builder.build().len(), 1);
    }
}
