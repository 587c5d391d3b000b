//! Content factory for building the immutable content set from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use combat_core::{CombatConfig, CombatEntity, SkillTable};

use crate::loaders::entities::Templates;
use crate::loaders::{ConfigLoader, EntityLoader, LoadResult, SkillLoader};

/// Everything an encounter needs from content, loaded once and shared by
/// reference.
#[derive(Clone, Debug)]
pub struct ContentSet {
    pub config: CombatConfig,
    pub skills: SkillTable,
    pub templates: Templates,
}

impl ContentSet {
    pub fn template(&self, name: &str) -> Option<Arc<CombatEntity>> {
        self.templates.get(name).cloned()
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional)
/// ├── skills.ron
/// └── entities.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load `config.toml`, or the defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the class → rank → skill table from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillTable> {
        let path = self.data_dir.join("skills.ron");
        SkillLoader::load(&path)
    }

    /// Load entity templates from `entities.ron`.
    pub fn load_entities(&self, skills: &SkillTable) -> LoadResult<Templates> {
        let path = self.data_dir.join("entities.ron");
        EntityLoader::load(&path, skills)
    }

    pub fn load(&self) -> LoadResult<ContentSet> {
        let config = self.load_config()?;
        let skills = self.load_skills()?;
        let templates = self.load_entities(&skills)?;
        tracing::info!(
            dir = %self.data_dir.display(),
            skills = skills.len(),
            templates = templates.len(),
            "content loaded"
        );
        Ok(ContentSet {
            config,
            skills,
            templates,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
