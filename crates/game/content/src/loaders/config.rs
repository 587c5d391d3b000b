//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`CombatConfig`] from TOML files.
///
/// Every table and key is optional; anything missing keeps its default.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig =
            toml::from_str(content).context("Failed to parse combat config TOML")?;
        anyhow::ensure!(
            config.timing.max_action_timer > 0.0,
            "timing.max_action_timer must be positive"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse("max_bonus_attacks = 4\n").unwrap();
        assert_eq!(config.max_bonus_attacks, 4);
        assert_eq!(config.timing, CombatConfig::default().timing);
    }

    #[test]
    fn nested_tables_override_one_field() {
        let config = ConfigLoader::parse("[timing]\nmax_action_timer = 50.0\n").unwrap();
        assert_eq!(config.timing.max_action_timer, 50.0);
        assert_eq!(config.damage, CombatConfig::default().damage);
    }

    #[test]
    fn rejects_non_positive_timer() {
        assert!(ConfigLoader::parse("[timing]\nmax_action_timer = 0.0\n").is_err());
    }
}
