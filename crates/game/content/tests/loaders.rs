use std::fs;
use std::path::Path;

use combat_content::ContentFactory;
use combat_content::loaders::skills::SkillCatalog;
use combat_core::{CombatEngine, Decision, EntityId, SkillTable, Stat, Team};
use tempfile::TempDir;

fn shipped() -> ContentFactory {
    ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
}

fn write(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

#[test]
fn shipped_data_loads() {
    let content = shipped().load().unwrap();
    assert!(content.skills.len() >= 20);
    for class in ["knight", "ranger", "mage", "cleric"] {
        assert!(content.skills.classes().any(|c| c == class), "{class}");
    }
    let knight = content.template("Knight").unwrap();
    assert_eq!(knight.base[Stat::MaxHp], 160.0);
    assert!(!knight.actives.is_empty());
    assert!(!knight.passives.is_empty());
    assert_eq!(content.config.max_bonus_attacks, 16);
}

#[test]
fn config_is_optional() {
    let dir = TempDir::new().unwrap();
    write(&dir, "skills.ron", "{}");
    write(&dir, "entities.ron", r#"[(name: "Dummy")]"#);

    let content = ContentFactory::new(dir.path()).load().unwrap();
    assert_eq!(content.config, combat_core::CombatConfig::default());
    assert!(content.skills.is_empty());
    assert_eq!(content.template_names().collect::<Vec<_>>(), vec!["Dummy"]);
}

#[test]
fn missing_skill_file_reports_the_path() {
    let dir = TempDir::new().unwrap();
    write(&dir, "entities.ron", "[]");

    let error = ContentFactory::new(dir.path()).load().unwrap_err();
    assert!(format!("{error:#}").contains("skills.ron"));
}

#[test]
fn parse_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config.toml", "max_bonus_attacks = \"many\"\n");

    let error = ContentFactory::new(dir.path()).load_config().unwrap_err();
    assert!(format!("{error:#}").contains("config.toml"));
}

#[test]
fn skill_catalogue_survives_reserialization() {
    let text = fs::read_to_string(shipped().data_dir().join("skills.ron")).unwrap();
    let catalog: SkillCatalog = ron::from_str(&text).unwrap();
    let dir = TempDir::new().unwrap();
    write(&dir, "skills.ron", &ron::to_string(&catalog).unwrap());

    let original = shipped().load_skills().unwrap();
    let reloaded = ContentFactory::new(dir.path()).load_skills().unwrap();
    assert_eq!(reloaded.len(), original.len());
    for class in original.classes() {
        let names = |table: &SkillTable| -> Vec<String> {
            table
                .known_at(class, u32::MAX)
                .iter()
                .map(|e| e.name().to_owned())
                .collect()
        };
        assert_eq!(names(&reloaded), names(&original));
    }
}

#[test]
fn shipped_encounter_runs_to_completion() {
    let content = shipped().load().unwrap();
    let mut builder = CombatEngine::builder(content.config.clone());
    builder.seed(11).default_distance(1);
    for name in ["Knight", "Ranger", "Mage", "Cleric"] {
        builder.join(Team::Players, content.template(name).unwrap());
    }
    for name in ["Goblin", "Wolf", "Orc Brute", "Goblin Shaman"] {
        builder.join(Team::Opponents, content.template(name).unwrap());
    }
    let mut engine = builder.build();

    let mut attack_first = |engine: &CombatEngine, actor: EntityId| -> Decision {
        match engine.opponents_of(actor).first() {
            Some(&target) => Decision::Attack { target },
            None => Decision::Defend,
        }
    };
    let winner = engine.run(&mut attack_first, 2_000);
    assert!(winner.is_some());
    assert!(!engine.log().is_empty());
}
