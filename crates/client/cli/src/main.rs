//! Headless combat driver.
//!
//! Loads content from a data directory, builds one encounter, lets the
//! automatic policies play it out and prints the message stream.
//!
//! ```bash
//! cargo run -p combat-cli -- --seed 7 --party Knight,Mage --enemies "Orc Brute"
//! RUST_LOG=combat=debug cargo run -p combat-cli -- --quiet
//! ```

mod encounter;
mod policy;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use combat_content::ContentFactory;
use combat_core::MessageTag;
use console::style;

use encounter::EncounterSpec;
use policy::{PolicyKind, TeamPolicies};

/// Run a headless combat encounter
#[derive(Parser, Debug)]
#[command(name = "combat-sim")]
#[command(about = "Simulate one encounter between two teams", long_about = None)]
#[command(version)]
struct Args {
    /// Content directory (skills.ron, entities.ron, optional config.toml)
    #[arg(long, env = "COMBAT_DATA_DIR", default_value = "crates/game/content/data")]
    data: PathBuf,

    /// Encounter seed; the policies derive their own seeds from it
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Turn limit before the encounter is called a draw
    #[arg(long, default_value_t = 500)]
    rounds: u64,

    /// Player team, comma separated template names
    #[arg(long, value_delimiter = ',', default_value = "Knight,Ranger,Mage,Cleric")]
    party: Vec<String>,

    /// Opposing team, comma separated template names
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Goblin,Wolf,Orc Brute,Goblin Shaman"
    )]
    enemies: Vec<String>,

    /// Starting distance between every pair of opponents
    #[arg(long, default_value_t = 2)]
    distance: u8,

    /// Policy driving the player team
    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    policy: PolicyKind,

    /// Hide probability detail
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let content = ContentFactory::new(&args.data)
        .load()
        .with_context(|| format!("Failed to load content from {}", args.data.display()))?;

    let spec = EncounterSpec {
        seed: args.seed,
        distance: args.distance,
        party: args.party.clone(),
        enemies: args.enemies.clone(),
    };
    let mut engine = encounter::build(&content, &spec)?;
    let mut policies = TeamPolicies {
        players: args.policy.build(args.seed.wrapping_add(1)),
        opponents: PolicyKind::Aggro.build(args.seed.wrapping_add(2)),
    };

    for line in render::roster(&engine) {
        println!("{line}");
    }
    println!();

    let mut winner = None;
    for _ in 0..args.rounds {
        winner = engine.check_victory();
        if winner.is_some() {
            break;
        }
        let summary = engine.play_turn(&mut policies);
        for error in &summary.rejected {
            tracing::debug!(actor = summary.actor.0, "rejected: {error}");
        }
        for message in engine.drain_messages() {
            if args.quiet && message.tag == MessageTag::Probability {
                continue;
            }
            println!("{}", render::message(&message));
        }
    }
    let winner = winner.or_else(|| engine.check_victory());

    println!();
    for line in render::roster(&engine) {
        println!("{line}");
    }
    println!();
    match winner {
        Some(team) => println!(
            "{} {} win after {} turns",
            style("✓").green().bold(),
            style(team.as_ref()).cyan(),
            engine.turns_taken()
        ),
        None => println!(
            "{} No winner after {} turns",
            style("✗").red().bold(),
            args.rounds
        ),
    }
    Ok(())
}
