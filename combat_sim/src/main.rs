//! combat_sim - run combat encounters from a scenario file
//!
//! Loads the bundled definitions (optionally overlaid with files given on
//! the command line), plays the scenario with a seeded RNG and prints the
//! first run's combat log plus a summary.

use anyhow::{Context, Result};
use clap::Parser;
use combat_core::config::{self, CombatConstants};
use combat_core::{CombatRules, StatusCatalog};
use combat_sim::{run_batch, Scenario};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run combat encounters from a scenario file
#[derive(Parser, Debug)]
#[command(name = "combat_sim")]
#[command(about = "Run turn-based combat encounters", long_about = None)]
#[command(version)]
struct Args {
    /// Scenario TOML file; the bundled demo runs when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Extra skill definitions (.toml or .json), overlaid on the bundled ones
    #[arg(long)]
    skills: Option<PathBuf>,

    /// Extra monster definitions (.toml or .json)
    #[arg(long)]
    monsters: Option<PathBuf>,

    /// Status type overrides (TOML)
    #[arg(long)]
    statuses: Option<PathBuf>,

    /// Synergy table replacing the bundled one (TOML)
    #[arg(long)]
    synergies: Option<PathBuf>,

    /// Combat constants (TOML)
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Override the scenario's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's run count
    #[arg(short, long)]
    runs: Option<u32>,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_rules(args: &Args) -> Result<CombatRules> {
    let constants: CombatConstants = match &args.constants {
        Some(path) => config::load_toml(path)
            .with_context(|| format!("loading constants from {}", path.display()))?,
        None => CombatConstants::default(),
    };
    let catalog = match &args.statuses {
        Some(path) => config::load_status_configs(path)
            .with_context(|| format!("loading statuses from {}", path.display()))?,
        None => StatusCatalog::with_defaults(),
    };
    let synergies = match &args.synergies {
        Some(path) => config::load_synergy_table(path)
            .with_context(|| format!("loading synergies from {}", path.display()))?,
        None => config::default_synergies().context("loading bundled synergies")?,
    };
    Ok(CombatRules::new(constants, catalog, synergies))
}

fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario from {}", path.display()))?,
        None => Scenario::demo().context("loading bundled demo scenario")?,
    };
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    if let Some(runs) = args.runs {
        scenario.runs = runs;
    }

    let mut book = config::default_skill_book().context("loading bundled skills")?;
    if let Some(path) = &args.skills {
        let extra = config::load_skill_book(path)
            .with_context(|| format!("loading skills from {}", path.display()))?;
        book.merge(extra);
    }

    let mut bestiary = config::default_monsters().context("loading bundled monsters")?;
    if let Some(path) = &args.monsters {
        let extra = config::load_monster_definitions(path)
            .with_context(|| format!("loading monsters from {}", path.display()))?;
        bestiary.retain(|m| extra.iter().all(|e| e.id != m.id));
        bestiary.extend(extra);
    }

    let rules = Arc::new(load_rules(&args)?);
    info!(scenario = %scenario.name, seed = scenario.seed, runs = scenario.runs, "starting");

    let (first, tally) = run_batch(&scenario, &book, &bestiary, rules)
        .with_context(|| format!("running scenario '{}'", scenario.name))?;

    if !scenario.name.is_empty() {
        println!("== {} (seed {}) ==", scenario.name, scenario.seed);
    }
    for line in &first.log {
        println!("{}", line);
    }
    println!();
    println!("{}", first.summary());
    if tally.runs() > 1 {
        println!("{}", tally);
    }

    Ok(())
}
