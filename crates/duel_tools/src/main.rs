//! Duel - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use duel_core::battlefield::{BattleField, Side, TurnReport};
use duel_core::catalog::SkillCatalog;
use duel_core::record::BattleRecord;
use duel_tools::scenario::Scenario;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "duel-tools")]
#[command(about = "Development tools for the duel battle core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted battle scenario
    Simulate {
        /// Path to the scenario RON file
        scenario: PathBuf,
        /// Skill catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Write a replay record to this file
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Replay a recorded battle and verify its outcome
    Replay {
        /// Path to the record file
        record: PathBuf,
    },
    /// Validate a skill catalog file
    Validate {
        /// Path to the catalog RON file
        #[arg(default_value = "assets/data/skills.ron")]
        path: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            scenario,
            catalog,
            record,
        } => simulate(&scenario, catalog.as_deref(), record.as_deref()),
        Commands::Replay { record } => replay(&record),
        Commands::Validate { path } => validate(&path),
    };

    if let Err(message) = result {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}

fn simulate(path: &Path, catalog: Option<&Path>, record: Option<&Path>) -> Result<(), String> {
    let catalog = match catalog {
        Some(path) => SkillCatalog::load(path).map_err(|e| e.to_string())?,
        None => SkillCatalog::builtin(),
    };
    let scenario = Scenario::load(path).map_err(|e| e.to_string())?;
    let outcome = scenario.run(&catalog).map_err(|e| e.to_string())?;

    for report in &outcome.reports {
        log_turn(report);
    }
    if let Some(err) = &outcome.stopped_by {
        tracing::info!("Script stopped early: {err}");
    }
    log_result(&outcome.field);

    if let Some(out) = record {
        outcome.record.save(out).map_err(|e| e.to_string())?;
        tracing::info!("Record written to {}", out.display());
    }
    Ok(())
}

fn replay(path: &Path) -> Result<(), String> {
    let record = BattleRecord::load(path).map_err(|e| e.to_string())?;
    let field = record.replay().map_err(|e| e.to_string())?;
    tracing::info!("Replay of {} turns verified", record.turns.len());
    log_result(&field);
    Ok(())
}

fn validate(path: &Path) -> Result<(), String> {
    tracing::info!("Validating skill catalog: {}", path.display());
    let count =
        duel_tools::validate::validate_catalog_file(path).map_err(|e| format!("Validation failed: {e}"))?;
    tracing::info!("Validation passed ({count} skills)");
    Ok(())
}

fn log_turn(report: &TurnReport) {
    for event in &report.events {
        let actor = match event.side {
            Side::Player => "player",
            Side::Enemy => "enemy",
        };
        tracing::info!(
            turn = report.turn,
            actor,
            skill = %event.outcome.skill,
            damage = event.outcome.damage_dealt,
            mana_spent = event.outcome.mana_spent,
            mana_recovered = event.outcome.mana_recovered,
            target_hp = event.outcome.target_hp,
            "Action"
        );
    }
}

fn log_result(field: &BattleField) {
    for unit in [field.player(), field.enemy()].into_iter().flatten() {
        let status = unit.status();
        tracing::info!(
            name = %status.name,
            hp = status.hp,
            max_hp = status.max_hp,
            mp = ?status.mp,
            dead = status.is_dead,
            "Final status"
        );
    }
    match field.winner() {
        Some(winner) => tracing::info!("Winner: {} (turn {})", winner.name(), field.turn()),
        None => tracing::info!("No winner after turn {}", field.turn()),
    }
}
