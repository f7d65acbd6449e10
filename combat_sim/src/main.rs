//! Combat Sim - Replays a TOML scenario through combat_core
//!
//! Prints every resolved hit, the notifications raised along the way and
//! the final scoreboard, either as text or as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use combat_core::config::load_scenario;
use combat_core::simulation::{ScenarioReport, Simulation};
use combat_core::CombatEvent;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scenario runner for the combat resolution engine
#[derive(Parser, Debug)]
#[command(name = "combat_sim")]
#[command(about = "Replay a combat scenario and report what happened")]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Override the scenario's random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log every pipeline step
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut scenario = load_scenario(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    info!(scenario = %scenario.name, seed = scenario.seed, hits = scenario.hits.len(), "running");

    let report = Simulation::run_scenario(&scenario).context("Scenario failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    println!("=== {} ===", report.name);
    for hit in &report.hits {
        println!("[tic {:>5}] {:<12} {}", hit.tic, hit.target, hit.resolution.summary());
    }

    if !report.events.is_empty() {
        println!("\nEvents:");
        for event in &report.events {
            println!("  {}", describe(event));
        }
    }

    println!("\nHealth:");
    for (name, health) in &report.health {
        println!("  {:<12} {}", name, health);
    }

    let state = &report.match_state;
    println!("\nKills: {}", state.killed_monsters);
    for (slot, score) in &state.scores {
        println!(
            "  player {}: frags {}, kills {}, spree {}",
            slot, score.frag_count, score.kill_count, score.spree_count
        );
    }
}

fn describe(event: &CombatEvent) -> String {
    match event {
        CombatEvent::Spree { attacker, tier, .. } => format!("{} is on a {:?}", attacker, tier),
        CombatEvent::SpreeEnded { attacker, victim, count } => {
            format!("{} ended the {}-kill spree of {}", attacker, count, victim)
        }
        CombatEvent::SpreeKillSelf { victim } => format!("{} ended their own spree", victim),
        CombatEvent::Multikill { attacker, tier, .. } => format!("{}: {:?} kill", attacker, tier),
        CombatEvent::Obituary { victim, source, kind, .. } => match source {
            Some(source) if source != victim => format!("{} was killed by {} ({})", victim, source, kind),
            _ => format!("{} died ({})", victim, kind),
        },
        other => format!("{:?}", other),
    }
}
