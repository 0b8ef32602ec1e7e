use clap::Parser;
use forest_engine::api::{simulate_runs, RunConfig};
use forest_engine::autopilot::Autopilot;
use forest_engine::Ending;
use std::path::PathBuf;

#[path = "../text.rs"]
mod text;

#[derive(Parser)]
#[command(name = "simulate-many")]
#[command(about = "Monte Carlo sim: many autopilot sessions")]
struct Args {
    /// Number of sessions
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// RNG base seed (session i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Energy per fight as a multiple of enemy strength
    #[arg(long, default_value_t = 1.5)]
    energy_factor: f64,

    /// Drink the elixir below this much energy
    #[arg(long, default_value_t = 200)]
    heal_below: u32,

    /// Optional rules file (JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "en")]
    locale: String,

    /// Print the stats as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    text::init_tracing();
    let args = Args::parse();

    // Validate up front so a bad file fails before any session runs.
    text::load_config(args.config.as_deref())?;

    let cfg = RunConfig {
        seed: args.seed,
        config_path: args.config.as_ref().map(|p| p.display().to_string()),
        locale: args.locale.clone(),
        autopilot: Autopilot {
            energy_factor: args.energy_factor,
            heal_below: args.heal_below,
            ..Autopilot::default()
        },
        ..RunConfig::default()
    };
    let stats = simulate_runs(&cfg, args.trials)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("simulate-many results");
    println!("---------------------");
    println!("trials:             {}", stats.samples);
    println!("trapped:            {}", stats.trapped);
    println!("energy factor:      {}", args.energy_factor);
    println!();
    for ending in [
        Ending::Victory,
        Ending::Coward,
        Ending::DeathWithPrincess,
        Ending::DeathWithoutPrincess,
    ] {
        println!(
            "{:<24}{:.1}%",
            format!("{}:", ending),
            stats.rate(ending) * 100.0
        );
    }
    println!();
    println!("avg score:          {:.2}", stats.average_score);
    println!("best score:         {} (seed {})", stats.best_score, stats.best_seed);
    Ok(())
}
