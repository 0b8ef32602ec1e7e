use clap::{Parser, Subcommand, ValueEnum};
use forest_engine::autopilot::Autopilot;
use forest_engine::encounter::{bribe_odds, fight_odds};
use forest_engine::leaderboard::{JsonFileLeaderboard, Leaderboard, Period, PlayerIdentity};
use forest_engine::{Dice, ForestMap, Session, Tile};
use std::path::PathBuf;

mod text;

use text::{init_tracing, load_catalog, load_config};

#[derive(Copy, Clone, ValueEnum)]
enum PeriodArg {
    Today,
    Week,
    AllTime,
}

impl From<PeriodArg> for Period {
    fn from(p: PeriodArg) -> Self {
        match p {
            PeriodArg::Today => Period::Today,
            PeriodArg::Week => Period::Week,
            PeriodArg::AllTime => Period::AllTime,
        }
    }
}

#[derive(Subcommand)]
enum OddsCmd {
    /// Win/draw/lose probabilities for an energy commitment
    Fight {
        #[arg(long)]
        energy: u32,
        #[arg(long)]
        strength: u32,
    },
    /// Accept/reject/insult probabilities for a gold offer
    Bribe {
        #[arg(long)]
        gold: u32,
    },
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate a forest and print it as a grid
    Map {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Optional rules file (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Dump the full map as JSON instead of the grid
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print encounter probabilities under the configured models
    Odds {
        #[command(subcommand)]
        which: OddsCmd,
        #[arg(long, global = true)]
        config: Option<PathBuf>,
    },
    /// Let the autopilot play one session
    Auto {
        /// RNG seed; a fresh random session when omitted
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Custom catalog JSON (overrides --locale)
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, default_value = "en")]
        locale: String,
        #[arg(long, default_value = "")]
        pseudonym: String,
        /// Energy per fight as a multiple of enemy strength
        #[arg(long, default_value_t = 1.5)]
        energy_factor: f64,
        /// Append the final score to this JSON leaderboard
        #[arg(long)]
        leaderboard: Option<PathBuf>,
        /// Print the session snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the best scores stored in a JSON leaderboard
    Leaderboard {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = PeriodArg::AllTime)]
        period: PeriodArg,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the effective rules as JSON
    ConfigDump {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Parser)]
#[command(name = "forest-cli")]
#[command(about = "Forest rescue CLI harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn tile_glyph(tile: &Tile) -> String {
    if tile.is_swamp {
        "~".into()
    } else if tile.is_player_start {
        "S".into()
    } else if tile.is_princess_tile {
        "P".into()
    } else if tile.enemy.tier.level() >= 10 {
        "X".into()
    } else {
        tile.enemy.tier.level().to_string()
    }
}

fn print_grid(map: &ForestMap) {
    for row in (0..map.size()).filter_map(|r| map.row(r)) {
        let line: Vec<String> = row.iter().map(tile_glyph).collect();
        println!("{}", line.join(" "));
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Map { seed, config, json } => {
            let config = load_config(config.as_deref())?;
            let catalog = load_catalog(None, "en")?;
            let mut dice = Dice::from_seed(seed);
            let map = ForestMap::generate(&config, &catalog, &mut dice);
            if json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                print_grid(&map);
                println!(
                    "start={:?} princess={:?} swamps={}",
                    map.start(),
                    map.princess(),
                    map.swamp_count()
                );
            }
        }
        Cmd::Odds { which, config } => {
            let config = load_config(config.as_deref())?;
            match which {
                OddsCmd::Fight { energy, strength } => {
                    let o = fight_odds(&config.fight, energy, strength);
                    println!(
                        "energy={} strength={} => win={:.4} draw={:.4} lose={:.4}",
                        energy, strength, o.win, o.draw, o.lose
                    );
                }
                OddsCmd::Bribe { gold } => {
                    let o = bribe_odds(&config.bribe, gold);
                    println!(
                        "gold={} => accept={:.4} reject={:.4} insult={:.4}",
                        gold, o.accept, o.reject, o.insult
                    );
                }
            }
        }
        Cmd::Auto {
            seed,
            config,
            catalog,
            locale,
            pseudonym,
            energy_factor,
            leaderboard,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let catalog = load_catalog(catalog.as_deref(), &locale)?;
            let identity = PlayerIdentity::new(pseudonym, None);
            let dice = seed.map_or_else(Dice::from_entropy, Dice::from_seed);
            let mut session = Session::new(config, catalog, identity, dice);
            let steps = Autopilot::new(energy_factor).play(&mut session)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&session.snapshot(usize::MAX))?);
            } else {
                for entry in session.log().entries() {
                    println!("{}", entry.to_line());
                }
                if let Some(over) = session.game_over() {
                    println!(
                        "ending={} score={} title={} steps={}",
                        over.ending, over.summary.score, over.summary.title, steps
                    );
                }
            }

            if let Some(path) = leaderboard {
                let mut board = JsonFileLeaderboard::new(path);
                // A storage failure never changes the ending already printed.
                match session.submit_score(&mut board) {
                    Ok(record) => eprintln!("[SCORE] saved {} for {}", record.score, record.pseudonym),
                    Err(e) => eprintln!("[SCORE] not saved: {e}"),
                }
            }
        }
        Cmd::Leaderboard { file, period, limit } => {
            let board = JsonFileLeaderboard::new(file);
            let top = board.top(period.into(), limit)?;
            if top.is_empty() {
                println!("no scores yet");
            }
            for (i, entry) in top.iter().enumerate() {
                println!(
                    "{:>2}. {:<20} {:>5}  {}  {}",
                    i + 1,
                    entry.record.pseudonym,
                    entry.record.score,
                    entry.record.title,
                    entry.record.ending
                );
            }
        }
        Cmd::ConfigDump { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
