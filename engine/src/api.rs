use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::autopilot::{Autopilot, AutopilotError};
use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::content::DEFAULT_LOCALE;
use crate::leaderboard::PlayerIdentity;
use crate::score::{Ending, Title};
use crate::{Dice, Session};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub config_path: Option<String>,
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub pseudonym: Option<String>,
    #[serde(default)]
    pub autopilot: Autopilot,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            config_path: None,
            catalog_path: None,
            locale: default_locale(),
            pseudonym: None,
            autopilot: Autopilot::default(),
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunResult {
    pub seed: u64,
    pub ending: Ending,
    pub score: u32,
    pub title: Title,
    pub steps: usize,
    pub kills: usize,
    pub gold: u32,
    pub energy_left: u32,
    pub killed_by: Option<String>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunStats {
    pub samples: u32,
    /// Sessions the autopilot could not finish.
    pub trapped: u32,
    pub endings: BTreeMap<String, u32>,
    pub average_score: f64,
    pub best_score: u32,
    pub best_seed: u64,
}

impl RunStats {
    pub fn count(&self, ending: Ending) -> u32 {
        self.endings.get(ending.as_str()).copied().unwrap_or(0)
    }

    pub fn rate(&self, ending: Ending) -> f64 {
        let finished = self.samples - self.trapped;
        if finished == 0 {
            0.0
        } else {
            self.count(ending) as f64 / finished as f64
        }
    }
}

/// Rules and catalog named by `cfg`, falling back to the built-ins.
pub fn load_rules(cfg: &RunConfig) -> Result<(GameConfig, Catalog)> {
    let config = match &cfg.config_path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let catalog = match &cfg.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin_locale(&cfg.locale)
            .with_context(|| format!("failed to load built-in catalog '{}'", cfg.locale))?,
    };
    Ok((config, catalog))
}

pub fn simulate_run(cfg: &RunConfig) -> Result<RunResult> {
    let (config, catalog) = load_rules(cfg)?;
    run_once(cfg, config, catalog, cfg.seed)?
        .with_context(|| format!("autopilot trapped on seed {}", cfg.seed))
}

/// Plays `samples` sessions with seeds `seed..seed+samples`.
pub fn simulate_runs(cfg: &RunConfig, samples: u32) -> Result<RunStats> {
    let (config, catalog) = load_rules(cfg)?;
    let mut stats = RunStats { samples, ..RunStats::default() };
    let mut total = 0u64;
    let mut finished = 0u32;
    for i in 0..samples {
        let seed = cfg.seed.wrapping_add(i as u64);
        let Some(run) = run_once(cfg, config.clone(), catalog.clone(), seed)? else {
            stats.trapped += 1;
            continue;
        };
        *stats.endings.entry(run.ending.as_str().to_string()).or_default() += 1;
        total += run.score as u64;
        if finished == 0 || run.score > stats.best_score {
            stats.best_score = run.score;
            stats.best_seed = seed;
        }
        finished += 1;
    }
    if finished > 0 {
        stats.average_score = total as f64 / finished as f64;
    }
    Ok(stats)
}

/// `None` when swamps wall the player in and the autopilot gives up.
fn run_once(
    cfg: &RunConfig,
    config: GameConfig,
    catalog: Catalog,
    seed: u64,
) -> Result<Option<RunResult>> {
    let identity = PlayerIdentity::new(cfg.pseudonym.clone().unwrap_or_default(), None);
    let mut session = Session::new(config, catalog, identity, Dice::from_seed(seed));
    let steps = match cfg.autopilot.play(&mut session) {
        Ok(steps) => steps,
        Err(AutopilotError::Trapped(pos)) => {
            warn!(seed, ?pos, "autopilot trapped");
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("autopilot failed on seed {seed}")),
    };
    let over = session
        .game_over()
        .cloned()
        .with_context(|| format!("session for seed {seed} did not finish"))?;
    debug!(seed, ending = %over.ending, score = over.summary.score, steps, "run finished");

    Ok(Some(RunResult {
        seed,
        ending: over.ending,
        score: over.summary.score,
        title: over.summary.title,
        steps,
        kills: over.summary.kills_count,
        gold: over.summary.total_gold,
        energy_left: over.summary.energy,
        killed_by: over.killed_by,
        log: session.log().entries().iter().map(|e| e.to_line()).collect(),
    }))
}
