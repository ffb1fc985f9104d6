//! Pickem CLI
//!
//! Commands:
//! - `pickem score` - Score and rank a slate for a pool format
//! - `pickem survivor` - Rank survivor options for one entry
//! - `pickem diversify` - Assign a batch of survivor entries
//! - `pickem points-plus` - Choose a Points-Plus card
//! - `pickem check-config` - Validate configuration

pub mod output;
pub mod slate;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{AppConfig, WeightConfig, DEFAULT_PROFILE};
use crate::domain::ScoringRun;
use crate::error::PickemError;
use crate::scoring::ConfidenceCalculator;
use crate::strategy::{rank_picks, PointsPlusRules, PointsPlusSelector, PoolFormat};
use crate::survivor::{DiversificationStrategy, Diversifier, SurvivorEvEngine};
use output::{
    print_items, print_json, print_kv, print_success, print_warn, OutputMode, PlanRow,
    PointsPlusRow, ScoreRow, SurvivorRow,
};
use slate::SlateFile;

/// Sports pool pick engine
#[derive(Parser, Debug)]
#[command(name = "pickem")]
#[command(version, about = "Confidence and expected-value engine for sports pool picks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true, default_value = "config", env = "PICKEM_CONFIG_DIR")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a slate and rank it for a pool format
    Score {
        /// Slate JSON file
        #[arg(short, long)]
        slate: PathBuf,
        /// Weight profile
        #[arg(short, long, default_value = DEFAULT_PROFILE)]
        profile: String,
        /// Pool format (su, ats, points-plus, survivor)
        #[arg(short, long, default_value = "su")]
        format: PoolFormat,
        #[arg(long)]
        json: bool,
    },
    /// Rank survivor options for one entry
    Survivor {
        #[arg(short, long)]
        slate: PathBuf,
        /// Entry id from the slate
        #[arg(short, long)]
        entry: String,
        #[arg(short, long, default_value = DEFAULT_PROFILE)]
        profile: String,
        #[arg(long)]
        json: bool,
    },
    /// Assign one pick to every entry in the slate
    Diversify {
        #[arg(short, long)]
        slate: PathBuf,
        /// block, correlated or hedge
        #[arg(long)]
        strategy: DiversificationStrategy,
        #[arg(short, long, default_value = DEFAULT_PROFILE)]
        profile: String,
        #[arg(long)]
        json: bool,
    },
    /// Choose a Points-Plus card
    PointsPlus {
        #[arg(short, long)]
        slate: PathBuf,
        #[arg(long)]
        min_games: usize,
        #[arg(long)]
        max_games: Option<usize>,
        /// Require equal favorite and underdog counts
        #[arg(long)]
        balanced: bool,
        /// Allow games lined at zero
        #[arg(long)]
        allow_pickem: bool,
        #[arg(short, long, default_value = DEFAULT_PROFILE)]
        profile: String,
        #[arg(long)]
        json: bool,
    },
    /// Load and validate configuration
    CheckConfig,
}

/// Run a parsed command
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::CheckConfig => check_config(&cli.config),
        command => {
            let config = AppConfig::load_validated(&cli.config)
                .with_context(|| format!("loading config from {}", cli.config.display()))?;
            match command {
                Commands::Score {
                    slate,
                    profile,
                    format,
                    json,
                } => score(&config, &slate, &profile, format, OutputMode::from_json_flag(json)),
                Commands::Survivor {
                    slate,
                    entry,
                    profile,
                    json,
                } => survivor(&config, &slate, &entry, &profile, OutputMode::from_json_flag(json)),
                Commands::Diversify {
                    slate,
                    strategy,
                    profile,
                    json,
                } => diversify(&config, &slate, strategy, &profile, OutputMode::from_json_flag(json)),
                Commands::PointsPlus {
                    slate,
                    min_games,
                    max_games,
                    balanced,
                    allow_pickem,
                    profile,
                    json,
                } => {
                    let rules = PointsPlusRules {
                        min_games,
                        max_games,
                        balance_favorites: balanced,
                        allow_pickem,
                    };
                    points_plus(&config, &slate, rules, &profile, OutputMode::from_json_flag(json))
                }
                Commands::CheckConfig => Ok(()),
            }
        }
    }
}

fn weights<'a>(config: &'a AppConfig, profile: &str) -> Result<&'a WeightConfig, PickemError> {
    config
        .profile(profile)
        .ok_or_else(|| PickemError::UnknownProfile(profile.to_string()))
}

fn score_slate(config: &AppConfig, slate: &SlateFile, profile: &str) -> anyhow::Result<ScoringRun> {
    let weights = weights(config, profile)?;
    let calculator = ConfidenceCalculator::new(weights, &config.confidence);
    let run = calculator.score_slate(profile, &slate.games);
    if run.degraded_count() > 0 {
        warn!(
            degraded = run.degraded_count(),
            games = run.picks.len(),
            "some games scored with missing inputs"
        );
    }
    Ok(run)
}

fn score(
    config: &AppConfig,
    path: &Path,
    profile: &str,
    format: PoolFormat,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let slate = SlateFile::load(path)?;
    let run = score_slate(config, &slate, profile)?;
    let ranked = rank_picks(&run.picks, format);

    match mode {
        OutputMode::Json => print_json(&serde_json::json!({
            "run": run,
            "format": format,
            "ranking": ranked,
        })),
        OutputMode::Table => {
            let rows: Vec<ScoreRow> = ranked
                .iter()
                .map(|row| {
                    let pick = run.picks.iter().find(|p| p.game_id == row.game_id);
                    ScoreRow::new(row, pick)
                })
                .collect();
            print_items(&rows, mode)?;
            print_kv("run", &run.run_id.to_string());
            print_kv("format", format.as_str());
            Ok(())
        }
    }
}

fn survivor(
    config: &AppConfig,
    path: &Path,
    entry_id: &str,
    profile: &str,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let slate = SlateFile::load(path)?;
    let pool = slate.pool()?;
    let entry = slate.entry(entry_id)?;
    let run = score_slate(config, &slate, profile)?;
    let options = slate.survivor_options(&run.picks);

    let engine = SurvivorEvEngine::from_config(config.survivor.clone());
    let ranked = engine
        .rank(entry, pool, &options, slate.week)
        .map_err(PickemError::from)?;

    let rows: Vec<SurvivorRow> = ranked.iter().map(SurvivorRow::from).collect();
    match mode {
        OutputMode::Json => print_json(&ranked),
        OutputMode::Table => {
            print_items(&rows, mode)?;
            print_kv("entry", entry_id);
            print_kv("week", &slate.week.to_string());
            Ok(())
        }
    }
}

fn diversify(
    config: &AppConfig,
    path: &Path,
    strategy: DiversificationStrategy,
    profile: &str,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let slate = SlateFile::load(path)?;
    let pool = slate.pool()?;
    let run = score_slate(config, &slate, profile)?;
    let options = slate.survivor_options(&run.picks);

    let engine = SurvivorEvEngine::from_config(config.survivor.clone());
    let plan = Diversifier::new(&engine, &config.diversification).assign(
        &slate.entries,
        pool,
        &options,
        slate.week,
        strategy,
    );
    info!(
        %strategy,
        assigned = plan.assigned().count(),
        unresolved = plan.unresolved().count(),
        "diversification complete"
    );

    match mode {
        OutputMode::Json => print_json(&plan),
        OutputMode::Table => {
            let rows: Vec<PlanRow> = plan.entries.iter().map(PlanRow::from).collect();
            print_items(&rows, mode)?;
            let unresolved = plan.unresolved().count();
            if unresolved > 0 {
                print_warn(&format!("{unresolved} entries unresolved under {strategy}"));
            }
            Ok(())
        }
    }
}

fn points_plus(
    config: &AppConfig,
    path: &Path,
    rules: PointsPlusRules,
    profile: &str,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let slate = SlateFile::load(path)?;
    let run = score_slate(config, &slate, profile)?;
    let selector = PointsPlusSelector::new(rules).map_err(PickemError::from)?;
    let selection = selector.select(&run.picks).map_err(PickemError::from)?;

    match mode {
        OutputMode::Json => print_json(&selection),
        OutputMode::Table => {
            let rows: Vec<PointsPlusRow> = selection.picks.iter().map(PointsPlusRow::from).collect();
            print_items(&rows, mode)?;
            print_kv(
                "expected points",
                &format!("{:+.2}", selection.total_expected_points),
            );
            print_kv(
                "favorites / underdogs / pick'ems",
                &format!(
                    "{} / {} / {}",
                    selection.favorites, selection.underdogs, selection.pickems
                ),
            );
            Ok(())
        }
    }
}

fn check_config(dir: &Path) -> anyhow::Result<()> {
    let config = AppConfig::load_from(dir)
        .with_context(|| format!("loading config from {}", dir.display()))?;
    match config.validate() {
        Ok(()) => {
            let mut profiles: Vec<&String> = config.weights.keys().collect();
            profiles.sort();
            for name in profiles {
                print_kv("profile", name);
            }
            print_success("configuration OK");
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                output::print_error(error);
            }
            anyhow::bail!("{} configuration error(s)", errors.len())
        }
    }
}
