//! Flappy RL headless runner
//!
//! Plays episodes with a built-in policy, optionally writing a JSONL trace of
//! snapshots for an external renderer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use flappy_rl::autopilot::{run_episode, run_episode_with};
use flappy_rl::{EpisodeSummary, GapFollower, HighScores, Observation, Policy, RandomPolicy};
use flappy_rl::{Action, Session, Settings};

#[derive(Parser)]
#[command(name = "flappy-rl", about = "Flap-and-dodge RL environment, headless runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play episodes one after another
    Run(RunArgs),
    /// Play independent sessions in parallel and report throughput
    Bench(BenchArgs),
    /// Print the default settings as JSON
    Settings,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    Gap,
    Random,
}

#[derive(Parser)]
struct RunArgs {
    #[arg(long, default_value = "5")]
    episodes: u32,
    #[arg(long, default_value = "0")]
    seed: u64,
    #[arg(long, value_enum, default_value = "gap")]
    policy: PolicyKind,
    /// Flap probability for the random policy
    #[arg(long, default_value = "0.08")]
    flap_prob: f64,
    /// Truncate episodes after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Settings JSON file (defaults otherwise)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Write one snapshot per tick as JSON lines
    #[arg(long)]
    trace: Option<PathBuf>,
    /// Leaderboard JSON file to update
    #[arg(long)]
    scores: Option<PathBuf>,
}

#[derive(Parser)]
struct BenchArgs {
    #[arg(long, default_value = "64")]
    sessions: u64,
    #[arg(long, default_value = "0")]
    seed: u64,
    #[arg(long, value_enum, default_value = "gap")]
    policy: PolicyKind,
    #[arg(long, default_value = "0.08")]
    flap_prob: f64,
    #[arg(long, default_value = "10000")]
    max_ticks: u64,
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Policy chosen on the command line
enum Pilot {
    Gap(GapFollower),
    Random(RandomPolicy),
}

impl Pilot {
    fn new(kind: PolicyKind, seed: u64, flap_prob: f64) -> Self {
        match kind {
            PolicyKind::Gap => Pilot::Gap(GapFollower::default()),
            PolicyKind::Random => Pilot::Random(RandomPolicy::new(seed, flap_prob)),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Pilot::Gap(_) => "gap",
            Pilot::Random(_) => "random",
        }
    }
}

impl Policy for Pilot {
    fn act(&mut self, obs: &Observation) -> Action {
        match self {
            Pilot::Gap(p) => p.act(obs),
            Pilot::Random(p) => p.act(obs),
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_ref())?;
    let mut session = Session::new(settings, args.seed)?;
    let mut pilot = Pilot::new(args.policy, args.seed, args.flap_prob);

    let mut trace = match &args.trace {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => None,
    };
    let mut scores = match &args.scores {
        Some(path) => Some(HighScores::load(path)?),
        None => None,
    };

    log::info!(
        "Running {} episodes with the {} policy (seed {})",
        args.episodes,
        pilot.name(),
        args.seed
    );

    let mut best = 0;
    for episode in 1..=args.episodes {
        let summary = match trace.as_mut() {
            Some(out) => {
                let mut write_err = None;
                let summary =
                    run_episode_with(&mut session, &mut pilot, args.max_ticks, |s, _| {
                        if write_err.is_some() {
                            return;
                        }
                        let line = serde_json::to_writer(&mut *out, &s.snapshot())
                            .map_err(anyhow::Error::from)
                            .and_then(|_| writeln!(out).map_err(anyhow::Error::from));
                        write_err = line.err();
                    })?;
                if let Some(err) = write_err {
                    return Err(err.context("writing trace"));
                }
                summary
            }
            None => run_episode(&mut session, &mut pilot, args.max_ticks)?,
        };

        best = best.max(summary.score);
        log::info!(
            "Episode {}: Score = {}, Reward = {:.2}, Ticks = {}{}",
            episode,
            summary.score,
            summary.total_reward,
            summary.ticks,
            if summary.truncated { " (truncated)" } else { "" }
        );

        if let Some(board) = scores.as_mut()
            && let Some(rank) = board.add(&summary, pilot.name())
        {
            log::info!("New high score, rank #{rank}");
        }
    }
    log::info!("Best score: {best}");

    if let Some(mut out) = trace {
        out.flush().context("flushing trace")?;
    }
    if let (Some(board), Some(path)) = (scores, &args.scores) {
        board.save(path)?;
    }
    Ok(())
}

fn bench(args: BenchArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_ref())?;

    log::info!(
        "Benchmarking {} sessions on {} threads",
        args.sessions,
        rayon::current_num_threads()
    );
    let start = Instant::now();

    // One independent session and policy per rank
    let summaries: Vec<EpisodeSummary> = (0..args.sessions)
        .into_par_iter()
        .map(|rank| -> Result<EpisodeSummary> {
            let seed = args.seed.wrapping_add(rank);
            let mut session = Session::new(settings.clone(), seed)?;
            let mut pilot = Pilot::new(args.policy, seed, args.flap_prob);
            Ok(run_episode(&mut session, &mut pilot, Some(args.max_ticks))?)
        })
        .collect::<Result<_>>()?;

    let elapsed = start.elapsed().as_secs_f64();
    let n = summaries.len().max(1) as f64;
    let total_ticks: u64 = summaries.iter().map(|s| s.ticks).sum();
    let mean_score = summaries.iter().map(|s| s.score as f64).sum::<f64>() / n;
    let mean_reward = summaries.iter().map(|s| s.total_reward as f64).sum::<f64>() / n;
    let truncated = summaries.iter().filter(|s| s.truncated).count();

    log::info!(
        "Mean score {:.2}, mean reward {:.2}, {} truncated",
        mean_score,
        mean_reward,
        truncated
    );
    log::info!(
        "{} ticks in {:.3}s ({:.0} ticks/s)",
        total_ticks,
        elapsed,
        total_ticks as f64 / elapsed.max(f64::EPSILON)
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Bench(args) => bench(args),
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&Settings::default())?);
            Ok(())
        }
    }
}
