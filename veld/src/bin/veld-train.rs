//! Command-line entry point: runs a configured list of learning agents
//! on one environment and logs the outcome.
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use veld::config::{defaults, load_agents, AgentSpec};
use veld::factory::{build_blackjack, build_maze, BatchLimits, EnvKind};
use veld_core::methods::Method;
use veld_core::record::{GridSnapshot, Record, RecordValue};
use veld_core::Env;

#[derive(Parser, Debug)]
#[command(
    name = "veld-train",
    about = "Run reinforcement learning methods against an environment"
)]
struct Args {
    /// Environment to run on.
    #[arg(short, long, value_enum)]
    environment: EnvKind,

    /// Training iterations; for batch methods the number of episodes in
    /// the sample batch.
    #[arg(short, long)]
    iterations: u64,

    /// YAML file with the list of learning agents.
    #[arg(short, long)]
    config: PathBuf,

    /// Environment variant.
    #[arg(long, default_value = "simple")]
    variant: String,

    /// Episodes of the greedy evaluation pass.
    #[arg(long, default_value_t = defaults::EVALUATION_EPISODES)]
    evaluation_episodes: u64,
}

/// Logarithmically spaced checkpoints from `first` to `last`.
fn log_spaced(first: u64, last: u64, count: u32) -> Vec<u64> {
    if last <= first || count < 2 {
        return vec![last.max(1)];
    }
    let lo = (first as f64).log10();
    let hi = (last as f64).log10();
    let mut points: Vec<u64> = (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            10f64.powf(lo + t * (hi - lo)).floor() as u64
        })
        .collect();
    points.dedup();
    points
}

fn reporting_points(spec: &AgentSpec, iterations: u64) -> Vec<u64> {
    if spec.method.is_batch() {
        (1..=defaults::BATCH_MAX_ITERATIONS).collect()
    } else {
        log_spaced(defaults::FIRST_REPORT, iterations, defaults::NUMBER_OF_REPORTS)
    }
}

/// Target-at schedules hit their target near the end of the configured
/// run.
fn apply_target_defaults(spec: &mut AgentSpec, iterations: u64) {
    let target = (iterations as f64 * defaults::TARGET_AT_PERCENTAGE).floor() as u64;
    if spec.epsilon_type.is_target_at() {
        spec.epsilon_target_iterations = Some(target);
    }
    if spec.alpha_type.is_target_at() {
        spec.alpha_target_iterations = Some(target);
    }
}

fn run_agent<E: Env>(
    method: &mut dyn Method<E>,
    snapshots: &mut GridSnapshot<E>,
    iterations: u64,
    reporting_points: &[u64],
    evaluation_episodes: u64,
) -> Result<Record> {
    let mut record = Record::empty();
    record.insert("agent", RecordValue::String(method.name().to_string()));
    record.insert("started", RecordValue::DateTime(Local::now()));

    let learned = method.learn(iterations, reporting_points, snapshots)?;
    record.insert("train_min_length", RecordValue::Scalar(learned.lengths.min));
    record.insert("train_mean_length", RecordValue::Scalar(learned.lengths.mean));
    record.insert("train_max_length", RecordValue::Scalar(learned.lengths.max));
    if let Some(last) = learned.rewards.last() {
        record.insert("train_reward", RecordValue::Scalar(last.reward));
    }

    let evaluated = method.evaluate(evaluation_episodes)?;
    record.insert("eval_reward", RecordValue::Scalar(evaluated.reward));
    record.insert("eval_min_length", RecordValue::Scalar(evaluated.lengths.min));
    record.insert("eval_mean_length", RecordValue::Scalar(evaluated.lengths.mean));
    record.insert("eval_max_length", RecordValue::Scalar(evaluated.lengths.max));

    Ok(record)
}

fn log_record(record: &Record) {
    let mut keys: Vec<&String> = record.keys().collect();
    keys.sort();
    for key in keys {
        if let Some(value) = record.get(key) {
            info!("  {} = {:?}", key, value);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut agents = load_agents(&args.config)?;
    for spec in &mut agents {
        apply_target_defaults(spec, args.iterations);
    }

    let batch = Some(BatchLimits {
        max_iterations: defaults::BATCH_MAX_ITERATIONS,
        stopping_limit: defaults::BATCH_STOPPING_LIMIT,
    });

    for spec in &agents {
        let points = reporting_points(spec, args.iterations);
        let batch = if spec.method.is_batch() { batch } else { None };

        let (record, snapshot_rows) = match args.environment {
            EnvKind::Blackjack => {
                let (mut method, mut snapshots) =
                    build_blackjack(spec, &args.variant, batch)?;
                let record = run_agent(
                    method.as_mut(),
                    &mut snapshots,
                    args.iterations,
                    &points,
                    args.evaluation_episodes,
                )?;
                (record, snapshots.rows().len())
            }
            EnvKind::Maze => {
                let (mut method, mut snapshots) = build_maze(spec, &args.variant, batch)?;
                let record = run_agent(
                    method.as_mut(),
                    &mut snapshots,
                    args.iterations,
                    &points,
                    args.evaluation_episodes,
                )?;
                (record, snapshots.rows().len())
            }
        };

        info!("agent {} finished, {} snapshot rows", spec.name, snapshot_rows);
        log_record(&record);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("{:?}", args);
    run(&args)
}
