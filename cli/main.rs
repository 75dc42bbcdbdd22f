#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

use ams_grader::config::ConfigError;
use ams_grader::validate::RankCheck;
use ams_grader::{ScoreError, ScoringConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "ams-grader",
    version,
    about = "Scores a signal/background submission by Approximate Median Significance",
    long_about = "Validates a submission's RankOrder column against the expected test-set size, \
                 then sums the solution weights of every event predicted as signal and reports \
                 the Approximate Median Significance (AMS). Running without a subcommand scores \
                 ./solution.csv against ./submission.csv."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission against a solution file
    #[command(about = "Validate and score a submission (prints signal, background and AMS)")]
    Score(ScoreArgs),

    /// Write a configuration file holding the default settings
    #[command(about = "Write a TOML config template (outputs: ams-grader.toml)")]
    InitConfig {
        /// Where to write the template
        #[arg(long, value_name = "PATH", default_value = "ams-grader.toml")]
        out: PathBuf,
    },
}

#[derive(Args, Default)]
struct ScoreArgs {
    /// Solution file with EventId,Label,Weight columns [default: solution.csv]
    #[arg(value_name = "SOLUTION")]
    solution: Option<PathBuf>,

    /// Submission file with EventId,RankOrder,Class columns [default: submission.csv]
    #[arg(value_name = "SUBMISSION")]
    submission: Option<PathBuf>,

    /// TOML file providing defaults for every other option
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of events in the test set; ranks must cover 1..=N [default: 550000]
    #[arg(long, value_name = "N")]
    events: Option<usize>,

    /// Require the ranks to be exactly the integers 1..=N instead of the legacy check
    #[arg(long)]
    strict_ranks: bool,
}

/// Resolves the effective configuration: command-line flags override the config file,
/// which overrides the built-in defaults.
fn resolve_config(args: ScoreArgs) -> Result<ScoringConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    if let Some(solution) = args.solution {
        config.solution_path = solution;
    }
    if let Some(submission) = args.submission {
        config.submission_path = submission;
    }
    if let Some(events) = args.events {
        config.expected_events = events;
    }
    if args.strict_ranks {
        config.rank_check = RankCheck::Strict;
    }
    Ok(config)
}

fn run_score(args: ScoreArgs) -> Result<(), ScoreError> {
    let config = resolve_config(args)?;
    let report = ams_grader::run(&config)?;
    println!("{report}");
    Ok(())
}

fn run_init_config(out: PathBuf) -> Result<(), ScoreError> {
    ScoringConfig::default().save(&out)?;
    println!("Wrote default configuration to {}", out.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Cli { command } = Cli::parse();

    let result = match command {
        Some(Commands::Score(args)) => run_score(args),
        Some(Commands::InitConfig { out }) => run_init_config(out),
        None => run_score(ScoreArgs::default()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
