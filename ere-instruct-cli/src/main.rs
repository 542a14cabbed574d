//! Event Relation Instruction CLI Application
//!
//! This is the command-line interface for building instruction-tuning data
//! from event relation corpora. It uses the ere-instruct library and adds:
//! - TOML configuration with command-line overrides
//! - Per-split conversion with parallel document processing
//! - Evaluation of model predictions against converted splits

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use ere_instruct::TaskKind;
use std::path::PathBuf;

mod config;
mod convert;
mod evaluate;

/// ERE Instruct - Build and score event relation instruction data
#[derive(Parser, Debug)]
#[command(name = "ere-instruct-cli")]
#[command(about = "Build instruction examples from event relation corpora", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert corpus splits into instruction examples
    Convert(ConvertArgs),
    /// Score model predictions for a converted split
    Evaluate(EvaluateArgs),
}

/// Overrides shared by both subcommands
#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// Task to build or score
    #[arg(long, value_parser = parse_task)]
    task: Option<TaskKind>,

    /// Directory holding the corpus split files
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Directory for examples and window counts
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Seed for all random choices
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ClapArgs, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Splits to convert (can be repeated)
    #[arg(long = "split", value_name = "NAME")]
    splits: Vec<String>,

    /// Maximum number of non-focal events per window
    #[arg(long, value_name = "COUNT")]
    window_capacity: Option<usize>,
}

#[derive(ClapArgs, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Split the predictions belong to
    #[arg(long, value_name = "NAME", default_value = "test")]
    split: String,

    /// JSON-lines prediction file
    #[arg(short, long, value_name = "FILE")]
    predictions: PathBuf,

    /// Directory receiving eval_results.json
    #[arg(long, value_name = "DIR")]
    eval_dir: PathBuf,
}

fn parse_task(value: &str) -> std::result::Result<TaskKind, String> {
    match value {
        "causal" => Ok(TaskKind::Causal),
        "coref" | "coreference" => Ok(TaskKind::Coreference),
        "subevent" => Ok(TaskKind::Subevent),
        "temporal" => Ok(TaskKind::Temporal),
        other => Err(format!("unknown task '{}' (causal, coref, subevent, temporal)", other)),
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("ERE Instruct CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using ere-instruct library v{}", ere_instruct::VERSION);

    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    match args.command {
        Command::Convert(convert_args) => {
            apply_common(&mut app_config, &convert_args.common);
            if !convert_args.splits.is_empty() {
                app_config.input.splits = convert_args.splits;
            }
            if let Some(capacity) = convert_args.window_capacity {
                app_config.builder.window_capacity = capacity;
            }
            log::debug!("Effective configuration: {:?}", app_config);

            convert::convert_all(&app_config)?;
        }
        Command::Evaluate(eval_args) => {
            apply_common(&mut app_config, &eval_args.common);
            log::debug!("Effective configuration: {:?}", app_config);

            let report = evaluate::evaluate_split(
                &app_config,
                &eval_args.split,
                &eval_args.predictions,
                &eval_args.eval_dir,
            )?;
            println!(
                "{}: precision={:.5}, recall={:.5}, f1={:.5}",
                report.task,
                report.micro.precision * 100.0,
                report.micro.recall * 100.0,
                report.micro.f1 * 100.0
            );
        }
    }

    Ok(())
}

/// Command-line values win over the configuration file
fn apply_common(app_config: &mut config::AppConfig, common: &CommonArgs) {
    if let Some(task) = common.task {
        app_config.task.kind = task;
    }
    if let Some(dir) = &common.input_dir {
        app_config.input.dir = dir.clone();
    }
    if let Some(dir) = &common.output_dir {
        app_config.output.dir = dir.clone();
    }
    if let Some(seed) = common.seed {
        app_config.builder.seed = seed;
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from([
            "ere-instruct-cli",
            "convert",
            "--task",
            "temporal",
            "--seed",
            "9",
            "--split",
            "test",
            "--window-capacity",
            "12",
        ]);
        let Command::Convert(convert_args) = args.command else {
            panic!("expected convert");
        };

        let mut app_config = config::AppConfig::default();
        apply_common(&mut app_config, &convert_args.common);
        assert_eq!(app_config.task.kind, TaskKind::Temporal);
        assert_eq!(app_config.builder.seed, 9);
        assert_eq!(convert_args.splits, vec!["test"]);
        assert_eq!(convert_args.window_capacity, Some(12));
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        assert!(parse_task("sentiment").is_err());
        assert_eq!(parse_task("coref"), Ok(TaskKind::Coreference));
    }
}
