mod config;
mod data;
mod engine;
mod error;
mod ml;

use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{ForecastProfile, RunConfig};
use engine::ForecastPipeline;
use ml::ArtifactPaths;

/// Directory the training service creates before spawning a run
const DATA_DIR: &str = "ml_data";

const USAGE: &str = "Usage: lstm-forecast <config_path> <session_id>";

#[derive(Parser, Debug)]
#[command(name = "lstm-forecast")]
#[command(about = "Train an LSTM price forecaster for one session", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// JSON file with optional `epochs` and `batchSize`
    #[arg(allow_hyphen_values = true)]
    config_path: PathBuf,

    /// Names the output files under ml_data/
    #[arg(allow_hyphen_values = true)]
    session_id: String,
}

/// Exactly two positional arguments, nothing else
fn parse_args<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() != 3 {
        return None;
    }
    // Everything after the program name is a value, including `--`
    args.insert(1, OsString::from("--"));
    Cli::try_parse_from(args).ok()
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> ExitCode {
    let Some(cli) = parse_args(std::env::args_os()) else {
        println!("{}", USAGE);
        return ExitCode::from(1);
    };

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    info!("LSTM forecaster v{}", env!("CARGO_PKG_VERSION"));

    let config = match RunConfig::load(&cli.config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::from(1);
        }
    };

    let paths = ArtifactPaths::new(DATA_DIR, cli.session_id);
    let pipeline = ForecastPipeline::new(ForecastProfile::default(), paths);

    match pipeline.run(&config) {
        Ok(outcome) => {
            info!("Results written to {}", outcome.result_path.display());
            println!(
                "Training completed successfully. Accuracy: {:.4}",
                outcome.record.accuracy
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), "Training failed: {}", e);
            println!("Training failed: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_positionals_parse() {
        let cli = parse_args(["lstm-forecast", "ml_data/config_t1.json", "t1"]).unwrap();
        assert_eq!(cli.config_path, PathBuf::from("ml_data/config_t1.json"));
        assert_eq!(cli.session_id, "t1");
    }

    #[test]
    fn test_wrong_argument_counts_rejected() {
        assert!(parse_args(["lstm-forecast"]).is_none());
        assert!(parse_args(["lstm-forecast", "config.json"]).is_none());
        assert!(parse_args(["lstm-forecast", "config.json", "t1", "extra"]).is_none());
    }

    #[test]
    fn test_help_is_not_a_flag() {
        assert!(parse_args(["lstm-forecast", "--help"]).is_none());
        let cli = parse_args(["lstm-forecast", "config.json", "-x"]).unwrap();
        assert_eq!(cli.session_id, "-x");
    }

    #[test]
    fn test_separator_does_not_change_the_count() {
        assert!(parse_args(["lstm-forecast", "--", "cfg.json", "t1"]).is_none());
        assert!(parse_args(["lstm-forecast", "cfg.json", "--", "t1"]).is_none());
        assert!(parse_args(["lstm-forecast", "cfg.json", "t1", "--"]).is_none());
        assert!(parse_args(["lstm-forecast", "--", "cfg.json"]).is_some());

        let cli = parse_args(["lstm-forecast", "cfg.json", "--"]).unwrap();
        assert_eq!(cli.config_path, PathBuf::from("cfg.json"));
        assert_eq!(cli.session_id, "--");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
