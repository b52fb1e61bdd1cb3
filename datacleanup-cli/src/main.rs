use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use datacleanup_core::{DateSpan, Transaction};
use datacleanup_ingest::{capital_one, chase_visa, chase_visa::ChaseVisaOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

mod config;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "datacleanup",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DATACLEANUP_BUILD_SHA"), ")"),
    about = "Normalize bank exports into date,description,amount CSV"
)]
struct Cli {
    /// Config file (default: $DATACLEANUP_CONFIG or ~/.datacleanup/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a Chase Visa statement text export
    ChaseVisa {
        #[arg(long)]
        input_file_path: PathBuf,

        #[arg(long)]
        output_file_path: PathBuf,

        /// Statement year (YYYY)
        #[arg(long, short = 'y', value_parser = parse_year)]
        year: i32,

        /// December rows belong to the previous year
        #[arg(long)]
        january_statement: bool,

        /// Log lines containing this text after each stage (repeatable)
        #[arg(long)]
        trace: Vec<String>,
    },

    /// Clean a Capital One 360 CSV export
    CapitalOne {
        #[arg(long)]
        input_file_path: PathBuf,

        #[arg(long)]
        output_file_path: PathBuf,
    },

    /// Write a default config file if none exists
    InitConfig,
}

fn parse_year(s: &str) -> std::result::Result<i32, String> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("expected a 4-digit year, got {s:?}"));
    }
    s.parse().map_err(|e| format!("invalid year {s:?}: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = config::config_path(cli.config.as_deref());
    let cfg = config::load_run_config(config_path.as_deref())?;
    logging::init_logging(logging::effective_level(&cfg.logging.level, cli.verbose));

    match cli.command {
        Command::ChaseVisa {
            input_file_path,
            output_file_path,
            year,
            january_statement,
            trace,
        } => {
            check_paths(&input_file_path, &output_file_path)?;

            let mut needles = cfg.chase_visa.trace.clone();
            needles.extend(trace);
            let opts = ChaseVisaOptions {
                year,
                january_statement,
                trace: needles,
            };

            let txns = chase_visa::do_clean(&input_file_path, &output_file_path, &opts)
                .with_context(|| format!("cleaning {}", input_file_path.display()))?;
            report(&txns, &output_file_path);
        }

        Command::CapitalOne {
            input_file_path,
            output_file_path,
        } => {
            check_paths(&input_file_path, &output_file_path)?;

            let txns = capital_one::do_clean(&input_file_path, &output_file_path)
                .with_context(|| format!("cleaning {}", input_file_path.display()))?;
            report(&txns, &output_file_path);
        }

        Command::InitConfig => {
            let path = config_path.with_context(|| {
                format!(
                    "no config location: pass --config, set {} or HOME",
                    config::CONFIG_ENV
                )
            })?;
            config::init_config(&path)?;
        }
    }

    Ok(())
}

/// Input must be an existing file; output must land in an existing directory.
fn check_paths(input: &Path, output: &Path) -> Result<()> {
    if !input.is_file() {
        bail!("input file not found: {}", input.display());
    }

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            bail!("output directory does not exist: {}", dir.display());
        }
    }

    Ok(())
}

fn report(txns: &[Transaction], output: &Path) {
    match DateSpan::of(txns) {
        Some(span) => info!(
            transactions = txns.len(),
            output = %output.display(),
            first = %span.first,
            last = %span.last,
            "wrote transactions"
        ),
        None => info!(
            transactions = txns.len(),
            output = %output.display(),
            "wrote transactions"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chase_visa() {
        let cli = Cli::try_parse_from([
            "datacleanup",
            "chase-visa",
            "--input-file-path",
            "in.txt",
            "--output-file-path",
            "out.csv",
            "-y",
            "2024",
            "--january-statement",
        ])
        .unwrap();

        match cli.command {
            Command::ChaseVisa {
                year,
                january_statement,
                trace,
                ..
            } => {
                assert_eq!(year, 2024);
                assert!(january_statement);
                assert!(trace.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_chase_visa_requires_year() {
        let err = Cli::try_parse_from([
            "datacleanup",
            "chase-visa",
            "--input-file-path",
            "in.txt",
            "--output-file-path",
            "out.csv",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2024"), Ok(2024));
        assert!(parse_year("24").is_err());
        assert!(parse_year("20x4").is_err());
        assert!(parse_year("+202").is_err());
    }

    #[test]
    fn test_parse_capital_one() {
        let cli = Cli::try_parse_from([
            "datacleanup",
            "capital-one",
            "--input-file-path",
            "in.csv",
            "--output-file-path",
            "out.csv",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Command::CapitalOne { .. }));
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["datacleanup"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_version_carries_build_sha() {
        let cmd = Cli::command();
        let version = cmd.get_version().unwrap();
        assert!(version.contains(env!("DATACLEANUP_BUILD_SHA")));
    }

    #[test]
    fn test_run_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let input = dir.path().join("missing.csv");
        let output = dir.path().join("out.csv");

        let err = run(cli(&[
            "--config",
            config.to_str().unwrap(),
            "capital-one",
            "--input-file-path",
            input.to_str().unwrap(),
            "--output-file-path",
            output.to_str().unwrap(),
        ]))
        .unwrap_err();
        assert!(format!("{err:#}").contains("input file not found"));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_short_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let input = dir.path().join("chase.txt");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "01/15 Coffee Shop,4.50\n02 bad\n").unwrap();

        let err = run(cli(&[
            "--config",
            config.to_str().unwrap(),
            "chase-visa",
            "--input-file-path",
            input.to_str().unwrap(),
            "--output-file-path",
            output.to_str().unwrap(),
            "--year",
            "2024",
        ]))
        .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_writes_output() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        let input = dir.path().join("chase.txt");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "01/15 Coffee Shop,4.50\n").unwrap();

        run(cli(&[
            "--config",
            config.to_str().unwrap(),
            "chase-visa",
            "--input-file-path",
            input.to_str().unwrap(),
            "--output-file-path",
            output.to_str().unwrap(),
            "-y",
            "2024",
        ]))
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "date,description,amount\n2024-01-15,Coffee Shop,4.50\n"
        );
    }

    #[test]
    fn test_check_paths() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "").unwrap();

        assert!(check_paths(&input, &dir.path().join("out.csv")).is_ok());
        assert!(check_paths(&input, Path::new("out.csv")).is_ok());
        assert!(check_paths(&dir.path().join("missing.csv"), &dir.path().join("out.csv")).is_err());
        assert!(check_paths(&input, &dir.path().join("nope").join("out.csv")).is_err());
        assert!(check_paths(dir.path(), &dir.path().join("out.csv")).is_err());
    }
}
