//! Command-line configuration.

use crate::output::OutputFormat;
use crate::reconciler::MatchPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Directory results are written to unless `--output-dir` is given.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Reconciles cash purchases against the ATM withdrawals that funded them.
#[derive(Parser, Debug)]
#[command(name = "atm-reconcile")]
#[command(version)]
#[command(after_help = "\
Each input is a CSV file with the header line
    id,name,amount,date,is_cash,is_atm
and one transaction per line. Results for <name>.csv are written to
<output-dir>/<name>.reconciled.csv.

Set RUST_LOG (e.g. debug or info) to control logging verbosity.")]
pub struct Cli {
    /// Transaction CSV files to reconcile
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for reconciled files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Write exact amounts instead of whole numbers
    #[arg(long)]
    pub exact: bool,

    /// Stop matching at the first withdrawal that is not older than the
    /// newest remaining purchase
    #[arg(long)]
    pub stop_on_blocked: bool,
}

/// Settings for one run of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub policy: MatchPolicy,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            inputs: cli.inputs,
            output_dir: cli.output_dir,
            format: if cli.exact {
                OutputFormat::Exact
            } else {
                OutputFormat::Legacy
            },
            policy: if cli.stop_on_blocked {
                MatchPolicy::StopAtFirstBlocked
            } else {
                MatchPolicy::DiscardBlocked
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("atm-reconcile").chain(args.iter().copied());
        Config::from(Cli::try_parse_from(argv).unwrap())
    }

    fn parse_err(args: &[&str]) -> ErrorKind {
        let argv = std::iter::once("atm-reconcile").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap_err().kind()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["a.csv", "b.csv"]);
        assert_eq!(config.inputs, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.format, OutputFormat::Legacy);
        assert_eq!(config.policy, MatchPolicy::DiscardBlocked);
    }

    #[test]
    fn test_options() {
        let config = parse(&["--exact", "-o", "out", "a.csv", "--stop-on-blocked"]);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.format, OutputFormat::Exact);
        assert_eq!(config.policy, MatchPolicy::StopAtFirstBlocked);
        assert_eq!(config.inputs, vec![PathBuf::from("a.csv")]);
    }

    #[test]
    fn test_long_output_dir() {
        let config = parse(&["--output-dir", "results", "a.csv"]);
        assert_eq!(config.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_err(&["a.csv", "-h"]), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_err(&[]), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_err(&["--verbose", "a.csv"]), ErrorKind::UnknownArgument);
        assert_eq!(parse_err(&["a.csv", "--output-dir"]), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
