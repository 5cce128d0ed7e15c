//! CLI interface for Bonds
//!
//! Command-line interface built on clap's derive API: practice interviews,
//! report listing and inspection, and environment diagnostics.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::assessment::{SortBy, SortOrder};

/// Bonds interview engine
///
/// Runs timed practice interviews against a language model and turns the
/// resulting assessment reports into structured scores.
#[derive(Parser, Debug)]
#[command(name = "bonds")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an interactive practice interview
    Interview {
        /// Client identity the interview is recorded under
        #[arg(long, default_value = "local")]
        identity: String,
    },

    /// List stored assessment reports
    Assessments {
        /// Sort key
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = Direction::Asc)]
        order: Direction,

        /// Keep only the N most recent interviews
        #[arg(short, long)]
        limit: Option<usize>,

        /// Reports directory override
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show one assessment report
    Show {
        /// Report file path
        file: PathBuf,

        /// Print the stored text instead of parsed scores
        #[arg(long)]
        raw: bool,
    },

    /// Manage the provider API key
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Run system diagnostics
    Doctor,
}

/// Keychain operations
#[derive(Subcommand, Debug)]
pub enum SecretAction {
    /// Store the OpenAI API key (read from stdin) in the OS keychain
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Date,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => SortBy::Date,
            SortKey::Score => SortBy::Score,
        }
    }
}

impl From<Direction> for SortOrder {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => SortOrder::Asc,
            Direction::Desc => SortOrder::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["bonds", "doctor"]);
        assert!(matches!(cli.command, Command::Doctor));
        assert!(!cli.json);
        assert!(cli.log.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["bonds", "--json", "--log", "debug", "doctor"]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
    }

    #[test]
    fn test_interview_default_identity() {
        let cli = Cli::parse_from(["bonds", "interview"]);
        if let Command::Interview { identity } = cli.command {
            assert_eq!(identity, "local");
        } else {
            panic!("Expected Interview command");
        }
    }

    #[test]
    fn test_assessments_options() {
        let cli = Cli::parse_from([
            "bonds",
            "assessments",
            "--sort",
            "score",
            "--order",
            "desc",
            "--limit",
            "5",
        ]);
        if let Command::Assessments {
            sort,
            order,
            limit,
            dir,
        } = cli.command
        {
            assert_eq!(SortBy::from(sort), SortBy::Score);
            assert_eq!(SortOrder::from(order), SortOrder::Desc);
            assert_eq!(limit, Some(5));
            assert!(dir.is_none());
        } else {
            panic!("Expected Assessments command");
        }
    }

    #[test]
    fn test_secret_set() {
        let cli = Cli::parse_from(["bonds", "secret", "set"]);
        assert!(matches!(
            cli.command,
            Command::Secret {
                action: SecretAction::Set
            }
        ));
    }

    #[test]
    fn test_show_raw() {
        let cli = Cli::parse_from(["bonds", "show", "a_assessment_20250101_000000.txt", "--raw"]);
        if let Command::Show { file, raw } = cli.command {
            assert_eq!(file, PathBuf::from("a_assessment_20250101_000000.txt"));
            assert!(raw);
        } else {
            panic!("Expected Show command");
        }
    }
}
