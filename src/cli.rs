//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clonetrack - GitHub clone traffic tracker
///
/// GitHub only keeps two weeks of clone traffic. Run `collect` on a
/// schedule to keep the history in a JSON file, then `visualize` to chart it.
///
/// Examples:
///   GITHUB_TOKEN=... GITHUB_USERNAME=octocat clonetrack collect
///   clonetrack visualize --output-dir graphs
///   clonetrack run --data-file data/clone_data.json
///   clonetrack --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// GitHub token with access to repository traffic
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Account whose repositories are tracked
    #[arg(long, env = "GITHUB_USERNAME", global = true)]
    pub username: Option<String>,

    /// Path to the clone data file
    ///
    /// Default: from config or clone_data.json
    #[arg(short, long, value_name = "FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Directory for charts and the summary
    ///
    /// Default: from config or graphs/
    #[arg(short, long, value_name = "DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .clonetrack.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// GitHub API root URL (for GitHub Enterprise)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Repositories requested per listing page (1-100)
    #[arg(long, value_name = "COUNT", global = true)]
    pub per_page: Option<u32>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .clonetrack.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// What to do.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch clone traffic and merge it into the data file
    Collect,
    /// Render charts and a markdown summary from the data file
    Visualize,
    /// Collect, then visualize
    Run,
}

impl Command {
    pub fn collects(self) -> bool {
        matches!(self, Command::Collect | Command::Run)
    }

    pub fn visualizes(self) -> bool {
        matches!(self, Command::Visualize | Command::Run)
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("A command is required: collect, visualize or run".to_string());
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(per_page) = self.per_page {
            if !(1..=100).contains(&per_page) {
                return Err("Per-page must be between 1 and 100".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            command: Some(Command::Collect),
            token: Some("token".to_string()),
            username: Some("octocat".to_string()),
            data_file: None,
            output_dir: None,
            config: None,
            api_url: None,
            timeout: None,
            per_page: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let args = Args::parse_from(["clonetrack", "visualize", "-o", "out", "-v"]);
        assert_eq!(args.command, Some(Command::Visualize));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.verbose);
    }

    #[test]
    fn test_command_phases() {
        assert!(Command::Collect.collects());
        assert!(!Command::Collect.visualizes());
        assert!(Command::Visualize.visualizes());
        assert!(Command::Run.collects() && Command::Run.visualizes());
    }

    #[test]
    fn test_validation_requires_command() {
        let mut args = make_args();
        args.command = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = Some("api.github.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_per_page_range() {
        let mut args = make_args();
        args.per_page = Some(0);
        assert!(args.validate().is_err());
        args.per_page = Some(101);
        assert!(args.validate().is_err());
        args.per_page = Some(50);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
