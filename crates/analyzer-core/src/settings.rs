use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the raw activity export.
pub const DEFAULT_RAW_PATH: &str = "data/raw/activities.csv";

/// Default location of the cleaned, canonical dataset.
pub const DEFAULT_CANONICAL_PATH: &str = "data/processed/activities_clean.csv";

/// Default number of activities returned by the activity listing.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Running activity analysis over exported workout data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "running-analyzer",
    about = "Running activity analysis over exported workout data",
    version
)]
pub struct Settings {
    /// Raw activity export (CSV)
    #[arg(long, global = true, env = "RUNNING_ANALYZER_RAW_PATH", default_value = DEFAULT_RAW_PATH)]
    pub raw_path: PathBuf,

    /// Cleaned canonical dataset (CSV)
    #[arg(long, global = true, env = "RUNNING_ANALYZER_CANONICAL_PATH", default_value = DEFAULT_CANONICAL_PATH)]
    pub canonical_path: PathBuf,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Query or maintenance action to run.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rebuild the canonical dataset from the raw export
    Process,
    /// Summary statistics
    Stats,
    /// First activities in dataset order
    Activities {
        /// Maximum number of activities to list
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_LIMIT)]
        limit: usize,
    },
    /// Pace over time
    Pace,
    /// Distance per ISO week
    Volume,
    /// Distance per calendar month
    Monthly,
    /// Pace against average heart rate
    Efficiency,
    /// Pace against cadence
    Cadence,
}

// ── StorePaths ─────────────────────────────────────────────────────────────────

/// File locations used by the canonical store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Raw export processed when the canonical file is missing.
    pub raw: PathBuf,
    /// Canonical dataset read on first query.
    pub canonical: PathBuf,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self {
            raw: PathBuf::from(DEFAULT_RAW_PATH),
            canonical: PathBuf::from(DEFAULT_CANONICAL_PATH),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Paths for the canonical store.
    pub fn store_paths(&self) -> StorePaths {
        StorePaths {
            raw: self.raw_path.clone(),
            canonical: self.canonical_path.clone(),
        }
    }

    /// Log level to hand to the logging bootstrap; `--debug` wins.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        Settings::try_parse_from(std::iter::once("running-analyzer").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&["stats"]);
        assert_eq!(settings.command, Command::Stats);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        // Env vars may override the paths in CI; only check they are set.
        assert!(!settings.raw_path.as_os_str().is_empty());
        assert!(!settings.canonical_path.as_os_str().is_empty());
    }

    #[test]
    fn test_explicit_paths() {
        let settings = parse(&[
            "--raw-path",
            "/tmp/raw.csv",
            "--canonical-path",
            "/tmp/clean.csv",
            "pace",
        ]);
        let paths = settings.store_paths();
        assert_eq!(paths.raw, PathBuf::from("/tmp/raw.csv"));
        assert_eq!(paths.canonical, PathBuf::from("/tmp/clean.csv"));
        assert_eq!(settings.command, Command::Pace);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let settings = parse(&["volume", "--log-level", "WARNING"]);
        assert_eq!(settings.command, Command::Volume);
        assert_eq!(settings.log_level, "WARNING");
    }

    #[test]
    fn test_activities_limit() {
        let settings = parse(&["activities"]);
        assert_eq!(
            settings.command,
            Command::Activities {
                limit: DEFAULT_ACTIVITY_LIMIT
            }
        );

        let settings = parse(&["activities", "--limit", "5"]);
        assert_eq!(settings.command, Command::Activities { limit: 5 });
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = Settings::try_parse_from(["running-analyzer", "--log-level", "LOUD", "stats"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(Settings::try_parse_from(["running-analyzer"]).is_err());
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = parse(&["--debug", "stats"]);
        assert_eq!(settings.effective_log_level(), "DEBUG");

        let settings = parse(&["--log-level", "ERROR", "stats"]);
        assert_eq!(settings.effective_log_level(), "ERROR");
    }

    #[test]
    fn test_store_paths_default() {
        let paths = StorePaths::default();
        assert_eq!(paths.raw, PathBuf::from(DEFAULT_RAW_PATH));
        assert_eq!(paths.canonical, PathBuf::from(DEFAULT_CANONICAL_PATH));
    }
}
