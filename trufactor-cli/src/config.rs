//! Demo driver configuration and CLI argument parsing
//!
//! Settings come from command-line arguments, falling back to environment
//! variables with the `TRUFACTOR_` prefix, then to defaults.
//!
//! # Example Usage
//!
//! ```bash
//! # Defaults: domain "demo", 1s readiness, 1s fetch
//! trufactor-demo
//!
//! # Faster timings, log every hook
//! trufactor-demo --ready-delay-ms 100 --fetch-delay-ms 100 --hooks
//!
//! # Using environment variables
//! export TRUFACTOR_DOMAIN=acme
//! export TRUFACTOR_DATES=2019-04-05,2019-04-06,2019-04-07
//! trufactor-demo --json
//! ```

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;
use trufactor::DemoDataSourceBuilder;

/// Accepted values for `--log-level`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure for the demo driver
#[derive(Debug, Clone)]
pub struct Config {
    /// Data source settings
    pub source: SourceConfig,
    /// What to print after the fetch
    pub output: OutputConfig,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// Settings passed through to [`DemoDataSourceBuilder`]
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub domain: String,
    pub ready_delay: Duration,
    pub fetch_delay: Duration,
    pub progress_window: Duration,
    /// Available dates, oldest first
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// Attach a logging hook at every hook point
    pub hooks: bool,
    /// Print the dataset as JSON instead of a summary
    pub json: bool,
}

impl SourceConfig {
    pub fn builder(&self) -> DemoDataSourceBuilder {
        DemoDataSourceBuilder::new()
            .domain(self.domain.clone())
            .ready_delay(self.ready_delay)
            .fetch_delay(self.fetch_delay)
            .progress_window(self.progress_window)
            .dates(self.dates.clone())
    }
}

/// Command-line arguments for the demo driver
///
/// All arguments can also be set via environment variables with the
/// TRUFACTOR_ prefix. CLI arguments take precedence over environment variables.
#[derive(Parser, Debug)]
#[command(
    name = "trufactor-demo",
    about = "Run the Trufactor client in demo mode",
    long_about = "Run the Trufactor client in demo mode: wait for readiness, fetch the canned dataset and report what a UI would see.\n\nEnvironment variables with TRUFACTOR_ prefix are supported. CLI arguments take precedence over environment variables."
)]
pub struct Args {
    #[arg(
        long,
        value_name = "NAME",
        help = "Data source domain",
        default_value = "demo",
        env = "TRUFACTOR_DOMAIN"
    )]
    pub domain: String,

    // Timings
    #[arg(
        long,
        value_name = "MS",
        help = "Delay before the source reports ready (milliseconds)",
        default_value_t = 1000,
        env = "TRUFACTOR_READY_DELAY_MS"
    )]
    pub ready_delay_ms: u64,
    #[arg(
        long,
        value_name = "MS",
        help = "Simulated fetch latency (milliseconds)",
        default_value_t = 1000,
        env = "TRUFACTOR_FETCH_DELAY_MS"
    )]
    pub fetch_delay_ms: u64,
    #[arg(
        long,
        value_name = "MS",
        help = "Quiet window for progress updates (milliseconds)",
        default_value_t = 50,
        env = "TRUFACTOR_PROGRESS_WINDOW_MS"
    )]
    pub progress_window_ms: u64,

    #[arg(
        long = "date",
        value_name = "YYYY-MM-DD",
        help = "Available date, oldest first (repeatable)",
        default_value = "2019-04-07",
        value_delimiter = ',',
        env = "TRUFACTOR_DATES"
    )]
    pub dates: Vec<NaiveDate>,

    // Output
    #[arg(long, help = "Log every hook invocation", env = "TRUFACTOR_HOOKS")]
    pub hooks: bool,
    #[arg(
        long,
        help = "Print the fetched dataset as JSON",
        env = "TRUFACTOR_JSON"
    )]
    pub json: bool,

    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "TRUFACTOR_LOG_LEVEL"
    )]
    pub log_level: String,

    #[arg(
        long,
        help = "List all environment variables and exit",
        action = clap::ArgAction::SetTrue
    )]
    pub list_env_vars: bool,
}

impl Config {
    /// Build configuration from environment variables and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the log level is unknown or the dates are not in
    /// ascending order.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        if args.list_env_vars {
            Self::print_env_vars();
            std::process::exit(0);
        }

        Self::from_args(args)
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let config = Config {
            source: SourceConfig {
                domain: args.domain,
                ready_delay: Duration::from_millis(args.ready_delay_ms),
                fetch_delay: Duration::from_millis(args.fetch_delay_ms),
                progress_window: Duration::from_millis(args.progress_window_ms),
                dates: args.dates,
            },
            output: OutputConfig {
                hooks: args.hooks,
                json: args.json,
            },
            log_level: args.log_level.to_lowercase(),
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level: {}. Valid options are: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.source.dates.is_empty() {
            return Err(anyhow!("At least one date must be specified"));
        }

        if let Some(pair) = self.source.dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(anyhow!(
                "Dates must be listed oldest first without repeats: {} is followed by {}",
                pair[0],
                pair[1]
            ));
        }

        Ok(())
    }

    fn print_env_vars() {
        println!("Trufactor Demo Environment Variables");
        println!("====================================");
        println!();
        println!("All environment variables use the TRUFACTOR_ prefix.");
        println!("CLI arguments take precedence over environment variables.");
        println!();

        println!("Data Source:");
        println!("  TRUFACTOR_DOMAIN=<name>               Data source domain [default: demo]");
        println!(
            "  TRUFACTOR_DATES=<d1,d2,...>           Available dates, oldest first [default: 2019-04-07]"
        );
        println!();

        println!("Timings:");
        println!("  TRUFACTOR_READY_DELAY_MS=<ms>         Readiness delay [default: 1000]");
        println!("  TRUFACTOR_FETCH_DELAY_MS=<ms>         Simulated fetch latency [default: 1000]");
        println!("  TRUFACTOR_PROGRESS_WINDOW_MS=<ms>     Progress update window [default: 50]");
        println!();

        println!("Output:");
        println!("  TRUFACTOR_HOOKS=true|false            Log every hook invocation");
        println!("  TRUFACTOR_JSON=true|false             Print the dataset as JSON");
        println!(
            "  TRUFACTOR_LOG_LEVEL=<level>           Log level: error, warn, info, debug, trace [default: info]"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let mut argv = vec!["trufactor-demo"];
        argv.extend_from_slice(args);
        Config::from_args(Args::try_parse_from(argv)?)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.source.domain, "demo");
        assert_eq!(config.source.ready_delay, Duration::from_millis(1000));
        assert_eq!(config.source.fetch_delay, Duration::from_millis(1000));
        assert_eq!(config.source.progress_window, Duration::from_millis(50));
        assert_eq!(config.source.dates, vec![date(2019, 4, 7)]);
        assert!(!config.output.hooks);
        assert!(!config.output.json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--domain",
            "acme",
            "--ready-delay-ms",
            "0",
            "--fetch-delay-ms",
            "25",
            "--date",
            "2019-04-06",
            "--date",
            "2019-04-07",
            "--hooks",
            "--json",
            "--log-level",
            "DEBUG",
        ])
        .unwrap();

        assert_eq!(config.source.domain, "acme");
        assert_eq!(config.source.ready_delay, Duration::ZERO);
        assert_eq!(config.source.fetch_delay, Duration::from_millis(25));
        assert_eq!(
            config.source.dates,
            vec![date(2019, 4, 6), date(2019, 4, 7)]
        );
        assert!(config.output.hooks);
        assert!(config.output.json);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_comma_separated_dates() {
        let config = parse(&["--date", "2019-04-05,2019-04-06"]).unwrap();
        assert_eq!(
            config.source.dates,
            vec![date(2019, 4, 5), date(2019, 4, 6)]
        );
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(parse(&["--log-level", "verbose"]).is_err());
    }

    #[test]
    fn test_unordered_dates_rejected() {
        assert!(parse(&["--date", "2019-04-07,2019-04-06"]).is_err());
        assert!(parse(&["--date", "2019-04-07,2019-04-07"]).is_err());
    }

    #[test]
    fn test_malformed_date_rejected() {
        assert!(parse(&["--date", "April 7th"]).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_builder_carries_settings() {
        use trufactor::DataSource;

        let config = parse(&["--domain", "acme", "--date", "2019-04-06,2019-04-07"]).unwrap();
        let source = config.source.builder().build().unwrap();

        assert_eq!(source.domain(), "acme");
        assert_eq!(source.dates_available().len(), 2);
        assert_eq!(source.selected_date(), date(2019, 4, 7));
    }
}
