//! Logging infrastructure for blockdupe.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! Logs always go to stderr; stdout carries only the report.
//!
//! # Example
//!
//! ```rust,no_run
//! use blockdupe::logging::init_logging;
//!
//! // -vv: per-round group splits become visible
//! init_logging(2, false);
//!
//! log::trace!("Round 3: group split into 2");
//! ```

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Must be called at most once per process. Later calls are ignored with a
/// debug message instead of panicking, so tests can share one process.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").ok();
    let level = determine_level(verbose, quiet);

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    match &from_env {
        Some(_) => builder.parse_default_env(),
        None => builder.filter_level(level),
    };
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }

    match from_env {
        Some(filter) => log::debug!("Logging initialized from RUST_LOG={filter}"),
        None => log::debug!("Logging initialized at level: {level}"),
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Debug builds get timestamps, plus the module path at -v and above.
/// Release builds print level and message only.
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn level_for(args: &[&str]) -> LevelFilter {
        let mut argv = vec!["blockdupe"];
        argv.extend_from_slice(args);
        argv.push("/data");
        let cli = Cli::try_parse_from(argv).unwrap();
        determine_level(cli.verbose, cli.quiet)
    }

    #[test]
    fn test_no_flags_logs_scan_summary() {
        // Candidate counts and the comparison summary are logged at info
        assert_eq!(level_for(&[]), LevelFilter::Info);
    }

    #[test]
    fn test_verbose_flags() {
        assert_eq!(level_for(&["-v"]), LevelFilter::Debug);
        assert_eq!(level_for(&["-vv"]), LevelFilter::Trace);
        assert_eq!(level_for(&["--verbose", "--verbose", "--verbose"]), LevelFilter::Trace);
    }

    #[test]
    fn test_quiet_flag_keeps_errors_only() {
        assert_eq!(level_for(&["-q"]), LevelFilter::Error);
        assert_eq!(level_for(&["--quiet"]), LevelFilter::Error);
    }

    #[test]
    fn test_quiet_and_verbose_conflict_on_command_line() {
        assert!(Cli::try_parse_from(["blockdupe", "-q", "-v", "/data"]).is_err());
        // Library callers can still pass both; quiet wins
        assert_eq!(determine_level(3, true), LevelFilter::Error);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(0, true);
        init_logging(1, false);
    }
}
