//! CLI entry point for the stub extractor.
//!
//! Generates `.pyi` stubs from Python sources.
//!
//! # Usage
//!
//! ```bash
//! stub-extractor [OPTIONS] [FILES]...
//!
//! # Write foo.pyi next to foo.py, and a stub for every *.py below pkg/
//! stub-extractor foo.py pkg/
//!
//! # Replace existing stubs, four worker threads
//! stub-extractor --overwrite -j 4 src/
//!
//! # Read source from stdin, write the stub to stdout
//! stub-extractor < foo.py > foo.pyi
//!
//! # Dump the stub tree as JSON
//! stub-extractor --format json < foo.py
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::{self, Read, Write};

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use pyi_core::{Config, WriteSink};
use pyi_scanner::{Converter, StatsSnapshot};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Source identifier used in diagnostics for stdin input.
const STDIN_SOURCE_ID: &str = "<unknown>";

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Generates `.pyi` stub files from Python source files.
///
/// Each input file `foo.py` gets a stub `foo.pyi` next to it; other file
/// names get `.pyi` appended. Directories are searched recursively for
/// `*.py` files. Without inputs, source is read from stdin and the stub is
/// written to stdout.
#[derive(Debug, Parser)]
#[command(name = "stub-extractor", version, about, long_about = None)]
struct Cli {
    /// Python files or directories to convert.
    files: Vec<Utf8PathBuf>,

    /// Replace stubs that already exist.
    #[arg(long)]
    overwrite: bool,

    /// JSON configuration file.
    #[arg(short, long, env = "STUB_EXTRACTOR_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Number of worker threads (defaults to one per CPU).
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Emit `from typing import ...` lines for names the inferred
    /// annotations use.
    #[arg(long)]
    emit_required_imports: bool,

    /// Extra local name treated like `TYPE_CHECKING` in `if` guards.
    ///
    /// May be given more than once.
    #[arg(long = "type-checking-name", value_name = "NAME")]
    type_checking_names: Vec<String>,

    /// Output format for stdin mode.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pyi)]
    format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Output format for stdin mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Stub text.
    Pyi,
    /// The stub tree as JSON.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set, otherwise logs at `debug` with `--verbose`
/// and `info` by default. Logs go to stderr; stdout carries stub text in
/// stdin mode.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the merged
/// configuration is invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if cli.overwrite {
        config.scan.overwrite = true;
    }
    if cli.jobs.is_some() {
        config.scan.max_parallel_jobs = cli.jobs;
    }
    if cli.emit_required_imports {
        config.generate.emit_required_imports = true;
    }
    for name in &cli.type_checking_names {
        if !config.extract.type_checking_names.contains(name) {
            config.extract.type_checking_names.push(name.clone());
        }
    }

    config.validate()?;
    Ok(config)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Converts stdin to a stub (or JSON stub tree) on stdout.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the source is not valid
/// Python, or stdout cannot be written.
fn run_stdin(config: &Config, format: OutputFormat) -> color_eyre::Result<()> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    let mut diagnostics = WriteSink::new(io::stderr().lock());
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Pyi => {
            let stub =
                pyi_scanner::convert_source(&source, STDIN_SOURCE_ID, config, &mut diagnostics)?;
            handle.write_all(stub.as_bytes())?;
        }
        OutputFormat::Json => {
            let extraction = pyi_extract::extract_str(
                &source,
                STDIN_SOURCE_ID,
                &config.extract,
                &mut diagnostics,
            )?;
            serde_json::to_writer_pretty(&mut handle, &extraction.module)?;
            writeln!(handle)?;
        }
    }

    handle.flush()?;
    Ok(())
}

/// Converts the given files and directories, writing stubs next to them.
///
/// Per-file problems are printed as warnings and do not fail the run.
///
/// # Errors
///
/// Returns an error if a directory cannot be walked or the worker pool
/// cannot be built.
fn run_files(config: Config, files: &[Utf8PathBuf]) -> color_eyre::Result<()> {
    info!(inputs = files.len(), "Starting conversion");

    let converter = Converter::new(config);
    let diagnostics = Mutex::new(io::stderr());
    let report = converter.convert_inputs(files, &diagnostics)?;

    let mut handle = diagnostics.into_inner().lock();
    for error in &report.errors {
        writeln!(handle, "WARNING: {error}")?;
    }
    print_stats_summary(&mut handle, &report.stats)?;

    Ok(())
}

/// Writes a one-line summary of a batch run.
fn print_stats_summary<W: Write>(out: &mut W, stats: &StatsSnapshot) -> io::Result<()> {
    if stats.is_complete() && stats.diagnostics == 0 {
        return Ok(());
    }
    writeln!(
        out,
        "{} of {} files converted ({} skipped, {} failed, {} diagnostics)",
        stats.converted, stats.total, stats.skipped, stats.failed, stats.diagnostics
    )
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);

    let config = build_config(&cli)?;
    if cli.files.is_empty() {
        run_stdin(&config, cli.format)
    } else {
        run_files(config, &cli.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stub-extractor").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_files_means_stdin() {
        let cli = parse(&[]);
        assert!(cli.files.is_empty());
        assert_eq!(cli.format, OutputFormat::Pyi);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "--overwrite",
            "-j",
            "3",
            "--emit-required-imports",
            "--type-checking-name",
            "MYPY",
            "a.py",
            "pkg",
        ]);
        let config = build_config(&cli).expect("valid config");

        assert_eq!(cli.files, vec![Utf8PathBuf::from("a.py"), Utf8PathBuf::from("pkg")]);
        assert!(config.scan.overwrite);
        assert_eq!(config.scan.max_parallel_jobs, Some(3));
        assert!(config.generate.emit_required_imports);
        assert_eq!(
            config.extract.type_checking_names,
            vec!["TYPE_CHECKING".to_owned(), "MYPY".to_owned()]
        );
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        assert!(build_config(&parse(&["-j", "0"])).is_err());
        assert!(build_config(&parse(&["--type-checking-name", "not a name"])).is_err());
    }

    #[test]
    fn test_json_format() {
        let cli = parse(&["--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_summary_is_quiet_on_clean_runs() {
        let mut out = Vec::new();
        let clean = StatsSnapshot {
            total: 2,
            converted: 2,
            ..StatsSnapshot::default()
        };
        print_stats_summary(&mut out, &clean).expect("write");
        assert!(out.is_empty());

        let partial = StatsSnapshot {
            total: 3,
            converted: 1,
            skipped: 1,
            failed: 1,
            diagnostics: 4,
        };
        print_stats_summary(&mut out, &partial).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "1 of 3 files converted (1 skipped, 1 failed, 4 diagnostics)\n"
        );
    }
}
