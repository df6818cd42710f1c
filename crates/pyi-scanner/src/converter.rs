//! Parallel conversion of Python files to stubs.
//!
//! Uses the "collect-then-parallelize" pattern: input paths are collected
//! first (see [`collect_inputs`](crate::collect_inputs)), then converted in
//! parallel with rayon. Each worker thread owns one [`PyParser`], created
//! through `map_init`.
//!
//! Diagnostics of one file are buffered while it is extracted and then
//! written to the shared sink in one locked batch, so lines of different
//! files never interleave.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use pyi_core::{Config, Diagnostic};
use pyi_extract::{ParseError, PyParser};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ScanError;
use crate::stats::{ScanStats, StatsSnapshot};
use crate::walker::collect_inputs;

/// Returns the stub path for `source`: `foo.py` becomes `foo.pyi`, any other
/// name gets `.pyi` appended.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use pyi_scanner::stub_path;
///
/// assert_eq!(stub_path(Utf8Path::new("pkg/mod.py")), "pkg/mod.pyi");
/// assert_eq!(stub_path(Utf8Path::new("bin/tool")), "bin/tool.pyi");
/// ```
#[must_use]
pub fn stub_path(source: &Utf8Path) -> Utf8PathBuf {
    if source.extension() == Some("py") {
        source.with_extension("pyi")
    } else {
        Utf8PathBuf::from(format!("{source}.pyi"))
    }
}

/// Outcome of a batch conversion.
#[derive(Debug)]
pub struct ConversionReport {
    /// Counters at the end of the run.
    pub stats: StatsSnapshot,
    /// Per-file failures, in input order.
    pub errors: Vec<ScanError>,
}

/// Converts files to stubs next to them.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8PathBuf;
/// use parking_lot::Mutex;
/// use pyi_core::Config;
/// use pyi_scanner::Converter;
///
/// let converter = Converter::new(Config::default());
/// let diagnostics = Mutex::new(std::io::stderr());
/// let report = converter.convert_inputs(&[Utf8PathBuf::from("src")], &diagnostics)?;
///
/// for error in &report.errors {
///     eprintln!("WARNING: {error}");
/// }
/// # Ok::<(), pyi_scanner::ScanError>(())
/// ```
#[derive(Debug)]
pub struct Converter {
    config: Config,
    stats: ScanStats,
}

impl Converter {
    /// Creates a converter.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: ScanStats::new(),
        }
    }

    /// Returns the configuration in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Expands files and directories, then converts every file found.
    ///
    /// Inputs that do not exist are reported in the returned errors like any
    /// other per-file failure.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`ScanError`] if a directory cannot be walked or the
    /// worker pool cannot be built.
    pub fn convert_inputs<W: Write + Send>(
        &self,
        inputs: &[Utf8PathBuf],
        diagnostics: &Mutex<W>,
    ) -> Result<ConversionReport, ScanError> {
        let mut missing = Vec::new();
        let mut paths = Vec::new();
        for input in collect_inputs(inputs, &self.config.scan)? {
            match input {
                Ok(path) => paths.push(path),
                Err(err) => {
                    self.stats.increment_total();
                    self.stats.increment_failed();
                    warn!(error = %err, "Skipping input");
                    missing.push(err);
                }
            }
        }
        info!(count = paths.len(), "Collected Python files");

        let mut report = self.convert_files(&paths, diagnostics)?;
        missing.append(&mut report.errors);
        report.errors = missing;
        Ok(report)
    }

    /// Converts `paths` in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if a worker pool with
    /// `scan.max_parallel_jobs` threads cannot be built, or the first error
    /// that is not [recoverable](ScanError::is_recoverable). Per-file
    /// failures are collected in the report instead.
    pub fn convert_files<W: Write + Send>(
        &self,
        paths: &[Utf8PathBuf],
        diagnostics: &Mutex<W>,
    ) -> Result<ConversionReport, ScanError> {
        let run = || {
            paths
                .par_iter()
                .map_init(PyParser::new, |parser, path| {
                    self.stats.increment_total();
                    match parser {
                        Ok(parser) => self.convert_file(parser, path, diagnostics),
                        Err(err) => Err(ScanError::parse(path, err.clone())),
                    }
                })
                .collect::<Vec<_>>()
        };

        let results = match self.config.scan.max_parallel_jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|err| ScanError::config(err.to_string()))?
                .install(run),
            None => run(),
        };

        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(target) => {
                    self.stats.increment_converted();
                    debug!(path = %target, "Wrote stub");
                }
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => {
                    if matches!(err, ScanError::TargetExists { .. }) {
                        self.stats.increment_skipped();
                    } else {
                        self.stats.increment_failed();
                    }
                    warn!(
                        path = err.path().map_or("", |path| path.as_str()),
                        error = %err,
                        "Skipping file"
                    );
                    errors.push(err);
                }
            }
        }

        let stats = self.stats.snapshot();
        info!(
            total = stats.total,
            converted = stats.converted,
            skipped = stats.skipped,
            failed = stats.failed,
            diagnostics = stats.diagnostics,
            "Conversion completed"
        );

        Ok(ConversionReport { stats, errors })
    }

    /// Converts one file and returns the path of the stub written.
    fn convert_file<W: Write>(
        &self,
        parser: &mut PyParser,
        path: &Utf8Path,
        diagnostics: &Mutex<W>,
    ) -> Result<Utf8PathBuf, ScanError> {
        let target = stub_path(path);
        let overwrite = self.config.scan.overwrite;
        if !overwrite && target.exists() {
            return Err(ScanError::TargetExists { path: target });
        }

        let source = fs::read_to_string(path).map_err(|err| ScanError::read(path, err))?;

        let mut batch: Vec<Diagnostic> = Vec::new();
        let stub = crate::convert_with_parser(parser, &source, path.as_str(), &self.config, &mut batch)
            .map_err(|err: ParseError| ScanError::parse(path, err))?;
        self.flush_diagnostics(&batch, diagnostics);

        write_stub(&target, &stub, overwrite)?;
        Ok(target)
    }

    fn flush_diagnostics<W: Write>(&self, batch: &[Diagnostic], diagnostics: &Mutex<W>) {
        if batch.is_empty() {
            return;
        }
        self.stats.add_diagnostics(batch.len());
        let mut out = diagnostics.lock();
        for diagnostic in batch {
            let _ = writeln!(out, "{diagnostic}");
        }
        let _ = out.flush();
    }
}

/// Writes `stub` to `target`, refusing to replace an existing file unless
/// `overwrite` is set.
fn write_stub(target: &Utf8Path, stub: &str, overwrite: bool) -> Result<(), ScanError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(target).map_err(|err| {
        if err.kind() == io::ErrorKind::AlreadyExists {
            ScanError::TargetExists {
                path: target.to_owned(),
            }
        } else {
            ScanError::write(target, err)
        }
    })?;
    file.write_all(stub.as_bytes())
        .map_err(|err| ScanError::write(target, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_path_replaces_py() {
        assert_eq!(stub_path(Utf8Path::new("foo.py")), "foo.pyi");
        assert_eq!(stub_path(Utf8Path::new("a/b.c.py")), "a/b.c.pyi");
    }

    #[test]
    fn test_stub_path_appends_otherwise() {
        assert_eq!(stub_path(Utf8Path::new("script")), "script.pyi");
        assert_eq!(stub_path(Utf8Path::new("mod.txt")), "mod.txt.pyi");
        assert_eq!(stub_path(Utf8Path::new("mod.pyw")), "mod.pyw.pyi");
    }
}
