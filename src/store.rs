//! Result store: one [`LatencyResult`] per [`Configuration`], built by
//! scanning an input directory.
//!
//! Files are discovered in file-name order and that order decides which
//! result survives when two files resolve to the same configuration. The
//! per-file parse and compute stage may run on the rayon pool; results are
//! collected in discovery order and inserted sequentially.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::configuration::{Configuration, NameLayout, METADATA_FILE};
use crate::error::{AnalysisError, Result};
use crate::samples::load_samples;
use crate::stats::{Histogram, LatencyStats};

/// What to do when two files resolve to the same configuration.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the later file's result and log a warning.
    #[default]
    Overwrite,
    /// Abort the run.
    Reject,
}

/// Options for [`ResultStore::scan`].
#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Treat file-scoped errors as fatal instead of skipping the file.
    pub strict: bool,
    pub duplicates: DuplicatePolicy,
    /// Run the per-file stage on the rayon pool.
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            strict: false,
            duplicates: DuplicatePolicy::Overwrite,
            parallel: true,
        }
    }
}

/// Statistics for one configuration, plus where they came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatencyResult {
    pub configuration: Configuration,
    pub layout: NameLayout,
    pub source_file: String,
    #[serde(flatten)]
    pub stats: LatencyStats,
}

impl LatencyResult {
    /// Parse the file name, load the samples and compute statistics.
    pub fn analyze(path: &Path) -> Result<Self> {
        analyze_file(path).map_err(|e| e.in_file(path))
    }

    pub fn datatype(&self) -> &str {
        self.configuration.datatype()
    }

    pub fn numelements(&self) -> u64 {
        self.configuration.numelements()
    }

    pub fn parallel(&self) -> u32 {
        self.configuration.parallel()
    }

    /// Mean latency in µs.
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    /// Population standard deviation in µs.
    pub fn std(&self) -> f64 {
        self.stats.std
    }

    pub fn histogram(&self) -> &Histogram {
        &self.stats.histogram
    }
}

fn analyze_file(path: &Path) -> Result<LatencyResult> {
    let name = file_name(path)?;
    let (configuration, layout) = Configuration::from_file_name(&name)?;
    let samples = load_samples(path)?;
    let stats = LatencyStats::from_nanoseconds(&samples)?;
    Ok(LatencyResult {
        configuration,
        layout,
        source_file: name,
        stats,
    })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AnalysisError::FilenameFormat {
            name: path.display().to_string(),
            reason: "file name is not valid UTF-8".to_string(),
        })
}

/// A file that was left out of the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// A collision resolved by last-write-wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateConfiguration {
    pub configuration: Configuration,
    /// File whose result was kept (processed later).
    pub kept: String,
    /// File whose result was overwritten.
    pub replaced: String,
}

/// Side information collected while scanning.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    /// Contents of `_metadata.txt`, if present.
    pub metadata: Option<String>,
    /// Sample files discovered, in processing order.
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub duplicates: Vec<DuplicateConfiguration>,
}

/// Flat mapping from configuration to result. Performs no aggregation.
#[derive(Clone, Debug, Default)]
pub struct ResultStore {
    results: HashMap<Configuration, LatencyResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, configuration: &Configuration) -> Option<&LatencyResult> {
        self.results.get(configuration)
    }

    /// Results in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &LatencyResult> {
        self.results.values()
    }

    /// Insert a result, returning the one it replaced.
    pub fn insert(&mut self, result: LatencyResult) -> Option<LatencyResult> {
        self.results.insert(result.configuration.clone(), result)
    }

    /// Scan `dir` for sample files and the metadata blob.
    pub fn scan(dir: &Path, options: &ScanOptions) -> Result<(Self, ScanReport)> {
        if !dir.is_dir() {
            return Err(AnalysisError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut report = ScanReport::default();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                AnalysisError::io(path, e.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                debug!(path = %path.display(), "not a regular file; ignoring");
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if entry.file_name() == METADATA_FILE {
                // opaque blob: undecodable bytes are replaced, never rejected
                let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
                report.metadata = Some(String::from_utf8_lossy(&bytes).into_owned());
                continue;
            }
            report.files.push(path.to_path_buf());
        }

        let analyzed: Vec<Result<LatencyResult>> = if options.parallel {
            report
                .files
                .par_iter()
                .map(|p| LatencyResult::analyze(p))
                .collect()
        } else {
            report.files.iter().map(|p| LatencyResult::analyze(p)).collect()
        };

        let mut store = ResultStore::new();
        for (path, outcome) in report.files.iter().zip(analyzed) {
            let result = match outcome {
                Ok(result) => result,
                Err(err) if err.is_file_scoped() && !options.strict => {
                    warn!(file = %path.display(), error = %err, "skipping sample file");
                    report.skipped.push(SkippedFile {
                        file: path.display().to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            info!(
                file = %result.source_file,
                configuration = %result.configuration,
                mean_us = result.mean(),
                "analyzed sample file"
            );
            if result.histogram().is_degenerate() {
                warn!(
                    file = %result.source_file,
                    value_us = result.mean(),
                    "all samples identical; histogram collapses to a single value"
                );
            }

            if let Some(previous) = store.get(&result.configuration) {
                let duplicate = DuplicateConfiguration {
                    configuration: result.configuration.clone(),
                    kept: result.source_file.clone(),
                    replaced: previous.source_file.clone(),
                };
                if options.duplicates == DuplicatePolicy::Reject {
                    return Err(AnalysisError::DuplicateConfiguration {
                        configuration: duplicate.configuration.to_string(),
                        first: duplicate.replaced,
                        second: duplicate.kept,
                    });
                }
                warn!(
                    configuration = %duplicate.configuration,
                    kept = %duplicate.kept,
                    replaced = %duplicate.replaced,
                    "duplicate configuration; keeping the later file"
                );
                report.duplicates.push(duplicate);
            }
            store.insert(result);
        }

        Ok((store, report))
    }
}
