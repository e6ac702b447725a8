//! Latency benchmark analysis.
//!
//! Reads a directory of per-configuration latency sample files, computes
//! statistics and histograms, groups results into trend lines and writes a
//! Markdown report referencing the rendered plots.

pub mod aggregate;
pub mod artifact;
pub mod configuration;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod samples;
pub mod schema;
pub mod stats;
pub mod store;

pub use aggregate::{Aggregator, TrendPoint};
pub use configuration::{Configuration, NameLayout};
pub use error::{AnalysisError, Result};
pub use pipeline::{run, AnalysisConfig, AnalysisContext, RunOutcome};
pub use render::{PngRenderer, Renderer, TrendSeries};
pub use report::{Report, ReportBuilder};
pub use stats::{Histogram, LatencyStats, HISTOGRAM_BINS};
pub use store::{DuplicatePolicy, LatencyResult, ResultStore, ScanOptions};
