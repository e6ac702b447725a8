//! End-to-end analysis run.
//!
//! ```text
//! scan directory -> parse + compute per file -> store -> aggregate
//!     -> render artifacts -> report.md + summary.json
//! ```
//!
//! [`AnalysisContext`] carries everything a run has loaded between stages.
//! It lives for one run and is never shared.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::aggregate::Aggregator;
use crate::artifact::ArtifactPlan;
use crate::error::{AnalysisError, Result};
use crate::render::Renderer;
use crate::report::{Report, ReportBuilder};
use crate::schema::{LatencySummary, ResultEntry, RunMeta, SUMMARY_FILE};
use crate::store::{DuplicatePolicy, ResultStore, ScanOptions, ScanReport};

/// Name of the output directory created next to the input directory.
pub const REPORT_DIR: &str = "report";

/// Settings for one run.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub input_dir: PathBuf,
    /// Defaults to `report` next to the input directory.
    pub report_dir: Option<PathBuf>,
    pub strict: bool,
    pub duplicates: DuplicatePolicy,
    pub parallel: bool,
}

impl AnalysisConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            report_dir: None,
            strict: false,
            duplicates: DuplicatePolicy::default(),
            parallel: true,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            strict: self.strict,
            duplicates: self.duplicates,
            parallel: self.parallel,
        }
    }
}

/// `<parent of input>/report`. Relative inputs are resolved first so that
/// `.` or `results/` still get a sibling directory.
pub fn default_report_dir(input_dir: &Path) -> PathBuf {
    let resolved = fs::canonicalize(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    match resolved.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(REPORT_DIR),
        _ => PathBuf::from(REPORT_DIR),
    }
}

/// State loaded by one run, passed explicitly between stages.
#[derive(Debug)]
pub struct AnalysisContext {
    pub config: AnalysisConfig,
    pub report_dir: PathBuf,
    pub store: ResultStore,
    pub scan: ScanReport,
}

impl AnalysisContext {
    /// Scan the input directory and compute every result.
    pub fn load(config: AnalysisConfig) -> Result<Self> {
        let (store, scan) = ResultStore::scan(&config.input_dir, &config.scan_options())?;
        let report_dir = config
            .report_dir
            .clone()
            .unwrap_or_else(|| default_report_dir(&config.input_dir));
        info!(
            input = %config.input_dir.display(),
            results = store.len(),
            skipped = scan.skipped.len(),
            duplicates = scan.duplicates.len(),
            "scan complete"
        );
        Ok(Self {
            config,
            report_dir,
            store,
            scan,
        })
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.store)
    }

    /// Metadata text, empty when the run had no `_metadata.txt`.
    pub fn metadata(&self) -> &str {
        self.scan.metadata.as_deref().unwrap_or_default()
    }

    pub fn plan(&self) -> ArtifactPlan<'_> {
        ArtifactPlan::build(&self.aggregator())
    }

    /// Render every planned artifact into the report directory.
    pub fn render(&self, plan: &ArtifactPlan<'_>, renderer: &mut dyn Renderer) -> Result<()> {
        fs::create_dir_all(&self.report_dir).map_err(|e| AnalysisError::io(&self.report_dir, e))?;
        for trend in &plan.trends {
            let path = self.report_dir.join(&trend.name);
            debug!(artifact = %trend.name, "writing trend plot");
            renderer.trend(&path, &trend.title, &trend.series)?;
        }
        for hist in &plan.histograms {
            let path = self.report_dir.join(&hist.name);
            debug!(artifact = %hist.name, "writing histogram");
            renderer.histogram(&path, &hist.result.source_file, hist.result.histogram())?;
        }
        Ok(())
    }

    pub fn build_report(&self, plan: &ArtifactPlan<'_>) -> Report {
        ReportBuilder::new()
            .metadata(self.metadata())
            .artifacts(plan.names())
            .build()
    }

    pub fn summary<'a>(&'a self, plan: &ArtifactPlan<'a>) -> LatencySummary<'a> {
        LatencySummary {
            run: RunMeta::new(&self.config.input_dir, &self.report_dir),
            layout: plan.layout,
            metadata: self.scan.metadata.as_deref(),
            trend_artifacts: plan.trends.iter().map(|t| t.name.clone()).collect(),
            results: plan
                .histograms
                .iter()
                .map(|h| ResultEntry {
                    artifact: h.name.clone(),
                    result: h.result,
                })
                .collect(),
            skipped: &self.scan.skipped,
            duplicates: &self.scan.duplicates,
        }
    }
}

/// What a completed run produced.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub report_dir: PathBuf,
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
    /// Serialized `summary.json` contents.
    pub summary_json: String,
    /// Artifact names in report order.
    pub artifacts: Vec<String>,
    pub results: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Run the whole pipeline.
pub fn run(config: AnalysisConfig, renderer: &mut dyn Renderer) -> Result<RunOutcome> {
    let ctx = AnalysisContext::load(config)?;
    let plan = ctx.plan();

    ctx.render(&plan, renderer)?;

    let report = ctx.build_report(&plan);
    let report_path = report.write_to(&ctx.report_dir)?;

    let summary_json = serde_json::to_string_pretty(&ctx.summary(&plan))?;
    let summary_path = ctx.report_dir.join(SUMMARY_FILE);
    fs::write(&summary_path, &summary_json).map_err(|e| AnalysisError::io(&summary_path, e))?;

    info!(
        report = %report_path.display(),
        artifacts = report.artifacts().len(),
        "report written"
    );

    Ok(RunOutcome {
        report_dir: ctx.report_dir.clone(),
        report_path,
        summary_path,
        summary_json,
        artifacts: report.artifacts().to_vec(),
        results: ctx.store.len(),
        skipped: ctx.scan.skipped.len(),
        duplicates: ctx.scan.duplicates.len(),
    })
}
