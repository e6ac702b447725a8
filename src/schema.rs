use serde::Serialize;

use crate::configuration::NameLayout;
use crate::store::{DuplicateConfiguration, LatencyResult, SkippedFile};

/// File name of the machine-readable summary.
pub const SUMMARY_FILE: &str = "summary.json";

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    pub input_dir: String,
    pub report_dir: String,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultEntry<'a> {
    pub artifact: String,
    #[serde(flatten)]
    pub result: &'a LatencyResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary<'a> {
    pub run: RunMeta,
    pub layout: NameLayout,
    pub metadata: Option<&'a str>,
    pub trend_artifacts: Vec<String>,
    pub results: Vec<ResultEntry<'a>>,
    pub skipped: &'a [SkippedFile],
    pub duplicates: &'a [DuplicateConfiguration],
}

impl RunMeta {
    pub fn new(input_dir: &std::path::Path, report_dir: &std::path::Path) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            input_dir: input_dir.display().to_string(),
            report_dir: report_dir.display().to_string(),
            timestamp_utc: now_utc(),
            git_sha: git_sha_short(),
        }
    }
}

fn now_utc() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Set by CI or build scripts; absent in local runs.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}
