//! Report builder: a Markdown document with a header, the run metadata and
//! one image reference per artifact.
//!
//! Artifact order is whatever the caller supplies. Nothing is reordered or
//! deduplicated here.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// File name of the report document.
pub const REPORT_FILE: &str = "report.md";

const HEADER: &str = "# Report";

/// A finished report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    artifacts: Vec<String>,
    metadata: String,
}

impl Report {
    pub fn artifacts(&self) -> &[String] {
        &self.artifacts
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// Render the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut doc = String::from(HEADER);
        doc.push_str("\n\n");
        if !self.metadata.is_empty() {
            doc.push_str(&self.metadata);
            if !self.metadata.ends_with('\n') {
                doc.push('\n');
            }
            doc.push('\n');
        }
        // `<...>` keeps targets with spaces or parentheses intact
        for artifact in &self.artifacts {
            doc.push_str(&format!("![{artifact}](<{artifact}>)\n\n"));
        }
        doc
    }

    /// Write `report.md` into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(REPORT_FILE);
        fs::write(&path, self.to_markdown()).map_err(|e| AnalysisError::io(&path, e))?;
        Ok(path)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    artifacts: Vec<String>,
    metadata: Option<String>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one artifact reference.
    pub fn artifact(mut self, name: impl Into<String>) -> Self {
        self.artifacts.push(name.into());
        self
    }

    /// Append artifact references in iteration order.
    pub fn artifacts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artifacts.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the metadata text. Replaces any earlier value.
    pub fn metadata(mut self, text: impl Into<String>) -> Self {
        self.metadata = Some(text.into());
        self
    }

    pub fn build(self) -> Report {
        Report {
            artifacts: self.artifacts,
            metadata: self.metadata.unwrap_or_default(),
        }
    }
}
