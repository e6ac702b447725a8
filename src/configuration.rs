//! Benchmark configuration identity and the file-name parser.
//!
//! Two file-name layouts are recognized:
//!
//! ```text
//! legacy:  <datatype>_<N>.txt             (parallel = 1)
//! current: <datatype>_el<N>_par<M>.txt
//! ```

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// File name of the run metadata blob. Never parsed as a configuration.
pub const METADATA_FILE: &str = "_metadata.txt";

/// Which file-name layout a configuration was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameLayout {
    /// `<datatype>_<N>`
    Legacy,
    /// `<datatype>_el<N>_par<M>`
    Current,
}

/// Identity of one benchmark condition.
///
/// Fields are validated on construction and cannot be changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Configuration {
    datatype: String,
    numelements: u64,
    parallel: u32,
}

impl Configuration {
    pub fn new(datatype: impl Into<String>, numelements: u64, parallel: u32) -> Result<Self> {
        let datatype = datatype.into();
        if datatype.is_empty() {
            return Err(AnalysisError::InvalidConfiguration {
                reason: "datatype must not be empty".to_string(),
            });
        }
        if numelements == 0 {
            return Err(AnalysisError::InvalidConfiguration {
                reason: format!("element count must be positive (datatype {datatype})"),
            });
        }
        if parallel == 0 {
            return Err(AnalysisError::InvalidConfiguration {
                reason: format!("parallelism must be at least 1 (datatype {datatype})"),
            });
        }
        Ok(Self {
            datatype,
            numelements,
            parallel,
        })
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn numelements(&self) -> u64 {
        self.numelements
    }

    pub fn parallel(&self) -> u32 {
        self.parallel
    }

    /// Parse a file name (extension optional) into a configuration and its layout.
    pub fn from_file_name(name: &str) -> Result<(Self, NameLayout)> {
        if name == METADATA_FILE {
            return Err(format_error(name, "metadata file is not a configuration"));
        }
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        parse_stem(stem).map_err(|reason| format_error(name, &reason))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/el{}/par{}",
            self.datatype, self.numelements, self.parallel
        )
    }
}

fn format_error(name: &str, reason: &str) -> AnalysisError {
    AnalysisError::FilenameFormat {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_stem(stem: &str) -> std::result::Result<(Configuration, NameLayout), String> {
    let fields: Vec<&str> = stem.split('_').collect();
    let (datatype, numelements, parallel, layout) = match fields.as_slice() {
        [datatype, n] => (*datatype, parse_count(n, "")?, 1, NameLayout::Legacy),
        [datatype, el, par] => {
            let n = parse_count(el, "el")?;
            let p = parse_count(par, "par")?;
            let p = u32::try_from(p).map_err(|_| format!("parallelism `{par}` is out of range"))?;
            (*datatype, n, p, NameLayout::Current)
        }
        _ => {
            return Err(format!(
                "expected 2 or 3 underscore-separated fields, found {}",
                fields.len()
            ))
        }
    };
    let config = Configuration::new(datatype, numelements, parallel).map_err(|e| e.to_string())?;
    Ok((config, layout))
}

fn parse_count(field: &str, prefix: &str) -> std::result::Result<u64, String> {
    let digits = field
        .strip_prefix(prefix)
        .ok_or_else(|| format!("field `{field}` is missing the `{prefix}` prefix"))?;
    digits
        .parse::<u64>()
        .map_err(|_| format!("`{digits}` in field `{field}` is not a valid integer"))
}
