//! Sample file loader.
//!
//! A sample file is whitespace-separated numbers (nanoseconds). Text after
//! `#` on a line is ignored, as are blank lines.

use std::fs;
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Read and parse a sample file.
///
/// Read failures are [`AnalysisError::Io`]. Contents that are not UTF-8
/// are [`AnalysisError::InvalidEncoding`], which only concerns this file.
pub fn load_samples(path: &Path) -> Result<Vec<f64>> {
    let bytes = fs::read(path).map_err(|e| AnalysisError::io(path, e))?;
    let text =
        std::str::from_utf8(&bytes).map_err(|source| AnalysisError::InvalidEncoding { source })?;
    parse_samples(text)
}

/// Parse sample text. Every token must be a finite number.
pub fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let data = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        for token in data.split_whitespace() {
            let value = token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AnalysisError::InvalidSample {
                    token: token.to_string(),
                    line: lineno + 1,
                })?;
            samples.push(value);
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_whitespace() {
        let samples = parse_samples("1000 2000\n3000\t4000\r\n\n  5e3  ").unwrap();
        assert_eq!(samples, vec![1000.0, 2000.0, 3000.0, 4000.0, 5000.0]);
    }

    #[test]
    fn skips_comments() {
        let samples = parse_samples("# run 1\n1200 # warm\n1300\n").unwrap();
        assert_eq!(samples, vec![1200.0, 1300.0]);
    }

    #[test]
    fn empty_text_yields_no_samples() {
        assert!(parse_samples("").unwrap().is_empty());
        assert!(parse_samples("# only a comment\n\n").unwrap().is_empty());
    }

    #[test]
    fn reports_bad_token_and_line() {
        let err = parse_samples("100\n200 x7\n").unwrap_err();
        match err {
            AnalysisError::InvalidSample { token, line } => {
                assert_eq!(token, "x7");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse_samples("nan").is_err());
        assert!(parse_samples("inf").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_samples(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }

    #[test]
    fn binary_file_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u8_el8_par1.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x31]).unwrap();
        let err = load_samples(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidEncoding { .. }));
        assert!(err.is_file_scoped());
    }
}
