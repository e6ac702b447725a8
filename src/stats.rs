//! Statistics computer: mean, population standard deviation, quantiles and a
//! fixed-bin histogram over one sample array.
//!
//! Raw samples are nanoseconds. [`LatencyStats::from_nanoseconds`] converts
//! them to microseconds exactly once and everything it reports is in µs.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Number of histogram bins.
pub const HISTOGRAM_BINS: usize = 50;

const NANOS_PER_MICRO: f64 = 1_000.0;

/// Fixed-bin histogram over `[lo, hi]`.
///
/// `centers` and `counts` always have the same length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Histogram {
    centers: Vec<f64>,
    counts: Vec<u64>,
    lo: f64,
    hi: f64,
    degenerate: bool,
}

impl Histogram {
    /// Build a histogram with `bins` equal-width bins spanning `[min, max]` of `samples`.
    ///
    /// Bins are half-open except the last, which includes `max`. When every
    /// sample has the same value `v` the range becomes `[v - 0.5, v + 0.5]`
    /// and the histogram is flagged degenerate.
    pub fn from_samples(samples: &[f64], bins: usize) -> Result<Self> {
        if samples.is_empty() {
            return Err(AnalysisError::EmptySample);
        }
        let bins = bins.max(1);
        let (min, max) = min_max(samples);

        let degenerate = max - min <= 0.0;
        let (lo, hi) = if degenerate {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (hi - lo) / bins as f64;

        let centers = (0..bins)
            .map(|i| {
                let left = lo + width * i as f64;
                let right = if i + 1 == bins {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                };
                0.5 * (left + right)
            })
            .collect();

        let mut counts = vec![0u64; bins];
        for &x in samples {
            let idx = ((x - lo) / width).floor();
            let idx = if idx < 0.0 { 0 } else { (idx as usize).min(bins - 1) };
            counts[idx] += 1;
        }

        Ok(Self {
            centers,
            counts,
            lo,
            hi,
            degenerate,
        })
    }

    /// Bin-center values, ascending.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Sample count per bin.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.bins() as f64
    }

    /// All samples had the same value.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Summary of one sample array, in microseconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatencyStats {
    pub sample_count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub histogram: Histogram,
}

impl LatencyStats {
    /// Convert nanosecond samples to microseconds and summarize them.
    pub fn from_nanoseconds(samples_ns: &[f64]) -> Result<Self> {
        if samples_ns.is_empty() {
            return Err(AnalysisError::EmptySample);
        }
        let micros = to_microseconds(samples_ns);
        summarize(&micros)
    }
}

/// Divide every sample by 1000.
pub fn to_microseconds(samples_ns: &[f64]) -> Vec<f64> {
    samples_ns.iter().map(|ns| ns / NANOS_PER_MICRO).collect()
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (denominator = sample count).
pub fn population_std(samples: &[f64], mean: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let variance =
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}

/// Nearest-rank quantile over an ascending slice: the `ceil(q * n)`-th
/// smallest value, with `q <= 0` giving the minimum.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (q * n as f64).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

fn summarize(micros: &[f64]) -> Result<LatencyStats> {
    let mean = mean(micros).ok_or(AnalysisError::EmptySample)?;
    let std = population_std(micros, mean);

    let mut sorted = micros.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Ok(LatencyStats {
        sample_count: micros.len(),
        mean,
        std,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        p50: quantile(&sorted, 0.50),
        p95: quantile(&sorted, 0.95),
        p99: quantile(&sorted, 0.99),
        histogram: Histogram::from_samples(micros, HISTOGRAM_BINS)?,
    })
}

fn min_max(samples: &[f64]) -> (f64, f64) {
    samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}
