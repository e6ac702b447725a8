//! Rendering seam.
//!
//! The pipeline hands plot data to a [`Renderer`] and only cares that an
//! artifact file appears at the requested path. [`PngRenderer`] is the
//! default backend.

mod bitmap;
mod canvas;

use std::path::Path;

use serde::Serialize;

use crate::aggregate::TrendPoint;
use crate::error::Result;
use crate::stats::Histogram;

pub use self::bitmap::PngRenderer;
pub use self::canvas::{Canvas, Rgb};

/// One labelled line on a trend plot, ascending by element count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub points: Vec<TrendPoint>,
}

/// Turns plot data into an image file.
pub trait Renderer {
    /// Bar chart of one histogram.
    fn histogram(&mut self, path: &Path, title: &str, histogram: &Histogram) -> Result<()>;

    /// Mean latency (± std) against log2 element count, one line per series.
    fn trend(&mut self, path: &Path, title: &str, series: &[TrendSeries]) -> Result<()>;
}
