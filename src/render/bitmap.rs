//! PNG backend for [`Renderer`].
//!
//! Plots carry no text; titles only show up in logs. Histogram bars span
//! their bin edges. Trend lines put log2(element count) on x and mean µs on
//! y, with dashed mean ± std bands.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use super::canvas::{Canvas, Rgb, Scale, PALETTE};
use super::{Renderer, TrendSeries};
use crate::error::{AnalysisError, Result};
use crate::stats::Histogram;

const MARGIN_LEFT: i64 = 70;
const MARGIN_RIGHT: i64 = 30;
const MARGIN_TOP: i64 = 30;
const MARGIN_BOTTOM: i64 = 60;

/// Renders artifacts as 8-bit RGB PNG files.
#[derive(Clone, Debug)]
pub struct PngRenderer {
    width: u32,
    height: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        // 6x4 inches at 150 dpi
        Self::with_size(900, 600)
    }
}

impl PngRenderer {
    pub fn with_size(width: u32, height: u32) -> Self {
        let min_w = (MARGIN_LEFT + MARGIN_RIGHT + 10) as u32;
        let min_h = (MARGIN_TOP + MARGIN_BOTTOM + 10) as u32;
        Self {
            width: width.max(min_w),
            height: height.max(min_h),
        }
    }

    fn blank(&self) -> (Canvas, PlotArea) {
        let mut canvas = Canvas::new(self.width, self.height, Rgb::WHITE);
        let area = PlotArea {
            left: MARGIN_LEFT,
            right: self.width as i64 - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: self.height as i64 - MARGIN_BOTTOM,
        };
        canvas.line((area.left, area.bottom), (area.right, area.bottom), Rgb::BLACK);
        canvas.line((area.left, area.top), (area.left, area.bottom), Rgb::BLACK);
        (canvas, area)
    }
}

#[derive(Clone, Copy, Debug)]
struct PlotArea {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
}

impl Renderer for PngRenderer {
    fn histogram(&mut self, path: &Path, title: &str, histogram: &Histogram) -> Result<()> {
        let (mut canvas, area) = self.blank();
        let peak = histogram.counts().iter().copied().max().unwrap_or(0) as f64;
        let y = Scale::new(0.0, peak, area.bottom, area.top);

        if histogram.is_degenerate() {
            // One marker bar at the value instead of fifty bars around it.
            let x = (area.left + area.right) / 2;
            let top = y.map(peak);
            canvas.fill_rect(x - 1, top, x + 1, area.bottom - 1, Rgb::BLUE);
            canvas.cross(x, top, 5, Rgb::BLACK);
        } else {
            let x = Scale::new(histogram.lo(), histogram.hi(), area.left + 1, area.right);
            let width = histogram.bin_width();
            for (i, &count) in histogram.counts().iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let left = x.map(histogram.lo() + width * i as f64);
                let right = x.map(histogram.lo() + width * (i + 1) as f64) - 1;
                let top = y.map(count as f64);
                canvas.fill_rect(left, top, right.max(left), area.bottom - 1, Rgb::BLUE);
            }
        }

        debug!(path = %path.display(), title, bins = histogram.bins(), "rendering histogram");
        write_png(path, &canvas)
    }

    fn trend(&mut self, path: &Path, title: &str, series: &[TrendSeries]) -> Result<()> {
        let (mut canvas, area) = self.blank();
        let points = series.iter().flat_map(|s| s.points.iter());

        let (mut x_lo, mut x_hi) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_lo, mut y_hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            x_lo = x_lo.min(p.log2_elements);
            x_hi = x_hi.max(p.log2_elements);
            y_lo = y_lo.min(p.mean - p.std);
            y_hi = y_hi.max(p.mean + p.std);
        }
        let x = Scale::padded(x_lo, x_hi, 0.05, area.left, area.right);
        let y = Scale::padded(y_lo, y_hi, 0.05, area.bottom, area.top);

        for (i, s) in series.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let at = |px: f64, py: f64| (x.map(px), y.map(py));
            for pair in s.points.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                canvas.line(at(a.log2_elements, a.mean), at(b.log2_elements, b.mean), color);
                canvas.dashed_line(
                    at(a.log2_elements, a.mean + a.std),
                    at(b.log2_elements, b.mean + b.std),
                    4,
                    color,
                );
                canvas.dashed_line(
                    at(a.log2_elements, a.mean - a.std),
                    at(b.log2_elements, b.mean - b.std),
                    4,
                    color,
                );
            }
            for p in &s.points {
                let (px, py) = at(p.log2_elements, p.mean);
                canvas.cross(px, py, 4, color);
            }
        }

        debug!(path = %path.display(), title, series = series.len(), "rendering trend");
        write_png(path, &canvas)
    }
}

fn write_png(path: &Path, canvas: &Canvas) -> Result<()> {
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), canvas.width(), canvas.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let render_err = |source| AnalysisError::Render {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = encoder.write_header().map_err(render_err)?;
    writer.write_image_data(canvas.as_rgb()).map_err(render_err)?;
    writer.finish().map_err(render_err)
}
