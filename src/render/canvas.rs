//! Minimal RGB raster: rectangles, lines, markers.
//!
//! Coordinates are signed so callers can draw partially off-canvas shapes;
//! anything outside the canvas is clipped.

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GREY: Rgb = Rgb(200, 200, 200);
    pub const BLUE: Rgb = Rgb(31, 119, 180);
}

/// Line colors for successive trend series.
pub const PALETTE: [Rgb; 6] = [
    Rgb::BLUE,
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
];

#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 3);
        for _ in 0..len {
            pixels.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB bytes.
    pub fn as_rgb(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        let idx = self.index(x, y)?;
        Some(Rgb(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
    }

    pub fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.0;
            self.pixels[idx + 1] = color.1;
            self.pixels[idx + 2] = color.2;
        }
    }

    /// Fill the rectangle spanned by two corners, inclusive.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        let (xa, xb) = (x0.min(x1).max(0), x0.max(x1).min(self.width as i64 - 1));
        let (ya, yb) = (y0.min(y1).max(0), y0.max(y1).min(self.height as i64 - 1));
        for y in ya..=yb {
            for x in xa..=xb {
                self.set(x, y, color);
            }
        }
    }

    /// Bresenham line, both endpoints included.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), color: Rgb) {
        self.walk_line(from, to, |_| true, color);
    }

    /// Line drawn as `dash` pixels on, `dash` pixels off.
    pub fn dashed_line(&mut self, from: (i64, i64), to: (i64, i64), dash: u32, color: Rgb) {
        let dash = u64::from(dash.max(1));
        self.walk_line(from, to, |step| (step / dash) % 2 == 0, color);
    }

    /// `x`-shaped marker centered on `(x, y)`.
    pub fn cross(&mut self, x: i64, y: i64, radius: i64, color: Rgb) {
        self.line((x - radius, y - radius), (x + radius, y + radius), color);
        self.line((x - radius, y + radius), (x + radius, y - radius), color);
    }

    fn walk_line(
        &mut self,
        (mut x, mut y): (i64, i64),
        (x1, y1): (i64, i64),
        draw: impl Fn(u64) -> bool,
        color: Rgb,
    ) {
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut step = 0u64;
        loop {
            if draw(step) {
                self.set(x, y, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1;
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }
}

/// Linear mapping from a data range onto a pixel range.
///
/// A zero, negative or non-finite data span maps every value to the middle
/// of the pixel range.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scale {
    lo: f64,
    hi: f64,
    px_lo: i64,
    px_hi: i64,
}

impl Scale {
    pub(crate) fn new(lo: f64, hi: f64, px_lo: i64, px_hi: i64) -> Self {
        Self {
            lo,
            hi,
            px_lo,
            px_hi,
        }
    }

    /// Data range padded by `fraction` of its span on both sides.
    pub(crate) fn padded(lo: f64, hi: f64, fraction: f64, px_lo: i64, px_hi: i64) -> Self {
        let pad = (hi - lo) * fraction;
        Self::new(lo - pad, hi + pad, px_lo, px_hi)
    }

    pub(crate) fn map(&self, value: f64) -> i64 {
        let span = self.hi - self.lo;
        if span <= 0.0 || !span.is_finite() || !value.is_finite() {
            return (self.px_lo + self.px_hi) / 2;
        }
        let t = (value - self.lo) / span;
        self.px_lo + (t * (self.px_hi - self.px_lo) as f64).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_filled_with_background() {
        let canvas = Canvas::new(4, 3, Rgb::GREY);
        assert_eq!(canvas.as_rgb().len(), 4 * 3 * 3);
        assert_eq!(canvas.pixel(3, 2), Some(Rgb::GREY));
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.pixel(-1, 0), None);
    }

    #[test]
    fn line_includes_endpoints() {
        let mut canvas = Canvas::new(10, 10, Rgb::WHITE);
        canvas.line((1, 1), (8, 5), Rgb::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(8, 5), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(0, 9), Some(Rgb::WHITE));
    }

    #[test]
    fn dashed_line_leaves_gaps() {
        let mut canvas = Canvas::new(20, 1, Rgb::WHITE);
        canvas.dashed_line((0, 0), (19, 0), 2, Rgb::BLACK);
        let drawn: Vec<bool> = (0..20)
            .map(|x| canvas.pixel(x, 0) == Some(Rgb::BLACK))
            .collect();
        assert!(drawn[0] && drawn[1] && !drawn[2] && !drawn[3] && drawn[4]);
    }

    #[test]
    fn shapes_are_clipped() {
        let mut canvas = Canvas::new(5, 5, Rgb::WHITE);
        canvas.fill_rect(-10, -10, 2, 100, Rgb::BLUE);
        canvas.line((-5, 4), (50, 4), Rgb::BLACK);
        canvas.cross(0, 0, 3, Rgb::BLACK);
        assert_eq!(canvas.pixel(2, 0), Some(Rgb::BLUE));
        assert_eq!(canvas.pixel(3, 0), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(4, 4), Some(Rgb::BLACK));
    }

    #[test]
    fn scale_maps_linearly() {
        let scale = Scale::new(0.0, 10.0, 100, 200);
        assert_eq!(scale.map(0.0), 100);
        assert_eq!(scale.map(5.0), 150);
        assert_eq!(scale.map(10.0), 200);
        // inverted pixel axis (y grows downward)
        let scale = Scale::new(0.0, 10.0, 500, 100);
        assert_eq!(scale.map(10.0), 100);
    }

    #[test]
    fn zero_span_scale_maps_to_middle() {
        let scale = Scale::new(3.0, 3.0, 0, 100);
        assert_eq!(scale.map(3.0), 50);
        let scale = Scale::padded(3.0, 3.0, 0.05, 0, 100);
        assert_eq!(scale.map(42.0), 50);
        assert_eq!(Scale::new(0.0, 1.0, 0, 100).map(f64::NAN), 50);
    }
}
