use std::collections::BTreeSet;

/// Receives drawn points, one at a time, in the order they are drawn.
pub trait PixelSink {
    fn set_pixel(&mut self, x: i64, y: i64);
}

impl PixelSink for Vec<(i64, i64)> {
    fn set_pixel(&mut self, x: i64, y: i64) {
        self.push((x, y));
    }
}

/// Adapts a closure into a [`PixelSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(i64, i64)> PixelSink for FnSink<F> {
    fn set_pixel(&mut self, x: i64, y: i64) {
        (self.0)(x, y)
    }
}

/// The largest coordinate, in either direction, that [`line`] accepts.
///
/// Differences between coordinates in `-MAX_COORD..=MAX_COORD` always fit in an `i64`.
pub const MAX_COORD: i64 = i64::MAX / 2;

/// Draw a line between two points (both included) with Bresenham's algorithm.
///
/// Pixels are emitted in increasing order along the major axis, whichever endpoint that starts
/// from. Both endpoints must be within [`MAX_COORD`] of the origin on each axis.
pub fn line(from: (i64, i64), to: (i64, i64), sink: &mut impl PixelSink) {
    let (mut x1, mut y1) = from;
    let (mut x2, mut y2) = to;

    let steep = (y2 - y1).abs() > (x2 - x1).abs();
    if steep {
        std::mem::swap(&mut x1, &mut y1);
        std::mem::swap(&mut x2, &mut y2);
    }
    if x1 > x2 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
    }

    let dx = x2 - x1;
    let dy = (y2 - y1).abs();
    let ystep = if y1 < y2 { 1 } else { -1 };
    let mut error = dx / 2;
    let mut y = y1;

    for x in x1..=x2 {
        let (px, py) = if steep { (y, x) } else { (x, y) };
        log::trace!("pixel {px} {py}");
        sink.set_pixel(px, py);
        error -= dy;
        if error < 0 {
            y += ystep;
            error += dx;
        }
    }
}

/// A set of pixels that can be printed as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Canvas {
    // (y, x), so that iteration goes row by row.
    pixels: BTreeSet<(i64, i64)>,
}

impl PixelSink for Canvas {
    fn set_pixel(&mut self, x: i64, y: i64) {
        self.pixels.insert((y, x));
    }
}

impl Canvas {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.pixels.contains(&(y, x))
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The smallest and largest `(x, y)` coordinates drawn.
    pub fn bounds(&self) -> Option<((i64, i64), (i64, i64))> {
        let &(min_y, _) = self.pixels.first()?;
        let &(max_y, _) = self.pixels.last()?;
        let min_x = self.pixels.iter().map(|p| p.1).min()?;
        let max_x = self.pixels.iter().map(|p| p.1).max()?;
        Some(((min_x, min_y), (max_x, max_y)))
    }
}

impl std::fmt::Display for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(((min_x, min_y), (max_x, max_y))) = self.bounds() else {
            return Ok(());
        };
        for y in min_y..=max_y {
            let row: String = (min_x..=max_x)
                .map(|x| if self.contains(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
