use kurbo::{Point, Vec2};
use turtlelang::EvalError;

use crate::raster::{line, PixelSink, MAX_COORD};

/// The heading after `put`, and at the start of every run: straight up the screen.
pub const DEFAULT_HEADING: Vec2 = Vec2::new(0.0, -1.0);

/// Rotate a heading by `degrees`, counter-clockwise in the usual maths orientation.
fn rotate(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Drop the fractional part of each coordinate, or `None` if the point is too far out to draw.
fn to_pixel(p: Point) -> Option<(i64, i64)> {
    let limit = MAX_COORD as f64;
    if p.x.abs() < limit && p.y.abs() < limit {
        Some((p.x as i64, p.y as i64))
    } else {
        None
    }
}

/// Turtle state, plus the sink that receives whatever it draws.
#[derive(Clone, Debug)]
pub struct Turtle<S> {
    pos: Point,
    heading: Vec2,
    pen_down: bool,
    sink: S,
}

impl<S: PixelSink> Turtle<S> {
    pub fn new(sink: S) -> Self {
        Turtle {
            pos: Point::ORIGIN,
            heading: DEFAULT_HEADING,
            pen_down: false,
            sink,
        }
    }

    /// Back to the origin, facing up, with the pen raised. The sink is untouched.
    pub fn reset(&mut self) {
        self.pos = Point::ORIGIN;
        self.heading = DEFAULT_HEADING;
        self.pen_down = false;
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn put(&mut self, x: f64, y: f64, angle: Option<f64>) {
        self.pos = Point::new(x, y);
        self.heading = DEFAULT_HEADING;
        if let Some(angle) = angle {
            self.heading = rotate(self.heading, angle);
        }
        log::debug!("put at {:?} heading {:?}", self.pos, self.heading);
    }

    /// Walk `steps` lengths of the heading, after first turning by `angle` if given.
    ///
    /// The line is drawn between truncated endpoints, but the turtle keeps its exact position
    /// so fractional parts add up over several moves. With the pen down, a line with an end
    /// beyond [`MAX_COORD`] fails and the turtle stays where it was.
    pub fn walk(&mut self, steps: f64, angle: Option<f64>) -> Result<(), EvalError> {
        if let Some(angle) = angle {
            self.heading = rotate(self.heading, angle);
        }
        let end = self.pos + self.heading * steps;
        if self.pen_down {
            log::debug!("draw {:?} -> {:?}", self.pos, end);
            let (Some(from), Some(to)) = (to_pixel(self.pos), to_pixel(end)) else {
                return Err(EvalError::OutOfRange);
            };
            line(from, to, &mut self.sink);
        } else {
            log::debug!("move {:?} -> {:?}", self.pos, end);
        }
        self.pos = end;
        Ok(())
    }

    pub fn turn_cw(&mut self, degrees: f64) {
        self.heading = rotate(self.heading, -degrees);
    }

    pub fn turn_ccw(&mut self, degrees: f64) {
        self.heading = rotate(self.heading, degrees);
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    /// Plot one pixel, whatever the pen state.
    pub fn set_pixel(&mut self, x: i64, y: i64) {
        self.sink.set_pixel(x, y);
    }
}
