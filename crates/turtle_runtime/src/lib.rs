//! Turtle graphics for programs written in [`turtlelang`].
//!
//! A [`Runtime`] owns a [`Turtle`] and exposes its operations to programs as named procedures.
//! Whatever the turtle draws goes to a [`PixelSink`], one pixel at a time.

pub mod raster;
pub mod runtime;
pub mod session;
pub mod turtle;

pub use raster::{line, Canvas, FnSink, PixelSink};
pub use runtime::{builtins, Runtime};
pub use session::{RunError, Session};
pub use turtle::Turtle;

use turtlelang::{EvalError, Program};

/// Run `program` on a fresh turtle and hand back the sink it drew into.
pub fn draw<S: PixelSink + 'static>(program: &Program, sink: S) -> Result<S, EvalError> {
    let mut runtime = Runtime::new(sink);
    runtime.run(program)?;
    Ok(runtime.into_sink())
}
