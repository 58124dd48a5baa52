use turtlelang::{
    proc::{fn_one, fn_slice, fn_two, fn_zero},
    Dispatch, Env, EvalError, Proc, Procs, Program,
};

use crate::{raster::PixelSink, turtle::Turtle};

/// The procedures every runtime starts with.
pub fn builtins<S: PixelSink + 'static>() -> Procs<Turtle<S>> {
    let mut procs = Procs::default();

    procs.def_proc(fn_slice("put", 2, 3, |t: &mut Turtle<S>, args: &[i64]| {
        t.put(args[0] as f64, args[1] as f64, args.get(2).map(|&a| a as f64))
    }));
    procs.def_proc(fn_slice("move", 1, 2, |t: &mut Turtle<S>, args: &[i64]| {
        t.walk(args[0] as f64, args.get(1).map(|&a| a as f64))
    }));
    procs.def_proc(fn_one("move_forward", |t: &mut Turtle<S>, steps| {
        t.walk(steps as f64, None)
    }));
    procs.def_proc(fn_one("move_backward", |t: &mut Turtle<S>, steps| {
        t.walk(-(steps as f64), None)
    }));
    procs.def_proc(fn_one("turn_cw", |t: &mut Turtle<S>, degrees| {
        t.turn_cw(degrees as f64)
    }));
    procs.def_proc(fn_one("turn_ccw", |t: &mut Turtle<S>, degrees| {
        t.turn_ccw(degrees as f64)
    }));
    procs.def_proc(fn_zero("pen_down", |t: &mut Turtle<S>| t.pen_down()));
    procs.def_proc(fn_zero("pen_up", |t: &mut Turtle<S>| t.pen_up()));
    procs.def_proc(fn_two("set_pixel", |t: &mut Turtle<S>, x, y| {
        t.set_pixel(x, y)
    }));

    procs
}

/// A turtle together with the table of names a program may call on it.
///
/// Programs can only reach the names in the table: the built-ins, plus whatever the host adds
/// with [`Runtime::def_proc`].
pub struct Runtime<S: PixelSink + 'static> {
    turtle: Turtle<S>,
    procs: Procs<Turtle<S>>,
}

impl<S: PixelSink + 'static> Runtime<S> {
    pub fn new(sink: S) -> Self {
        Runtime {
            turtle: Turtle::new(sink),
            procs: builtins(),
        }
    }

    pub fn def_proc(&mut self, proc: impl Proc<Turtle<S>> + 'static) {
        self.procs.def_proc(proc);
    }

    pub fn procs(&self) -> &Procs<Turtle<S>> {
        &self.procs
    }

    pub fn turtle(&self) -> &Turtle<S> {
        &self.turtle
    }

    pub fn into_sink(self) -> S {
        self.turtle.into_sink()
    }

    /// Reset the turtle and run `program` from the start with fresh variables.
    pub fn run(&mut self, program: &Program) -> Result<Env, EvalError> {
        self.turtle.reset();
        program.exec(self)
    }
}

impl<S: PixelSink + 'static> Dispatch for Runtime<S> {
    fn dispatch(&mut self, name: &str, args: &[i64]) -> Result<(), EvalError> {
        self.procs.call(&mut self.turtle, name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use turtlelang::program;

    fn run(src: &str) -> Result<Vec<(i64, i64)>, EvalError> {
        let mut rt = Runtime::new(Vec::new());
        rt.run(&program(src).unwrap())?;
        Ok(rt.into_sink())
    }

    #[test]
    fn vertical_segment() {
        assert_eq!(
            run("put(0,0)\npen_down()\nmove(3,0)").unwrap(),
            vec![(0, -3), (0, -2), (0, -1), (0, 0)]
        );
    }

    #[test]
    fn backward_is_negative_forward() {
        let mut rt = Runtime::new(Vec::new());
        rt.run(&program("put(10, 10)\nmove_backward(4)").unwrap())
            .unwrap();
        assert_eq!(rt.turtle().position(), Point::new(10.0, 14.0));
        rt.run(&program("put(10, 10)\nmove_forward(4)").unwrap())
            .unwrap();
        assert_eq!(rt.turtle().position(), Point::new(10.0, 6.0));
    }

    #[test]
    fn run_resets_turtle() {
        let mut rt = Runtime::new(Vec::new());
        rt.run(&program("pen_down\nput(5, 5)").unwrap()).unwrap();
        assert!(rt.turtle().is_pen_down());
        rt.run(&program("move(1)").unwrap()).unwrap();
        assert_eq!(rt.turtle().position(), Point::new(0.0, -1.0));
        assert!(rt.into_sink().is_empty());
    }

    #[test]
    fn arity_errors() {
        assert_eq!(
            run("put(1)"),
            Err(EvalError::WrongArgs {
                proc: "put".to_owned(),
                min: 2,
                max: 3,
                found: 1
            })
        );
        assert!(matches!(run("pen_up(1)"), Err(EvalError::WrongArgs { .. })));
        assert!(matches!(run("move(1, 2, 3)"), Err(EvalError::WrongArgs { .. })));
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(
            run("pen_down\nfly(3)"),
            Err(EvalError::UnknownProc {
                name: "fly".to_owned()
            })
        );
        // Turtle methods that aren't in the table can't be reached.
        assert!(matches!(run("reset"), Err(EvalError::UnknownProc { .. })));
    }

    #[test]
    fn host_procs() {
        let mut rt = Runtime::new(Vec::new());
        rt.def_proc(fn_two("dot", |t: &mut Turtle<Vec<(i64, i64)>>, x, y| {
            t.set_pixel(x * 2, y * 2)
        }));
        assert!(rt.procs().contains("dot"));
        rt.run(&program("for i = 1 to 3 do dot(i, 0) end").unwrap())
            .unwrap();
        assert_eq!(rt.into_sink(), vec![(2, 0), (4, 0), (6, 0)]);
    }
}
