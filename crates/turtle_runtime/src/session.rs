use turtlelang::{Env, EvalError, ParseError, Parser};

use crate::{raster::PixelSink, runtime::Runtime};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Connects a host that supplies code to a [`Runtime`] that draws it.
///
/// [`Session::run_code`] runs a whole program from scratch, which is what a host does when the
/// user asks to re-run their code. [`Session::feed`] instead appends to the code seen so far and
/// runs only the new statements, keeping the turtle and variables from before.
pub struct Session<S: PixelSink + 'static> {
    parser: Parser,
    runtime: Runtime<S>,
    env: Env,
}

impl<S: PixelSink + 'static> Session<S> {
    pub fn new(sink: S) -> Self {
        Session::with_runtime(Runtime::new(sink))
    }

    pub fn with_runtime(runtime: Runtime<S>) -> Self {
        Session {
            parser: Parser::default(),
            runtime,
            env: Env::default(),
        }
    }

    pub fn runtime(&self) -> &Runtime<S> {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime<S> {
        &mut self.runtime
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn into_sink(self) -> S {
        self.runtime.into_sink()
    }

    /// Parse `code` from the beginning and run it on a freshly reset turtle.
    ///
    /// Nothing runs if the code doesn't parse.
    pub fn run_code(&mut self, code: &str) -> Result<(), RunError> {
        self.parser.reset(code);
        let program = self.parser.finish()?;
        log::debug!("running {} statements", program.len());
        self.env = self.runtime.run(&program)?;
        Ok(())
    }

    /// Append `code` and run the statements it completes.
    ///
    /// A statement is only complete once its newline arrives, so a loop can be fed a line at a
    /// time and runs when the line with its `END` comes in.
    pub fn feed(&mut self, code: &str) -> Result<(), RunError> {
        self.parser.update(code);
        let program = self.parser.parse()?;
        log::debug!("running {} new statements", program.len());
        self.env.exec(&program, &mut self.runtime)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{raster::Canvas, turtle::Turtle};
    use turtlelang::{proc::fn_one, SyntaxErrorKind};

    #[test]
    fn run_code_starts_over() {
        let mut session = Session::new(Vec::new());
        session.run_code("a = 4\nput(1, 1, 90)\npen_down\nmove(a)").unwrap();
        assert_eq!(session.env().lookup_var("a"), Some(4));
        assert_eq!(session.runtime().turtle().sink().len(), 5);

        session.run_code("move(2)").unwrap();
        assert_eq!(session.env().lookup_var("a"), None);
        // The pen is up again, so nothing more was drawn.
        assert_eq!(session.into_sink().len(), 5);
    }

    #[test]
    fn parse_errors_run_nothing() {
        let mut session = Session::new(Vec::new());
        let err = session
            .run_code("pen_down\nmove(1)\nfor i = 0 to 2 do move(1)")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error at line 3: unbalanced DO/END"
        );
        assert!(matches!(
            err,
            RunError::Parse(ParseError::Syntax {
                kind: SyntaxErrorKind::UnbalancedBlock,
                ..
            })
        ));
        assert!(session.into_sink().is_empty());
    }

    #[test]
    fn eval_errors_keep_earlier_drawing() {
        let mut session = Session::new(Canvas::default());
        let err = session.run_code("pen_down\nmove(2)\nmove(x)\nmove(2)").unwrap_err();
        assert_eq!(err.to_string(), "x has no value");
        assert_eq!(session.into_sink().len(), 3);
    }

    #[test]
    fn feeding_continues_where_it_left_off() {
        let mut session = Session::new(Vec::new());
        session.feed("n = 2\nput(0, 0, 90)\npen_down\n").unwrap();
        session.feed("move(n)\n").unwrap();
        assert_eq!(session.runtime().turtle().sink(), &vec![(0, 0), (1, 0), (2, 0)]);

        session.feed("for i = 1 to n do\n  set_pixel(i, 9)\nend\n").unwrap();
        assert_eq!(session.env().lookup_var("i"), Some(2));
        assert_eq!(
            &session.runtime().turtle().sink()[3..],
            &[(1, 9), (2, 9)]
        );
    }

    #[test]
    fn loops_fed_in_pieces() {
        let mut session = Session::new(Vec::new());
        session.feed("for i = 1 to 2 do\n").unwrap();
        session.feed("  set_pix").unwrap();
        session.feed("el(i, 0)\n").unwrap();
        assert!(session.runtime().turtle().sink().is_empty());

        session.feed("end\nset_pixel(9, 9)").unwrap();
        assert_eq!(session.runtime().turtle().sink(), &vec![(1, 0), (2, 0)]);
        session.feed("\n").unwrap();
        assert_eq!(session.into_sink(), vec![(1, 0), (2, 0), (9, 9)]);
    }

    #[test]
    fn run_code_needs_no_final_newline() {
        let mut session = Session::new(Vec::new());
        session.feed("for i = 1 to 2 do\n").unwrap();
        // Starting over drops the half-fed loop.
        session.run_code("set_pixel(1, 1)").unwrap();
        session.feed("\nset_pixel(2, 2)\n").unwrap();
        assert_eq!(session.into_sink(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn host_procs_on_a_session() {
        let mut session = Session::new(Vec::new());
        session
            .runtime_mut()
            .def_proc(fn_one("dot", |t: &mut Turtle<Vec<(i64, i64)>>, x| {
                t.set_pixel(x, x)
            }));
        session.run_code("dot(3)").unwrap();
        assert_eq!(session.into_sink(), vec![(3, 3)]);
    }

    #[test]
    fn huge_lines_are_errors() {
        let mut session = Session::new(Vec::new());
        let err = session
            .run_code("put(-9223372036854775807, 0, 90)\npen_down\nmove(9223372036854775807)")
            .unwrap_err();
        assert_eq!(err, RunError::Eval(EvalError::OutOfRange));
    }
}
