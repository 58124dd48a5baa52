//! A small language for driving a drawing turtle.
//!
//! ```text
//! put(100, 100, 90)
//! pen_down
//! for i = 1 to 4 do
//!     move(50 + i * 10, 90)
//! end
//! ```
//!
//! [`program`] turns source text into a [`Program`], and [`Program::exec`] runs it, sending every
//! call to a [`Dispatch`] target. The target decides what names exist; this crate knows nothing
//! about turtles.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parse;
pub mod proc;
pub mod token;

pub use ast::{Expr, ExprKind, Ident, Program, Stmt};
pub use error::{EvalError, LexError, ParseError, SyntaxErrorKind};
pub use interp::{Dispatch, Env};
pub use lexer::Lexer;
pub use parse::{program, Parser};
pub use proc::{Proc, Procs};
pub use token::{Op, Span, Token, TokenKind};
