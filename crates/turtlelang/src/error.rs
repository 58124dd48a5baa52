use crate::token::{Span, TokenKind};

/// No lexer rule matched at `offset`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid input {found:?} at line {line} (offset {offset})")]
pub struct LexError {
    pub offset: usize,
    pub line: u32,
    pub found: char,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("unbalanced DO/END")]
    UnbalancedBlock,
    #[error("unknown statement {} {}", .kinds.len(), kind_list(.kinds))]
    UnknownStatement { kinds: Vec<TokenKind> },
    #[error("invalid loop format")]
    InvalidLoop,
    #[error("separator missing")]
    SeparatorMissing,
    #[error("must be an arithmetic operation or an integer")]
    NotArithmetic,
    #[error("call arguments must be wrapped in parentheses")]
    MalformedCall,
    #[error("malformed arithmetic expression")]
    MalformedExpression,
    #[error("integer literal {0} is out of range")]
    IntegerOutOfRange(String),
}

fn kind_list(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("syntax error at line {}: {kind}", .span.line)]
    Syntax { kind: SyntaxErrorKind, span: Span },
}

impl ParseError {
    pub fn syntax(kind: SyntaxErrorKind, span: Span) -> ParseError {
        ParseError::Syntax { kind, span }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("{name} has no value")]
    UnknownVar { name: String, span: Span },
    #[error("I don't know how to {name}")]
    UnknownProc { name: String },
    #[error("wrong number of inputs to {proc} (expected {}, found {found})", arity(.min, .max))]
    WrongArgs {
        proc: String,
        min: usize,
        max: usize,
        found: usize,
    },
    #[error("integer overflow evaluating {op}")]
    Overflow { op: &'static str, span: Span },
    /// A line would end too far away to be drawn.
    #[error("line goes out of range")]
    OutOfRange,
}

fn arity(min: &usize, max: &usize) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{min} to {max}")
    }
}
