//! Turns tokens into a [`Program`].
//!
//! Parsing happens in two passes. [`split_statements`] cuts the token stream at every newline
//! that isn't inside a `DO ... END` block, and [`parse_statement`] then classifies each group by
//! the kinds of its first few tokens. Loop bodies go through both passes again, so loops nest to
//! any depth.
//!
//! Arithmetic has no operator precedence: `+`, `-` and `*` combine strictly left to right, so
//! `2+4*b` means `(2+4)*b`. Parentheses are not part of the language at all.

use crate::{
    ast::{Expr, ExprKind, Ident, Program, Stmt},
    error::{ParseError, SyntaxErrorKind},
    lexer::Lexer,
    token::{Op, Span, Token, TokenKind},
};

fn span_of(tokens: &[Token]) -> Span {
    Span::covering(tokens).unwrap_or(Span {
        start: 0,
        end: 0,
        line: 1,
    })
}

fn ident(token: &Token) -> Ident {
    Ident {
        name: token.lexeme.clone(),
        span: token.span,
    }
}

/// Split tokens into statement groups at newlines outside of `DO ... END` blocks.
///
/// Empty groups (blank lines) are dropped. Newlines inside a block stay in the group.
pub fn split_statements(tokens: &[Token]) -> Result<Vec<&[Token]>, ParseError> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Do => depth += 1,
            TokenKind::End => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ParseError::syntax(SyntaxErrorKind::UnbalancedBlock, token.span)
                })?;
            }
            TokenKind::Newline if depth == 0 => {
                if i > start {
                    groups.push(&tokens[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::syntax(
            SyntaxErrorKind::UnbalancedBlock,
            span_of(&tokens[start..]),
        ));
    }
    if start < tokens.len() {
        groups.push(&tokens[start..]);
    }
    Ok(groups)
}

/// Split and parse a whole token stream.
pub fn parse_statements(tokens: &[Token]) -> Result<Program, ParseError> {
    split_statements(tokens)?
        .into_iter()
        .map(parse_statement)
        .collect()
}

/// Parse one statement group.
pub fn parse_statement(tokens: &[Token]) -> Result<Stmt, ParseError> {
    use TokenKind::*;

    let n = tokens.len();
    match tokens {
        [first, second, rest @ ..] if first.is(Identifier) && second.is(Equal) && !rest.is_empty() => {
            Ok(Stmt::Assign {
                name: ident(first),
                expr: parse_expr(rest)?,
            })
        }
        [first, ..] if first.is(Identifier) && n != 2 => parse_call(tokens),
        [first, ..] if matches!(first.kind, Integer | Operator(_)) => {
            Ok(Stmt::Expr(parse_expr(tokens)?))
        }
        [first, .., last] if first.is(For) && last.is(End) => parse_loop(tokens),
        _ => Err(ParseError::syntax(
            SyntaxErrorKind::UnknownStatement {
                kinds: tokens.iter().map(|t| t.kind).collect(),
            },
            span_of(tokens),
        )),
    }
}

/// `name` or `name(arg, arg, ...)`.
fn parse_call(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let args = match tokens {
        [_] => Vec::new(),
        [_, open, inner @ .., close] if open.is(TokenKind::Open) && close.is(TokenKind::Close) => {
            parse_args(inner, open.span.union(close.span))?
        }
        _ => {
            return Err(ParseError::syntax(
                SyntaxErrorKind::MalformedCall,
                span_of(tokens),
            ))
        }
    };
    Ok(Stmt::Call {
        name: ident(&tokens[0]),
        args,
    })
}

fn parse_args(inner: &[Token], parens: Span) -> Result<Vec<Expr>, ParseError> {
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(|t| t.is(TokenKind::Separator))
        .map(|arg| {
            if arg.is_empty() {
                Err(ParseError::syntax(SyntaxErrorKind::SeparatorMissing, parens))
            } else {
                parse_expr(arg)
            }
        })
        .collect()
}

/// `FOR var = start TO end DO body END`.
fn parse_loop(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let invalid = || ParseError::syntax(SyntaxErrorKind::InvalidLoop, span_of(tokens));

    let to = tokens
        .iter()
        .position(|t| t.is(TokenKind::To))
        .ok_or_else(invalid)?;
    let do_ = tokens
        .iter()
        .position(|t| t.is(TokenKind::Do))
        .ok_or_else(invalid)?;
    if to > do_ || !tokens[1].is(TokenKind::Identifier) || !tokens[2].is(TokenKind::Equal) {
        return Err(invalid());
    }

    let start = parse_expr_near(&tokens[3..to], tokens[to].span)?;
    let end = parse_expr_near(&tokens[to + 1..do_], tokens[do_].span)?;
    let body = parse_statements(&tokens[do_ + 1..tokens.len() - 1])?;

    Ok(Stmt::For {
        var: ident(&tokens[1]),
        start,
        end,
        body,
    })
}

/// Parse an arithmetic expression.
///
/// Only integers, identifiers and operators are allowed. Operators are applied left to right
/// with equal precedence; an operand may carry any number of leading `+`/`-` signs.
pub fn parse_expr(tokens: &[Token]) -> Result<Expr, ParseError> {
    parse_expr_near(tokens, span_of(tokens))
}

// `near` locates the error when `tokens` is empty.
fn parse_expr_near(tokens: &[Token], near: Span) -> Result<Expr, ParseError> {
    if tokens
        .iter()
        .any(|t| !matches!(t.kind, TokenKind::Integer | TokenKind::Identifier | TokenKind::Operator(_)))
    {
        return Err(ParseError::syntax(
            SyntaxErrorKind::NotArithmetic,
            span_of(tokens),
        ));
    }

    let (mut lhs, mut rest) = operand(tokens, near)?;
    while let [op_token, tail @ ..] = rest {
        let TokenKind::Operator(op) = op_token.kind else {
            return Err(ParseError::syntax(
                SyntaxErrorKind::MalformedExpression,
                op_token.span,
            ));
        };
        let (rhs, tail) = operand(tail, op_token.span)?;
        let span = lhs.span.union(rhs.span);
        lhs = Expr {
            e: ExprKind::BinOp(Box::new(lhs), op, Box::new(rhs)),
            span,
        };
        rest = tail;
    }
    Ok(lhs)
}

fn operand(tokens: &[Token], near: Span) -> Result<(Expr, &[Token]), ParseError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(ParseError::syntax(
            SyntaxErrorKind::MalformedExpression,
            near,
        ));
    };
    match first.kind {
        TokenKind::Integer => {
            let value = first.lexeme.parse::<i64>().map_err(|_| {
                ParseError::syntax(
                    SyntaxErrorKind::IntegerOutOfRange(first.lexeme.clone()),
                    first.span,
                )
            })?;
            let e = ExprKind::Int(value);
            Ok((Expr { e, span: first.span }, rest))
        }
        TokenKind::Identifier => {
            let e = ExprKind::Var(first.lexeme.clone());
            Ok((Expr { e, span: first.span }, rest))
        }
        TokenKind::Operator(sign @ (Op::Add | Op::Sub)) => {
            let (inner, rest) = operand(rest, first.span)?;
            let span = first.span.union(inner.span);
            let e = match sign {
                Op::Sub => ExprKind::Neg(Box::new(inner)),
                _ => inner.e,
            };
            Ok((Expr { e, span }, rest))
        }
        _ => Err(ParseError::syntax(
            SyntaxErrorKind::MalformedExpression,
            first.span,
        )),
    }
}

/// Index just past the last newline that ends a top-level statement.
///
/// The tokens before it form whole statements. The ones after it may still be waiting for their
/// newline or for the `END` of a loop.
fn complete_prefix(tokens: &[Token]) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    let mut end = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Do => depth += 1,
            TokenKind::End => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ParseError::syntax(SyntaxErrorKind::UnbalancedBlock, token.span)
                })?;
            }
            TokenKind::Newline if depth == 0 => end = i + 1,
            _ => {}
        }
    }
    Ok(end)
}

/// A parser over a growing source buffer.
///
/// [`Parser::parse`] returns the statements finished by the text added since the previous call.
/// A statement is finished by the newline after it, and a loop by the newline after its `END`;
/// anything later is held back until more text arrives. [`Parser::finish`] takes the end of the
/// buffer as the end of the program.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    lexer: Lexer,
    // Tokens of statements that aren't finished yet.
    pending: Vec<Token>,
}

impl Parser {
    pub fn new(input: impl Into<String>) -> Parser {
        Parser {
            lexer: Lexer::new(input),
            pending: Vec::new(),
        }
    }

    pub fn update(&mut self, more: &str) {
        self.lexer.update(more);
    }

    /// Replace the buffer, dropping anything that was held back.
    pub fn reset(&mut self, input: impl Into<String>) {
        self.lexer.reset(input);
        self.pending.clear();
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        for token in self.lexer.analyze_lines() {
            self.pending.push(token?);
        }
        let end = match complete_prefix(&self.pending) {
            Ok(end) => end,
            Err(e) => {
                self.pending.clear();
                return Err(e);
            }
        };
        let tokens: Vec<Token> = self.pending.drain(..end).collect();
        log::trace!(
            "parsing {} tokens, holding back {}",
            tokens.len(),
            self.pending.len()
        );
        parse_statements(&tokens)
    }

    pub fn finish(&mut self) -> Result<Program, ParseError> {
        for token in self.lexer.analyze() {
            self.pending.push(token?);
        }
        let tokens = std::mem::take(&mut self.pending);
        log::trace!("parsing {} tokens", tokens.len());
        parse_statements(&tokens)
    }
}

/// Parse a complete program.
pub fn program(input: &str) -> Result<Program, ParseError> {
    Parser::new(input).finish()
}
