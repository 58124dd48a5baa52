//! Splits source text into [`Token`]s.
//!
//! Each rule below is tried in order at the current position and the first one that matches
//! wins. Whitespace is matched but never yielded. Identifiers whose uppercased text is a
//! keyword come out as that keyword's kind instead of [`TokenKind::Identifier`].
//!
//! The lexer owns an append-only buffer and a cursor, so a host that feeds code a piece at a
//! time only pays for lexing the new text. The cursor moves past a token only once the whole
//! token has matched; when lexing fails it stays at the offending character.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, anychar, digit1, space1},
    combinator::{consumed, map, map_opt, recognize},
    multi::many0_count,
    sequence::pair,
    IResult,
};

use crate::{
    error::LexError,
    token::{Op, Span, Token, TokenKind},
};

type LocatedSpan<'a> = nom_locate::LocatedSpan<&'a str>;

// `None` marks whitespace, which is matched but dropped.
type Lexeme<'a> = (Option<TokenKind>, LocatedSpan<'a>);

fn rule<'a, F, O>(
    kind: TokenKind,
    inner: F,
) -> impl FnMut(LocatedSpan<'a>) -> IResult<LocatedSpan<'a>, Lexeme<'a>>
where
    F: FnMut(LocatedSpan<'a>) -> IResult<LocatedSpan<'a>, O>,
{
    map(recognize(inner), move |s| (Some(kind), s))
}

fn identifier(input: LocatedSpan) -> IResult<LocatedSpan, Lexeme> {
    let word = recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ));
    map(word, |word: LocatedSpan| {
        let upper = word.fragment().to_ascii_uppercase();
        let kind = TokenKind::keyword(&upper).unwrap_or(TokenKind::Identifier);
        (Some(kind), word)
    })(input)
}

fn operator(input: LocatedSpan) -> IResult<LocatedSpan, Lexeme> {
    map(
        consumed(map_opt(anychar, |ch| Op::try_from(ch).ok())),
        |(s, op)| (Some(TokenKind::Operator(op)), s),
    )(input)
}

fn whitespace(input: LocatedSpan) -> IResult<LocatedSpan, Lexeme> {
    map(space1, |s| (None, s))(input)
}

fn lexeme(input: LocatedSpan) -> IResult<LocatedSpan, Lexeme> {
    alt((
        identifier,
        rule(TokenKind::Separator, tag(",")),
        rule(TokenKind::Open, tag("(")),
        rule(TokenKind::Close, tag(")")),
        rule(TokenKind::Integer, digit1),
        rule(TokenKind::Equal, tag("=")),
        operator,
        whitespace,
        rule(TokenKind::Newline, alt((tag("\r\n"), tag("\n")))),
    ))(input)
}

#[derive(Clone, Debug, Default)]
pub struct Lexer {
    input: String,
    position: usize,
    // Newlines before `position`.
    newlines: u32,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Lexer {
        Lexer {
            input: input.into(),
            position: 0,
            newlines: 0,
        }
    }

    /// Append more source. Already-lexed text is not revisited.
    pub fn update(&mut self, more: &str) {
        self.input.push_str(more);
    }

    /// Replace the whole buffer and rewind to the start.
    pub fn reset(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.position = 0;
        self.newlines = 0;
    }

    /// Byte offset of the first character that hasn't been lexed yet.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Lex from the cursor to the end of the buffer.
    pub fn analyze(&mut self) -> Tokens<'_> {
        let end = self.input.len();
        Tokens {
            lexer: self,
            end,
            failed: false,
        }
    }

    /// Lex from the cursor up to and including the last newline in the buffer.
    ///
    /// No token spans a newline, so the text after it can be left for later: it may be the
    /// first half of a token that the next [`Lexer::update`] completes.
    pub fn analyze_lines(&mut self) -> Tokens<'_> {
        let end = self.input.rfind('\n').map_or(0, |i| i + 1);
        Tokens {
            lexer: self,
            end,
            failed: false,
        }
    }

    /// Lex a complete string in one go.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new(input).analyze().collect()
    }
}

/// The tokens between a [`Lexer`]'s cursor and some later point in its buffer.
///
/// After yielding an error the iterator is exhausted.
pub struct Tokens<'a> {
    lexer: &'a mut Lexer,
    end: usize,
    failed: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let lexer = &mut *self.lexer;
            if lexer.position >= self.end {
                return None;
            }
            // Locations in `rest` are relative to the cursor.
            let rest = LocatedSpan::new(&lexer.input[lexer.position..self.end]);
            match lexeme(rest) {
                Ok((_, (kind, matched))) => {
                    let text = *matched.fragment();
                    let span = Span {
                        start: lexer.position + matched.location_offset(),
                        end: lexer.position + matched.location_offset() + text.len(),
                        line: lexer.newlines + matched.location_line(),
                    };
                    lexer.position += text.len();
                    lexer.newlines += text.matches('\n').count() as u32;
                    if let Some(kind) = kind {
                        let token = Token {
                            kind,
                            lexeme: text.to_string(),
                            span,
                        };
                        log::trace!("lexed {} {:?}", token.kind, token.lexeme);
                        return Some(Ok(token));
                    }
                }
                Err(_) => {
                    self.failed = true;
                    return Some(Err(LexError {
                        offset: lexer.position,
                        line: lexer.newlines + 1,
                        found: rest.fragment().chars().next().unwrap_or('\0'),
                    }));
                }
            }
        }
    }
}
