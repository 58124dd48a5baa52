/// A range of source bytes, plus the line it starts on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
}

impl Span {
    pub fn union(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
        }
    }

    /// The span covering every token in `tokens`.
    ///
    /// Returns `None` for an empty slice.
    pub fn covering(tokens: &[Token]) -> Option<Span> {
        let first = tokens.first()?.span;
        Some(tokens.iter().fold(first, |acc, t| acc.union(t.span)))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
        }
    }

    /// Apply the operator, returning `None` on overflow.
    pub fn apply(&self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
        }
    }
}

impl TryFrom<char> for Op {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            '+' => Op::Add,
            '-' => Op::Sub,
            '*' => Op::Mul,
            _ => return Err(()),
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Identifier,
    Integer,
    Operator(Op),
    Equal,
    Open,
    Close,
    Separator,
    Newline,
    For,
    To,
    Do,
    End,
}

impl TokenKind {
    /// Keywords are identifiers whose uppercased text is one of these.
    pub fn keyword(upper: &str) -> Option<TokenKind> {
        match upper {
            "FOR" => Some(TokenKind::For),
            "TO" => Some(TokenKind::To),
            "DO" => Some(TokenKind::Do),
            "END" => Some(TokenKind::End),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Operator(_) => "OPERATOR",
            TokenKind::Equal => "EQUAL",
            TokenKind::Open => "OPEN",
            TokenKind::Close => "CLOSE",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Newline => "NEWLINE",
            TokenKind::For => "FOR",
            TokenKind::To => "TO",
            TokenKind::Do => "DO",
            TokenKind::End => "END",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
