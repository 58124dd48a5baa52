use crate::token::{Op, Span};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Var(String),
    Neg(Box<Expr>),
    BinOp(Box<Expr>, Op, Box<Expr>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expr {
    pub e: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stmt {
    Assign {
        name: Ident,
        expr: Expr,
    },
    Call {
        name: Ident,
        args: Vec<Expr>,
    },
    /// A line that is only arithmetic. It is evaluated and the value dropped.
    Expr(Expr),
    For {
        var: Ident,
        start: Expr,
        end: Expr,
        body: Program,
    },
}

/// Statements in execution order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

impl FromIterator<Stmt> for Program {
    fn from_iter<I: IntoIterator<Item = Stmt>>(iter: I) -> Self {
        Program {
            statements: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.e {
            ExprKind::Int(x) => x.fmt(f),
            ExprKind::Var(name) => name.fmt(f),
            ExprKind::Neg(inner) => write!(f, "-{inner}"),
            ExprKind::BinOp(lhs, op, rhs) => write!(f, "({lhs} {} {rhs})", op.name()),
        }
    }
}
