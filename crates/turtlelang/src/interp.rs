use std::collections::HashMap;

use crate::{
    ast::{Expr, ExprKind, Program, Stmt},
    error::EvalError,
};

/// The object that calls are sent to.
///
/// This is the only way a program can reach the outside world: a name that the target doesn't
/// know must fail with [`EvalError::UnknownProc`].
pub trait Dispatch {
    fn dispatch(&mut self, name: &str, args: &[i64]) -> Result<(), EvalError>;
}

/// Variable bindings for one run of a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Env {
    vars: HashMap<String, i64>,
}

impl Env {
    pub fn lookup_var(&self, name: &str) -> Option<i64> {
        self.vars.get(name).copied()
    }

    pub fn def_var(&mut self, name: &str, val: i64) {
        self.vars.insert(name.to_owned(), val);
    }

    pub fn eval(&self, expr: &Expr) -> Result<i64, EvalError> {
        match &expr.e {
            ExprKind::Int(x) => Ok(*x),
            ExprKind::Var(name) => self.lookup_var(name).ok_or_else(|| EvalError::UnknownVar {
                name: name.clone(),
                span: expr.span,
            }),
            ExprKind::Neg(inner) => self
                .eval(inner)?
                .checked_neg()
                .ok_or(EvalError::Overflow {
                    op: "-",
                    span: expr.span,
                }),
            ExprKind::BinOp(lhs, op, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                op.apply(lhs, rhs).ok_or(EvalError::Overflow {
                    op: op.name(),
                    span: expr.span,
                })
            }
        }
    }

    /// Run `program` to completion, stopping at the first error.
    pub fn exec(&mut self, program: &Program, target: &mut impl Dispatch) -> Result<(), EvalError> {
        for stmt in &program.statements {
            self.exec_stmt(stmt, target)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt, target: &mut impl Dispatch) -> Result<(), EvalError> {
        match stmt {
            Stmt::Assign { name, expr } => {
                let val = self.eval(expr)?;
                log::debug!("{} = {val}", name.name);
                self.def_var(&name.name, val);
            }
            Stmt::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                log::debug!("call {}{args:?}", name.name);
                target.dispatch(&name.name, &args)?;
            }
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
            Stmt::For {
                var,
                start,
                end,
                body,
            } => {
                let start = self.eval(start)?;
                let end = self.eval(end)?;
                log::debug!("for {} in {start}..={end}", var.name);
                for i in start..=end {
                    self.def_var(&var.name, i);
                    self.exec(body, target)?;
                }
            }
        }
        Ok(())
    }
}

impl Program {
    /// Run the program with a fresh set of variables.
    ///
    /// Returns the variables as they were when the program finished.
    pub fn exec(&self, target: &mut impl Dispatch) -> Result<Env, EvalError> {
        let mut env = Env::default();
        env.exec(self, target)?;
        Ok(env)
    }
}
