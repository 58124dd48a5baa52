use std::{collections::HashMap, rc::Rc};

use crate::error::EvalError;

/// A named operation that a program can call on some target `T`.
pub trait Proc<T> {
    /// Run the procedure, failing with [`EvalError::WrongArgs`] if `args` doesn't fit its arity.
    fn call(&self, target: &mut T, args: &[i64]) -> Result<(), EvalError>;
    /// The smallest and largest number of arguments accepted.
    fn arity(&self) -> (usize, usize);
    fn name(&self) -> &str;
}

fn wrong_args(name: &str, (min, max): (usize, usize), found: usize) -> EvalError {
    EvalError::WrongArgs {
        proc: name.to_owned(),
        min,
        max,
        found,
    }
}

struct FnZero<F> {
    f: F,
    name: &'static str,
}

struct FnOne<F> {
    f: F,
    name: &'static str,
}

struct FnTwo<F> {
    f: F,
    name: &'static str,
}

struct FnSlice<F> {
    f: F,
    min: usize,
    max: usize,
    name: &'static str,
}

impl<T, F: Fn(&mut T) -> Result<(), EvalError>> Proc<T> for FnZero<F> {
    fn call(&self, target: &mut T, args: &[i64]) -> Result<(), EvalError> {
        if !args.is_empty() {
            return Err(wrong_args(self.name, (0, 0), args.len()));
        }
        (self.f)(target)
    }

    fn arity(&self) -> (usize, usize) {
        (0, 0)
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<T, F: Fn(&mut T, i64) -> Result<(), EvalError>> Proc<T> for FnOne<F> {
    fn call(&self, target: &mut T, args: &[i64]) -> Result<(), EvalError> {
        let &[x] = args else {
            return Err(wrong_args(self.name, (1, 1), args.len()));
        };
        (self.f)(target, x)
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<T, F: Fn(&mut T, i64, i64) -> Result<(), EvalError>> Proc<T> for FnTwo<F> {
    fn call(&self, target: &mut T, args: &[i64]) -> Result<(), EvalError> {
        let &[x, y] = args else {
            return Err(wrong_args(self.name, (2, 2), args.len()));
        };
        (self.f)(target, x, y)
    }

    fn arity(&self) -> (usize, usize) {
        (2, 2)
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<T, F: Fn(&mut T, &[i64]) -> Result<(), EvalError>> Proc<T> for FnSlice<F> {
    fn call(&self, target: &mut T, args: &[i64]) -> Result<(), EvalError> {
        if args.len() < self.min || args.len() > self.max {
            return Err(wrong_args(self.name, (self.min, self.max), args.len()));
        }
        (self.f)(target, args)
    }

    fn arity(&self) -> (usize, usize) {
        (self.min, self.max)
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub trait IntoCallResult {
    fn into_call_result(self) -> Result<(), EvalError>;
}

impl IntoCallResult for () {
    fn into_call_result(self) -> Result<(), EvalError> {
        Ok(())
    }
}

impl IntoCallResult for Result<(), EvalError> {
    fn into_call_result(self) -> Result<(), EvalError> {
        self
    }
}

pub fn fn_zero<T, U, F>(name: &'static str, f: F) -> impl Proc<T>
where
    U: IntoCallResult,
    F: Fn(&mut T) -> U,
{
    FnZero {
        f: move |target: &mut T| f(target).into_call_result(),
        name,
    }
}

pub fn fn_one<T, U, F>(name: &'static str, f: F) -> impl Proc<T>
where
    U: IntoCallResult,
    F: Fn(&mut T, i64) -> U,
{
    FnOne {
        f: move |target: &mut T, x| f(target, x).into_call_result(),
        name,
    }
}

pub fn fn_two<T, U, F>(name: &'static str, f: F) -> impl Proc<T>
where
    U: IntoCallResult,
    F: Fn(&mut T, i64, i64) -> U,
{
    FnTwo {
        f: move |target: &mut T, x, y| f(target, x, y).into_call_result(),
        name,
    }
}

/// A procedure taking between `min` and `max` arguments, passed as a slice.
pub fn fn_slice<T, U, F>(name: &'static str, min: usize, max: usize, f: F) -> impl Proc<T>
where
    U: IntoCallResult,
    F: Fn(&mut T, &[i64]) -> U,
{
    FnSlice {
        f: move |target: &mut T, args: &[i64]| f(target, args).into_call_result(),
        min,
        max,
        name,
    }
}

/// A name-to-procedure table.
pub struct Procs<T> {
    procs: HashMap<String, Rc<dyn Proc<T>>>,
}

impl<T> Default for Procs<T> {
    fn default() -> Self {
        Procs {
            procs: HashMap::new(),
        }
    }
}

impl<T> Clone for Procs<T> {
    fn clone(&self) -> Self {
        Procs {
            procs: self.procs.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Procs<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Procs").field("procs", &names).finish()
    }
}

impl<T> Procs<T> {
    /// Add a procedure, replacing any existing one with the same name.
    pub fn def_proc(&mut self, proc: impl Proc<T> + 'static) {
        self.procs.insert(proc.name().to_owned(), Rc::new(proc));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.procs.keys().map(|k| k.as_str())
    }

    pub fn call(&self, target: &mut T, name: &str, args: &[i64]) -> Result<(), EvalError> {
        let proc = self
            .procs
            .get(name)
            .ok_or_else(|| EvalError::UnknownProc {
                name: name.to_owned(),
            })?;
        proc.call(target, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        total: i64,
        resets: u32,
    }

    fn procs() -> Procs<Counter> {
        let mut procs = Procs::default();
        procs.def_proc(fn_zero("reset", |c: &mut Counter| {
            c.total = 0;
            c.resets += 1;
        }));
        procs.def_proc(fn_one("add", |c: &mut Counter, x| c.total += x));
        procs.def_proc(fn_two("add_mul", |c: &mut Counter, x, y| c.total += x * y));
        procs.def_proc(fn_slice("add_all", 1, 3, |c: &mut Counter, xs: &[i64]| {
            c.total += xs.iter().sum::<i64>()
        }));
        procs.def_proc(fn_one("checked", |c: &mut Counter, x| {
            if x < 0 {
                Err(EvalError::UnknownProc {
                    name: "negative".to_owned(),
                })
            } else {
                c.total = x;
                Ok(())
            }
        }));
        procs
    }

    #[test]
    fn calls_by_name() {
        let procs = procs();
        let mut c = Counter::default();
        procs.call(&mut c, "add", &[3]).unwrap();
        procs.call(&mut c, "add_mul", &[2, 5]).unwrap();
        procs.call(&mut c, "add_all", &[1, 1]).unwrap();
        assert_eq!(c.total, 15);
        procs.call(&mut c, "reset", &[]).unwrap();
        assert_eq!((c.total, c.resets), (0, 1));
    }

    #[test]
    fn unknown_name() {
        let mut c = Counter::default();
        assert_eq!(
            procs().call(&mut c, "jump", &[]),
            Err(EvalError::UnknownProc {
                name: "jump".to_owned()
            })
        );
    }

    #[test]
    fn arity_is_checked() {
        let procs = procs();
        let mut c = Counter::default();
        let err = procs.call(&mut c, "add", &[]).unwrap_err();
        assert_eq!(err.to_string(), "wrong number of inputs to add (expected 1, found 0)");
        let err = procs.call(&mut c, "add_all", &[1, 2, 3, 4]).unwrap_err();
        assert_eq!(err.to_string(), "wrong number of inputs to add_all (expected 1 to 3, found 4)");
        assert_eq!(c.total, 0);
    }

    #[test]
    fn direct_calls_check_arity() {
        let mut c = Counter::default();
        let add = fn_one("add", |c: &mut Counter, x| c.total += x);
        assert_eq!(add.arity(), (1, 1));
        assert_eq!(
            add.call(&mut c, &[]),
            Err(EvalError::WrongArgs {
                proc: "add".to_owned(),
                min: 1,
                max: 1,
                found: 0
            })
        );
        let add_mul = fn_two("add_mul", |c: &mut Counter, x, y| c.total += x * y);
        assert!(add_mul.call(&mut c, &[4]).is_err());
        let reset = fn_zero("reset", |c: &mut Counter| c.resets += 1);
        assert!(reset.call(&mut c, &[1]).is_err());
        assert_eq!((c.total, c.resets), (0, 0));

        add_mul.call(&mut c, &[4, 5]).unwrap();
        assert_eq!(c.total, 20);
    }

    #[test]
    fn proc_errors_pass_through() {
        let mut c = Counter::default();
        assert!(procs().call(&mut c, "checked", &[-1]).is_err());
        procs().call(&mut c, "checked", &[4]).unwrap();
        assert_eq!(c.total, 4);
    }
}
