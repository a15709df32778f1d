//! A reference interpreter for compiled procedures over numeric scalars.
use std::collections::HashMap;

use num_traits::{Num, NumCast};
use thiserror::Error;

use super::ast::*;
use super::compiler::Procedure;
use crate::value::{Symbol, Value};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("variable {0} is not bound")]
    Unbound(Var),

    #[error("expected a scalar")]
    NonScalar,

    #[error("literal {0} is not a number of the evaluated type")]
    NonNumeric(Value),

    #[error("no implementation for function {0}")]
    UnknownFunction(Symbol),

    #[error("expected {expected} arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("cannot bind {values} values to {targets} variables")]
    TupleArity { targets: usize, values: usize },

    #[error("function body does not return")]
    MissingReturn,
}

/// Types procedures can be evaluated over.
pub trait Scalar: Num + NumCast + Copy {}

impl<T: Num + NumCast + Copy> Scalar for T {}

struct Env<T, F> {
    vars: HashMap<Var, T>,
    call: F,
}

impl<T: Scalar, F: FnMut(&Symbol, &[T]) -> Option<Vec<T>>> Env<T, F> {
    fn new(params: &[Var], args: &[T], call: F) -> Result<Self, EvalError> {
        if params.len() != args.len() {
            return Err(EvalError::ArgumentCount {
                expected: params.len(),
                found: args.len(),
            });
        }
        let vars = params.iter().cloned().zip(args.iter().copied()).collect();
        Ok(Env { vars, call })
    }

    fn lookup(&self, v: &Var) -> Result<T, EvalError> {
        self.vars
            .get(v)
            .copied()
            .ok_or_else(|| EvalError::Unbound(v.clone()))
    }

    fn scalar(&mut self, x: &Expr) -> Result<T, EvalError> {
        match self.expr(x)?.as_slice() {
            [y] => Ok(*y),
            _ => Err(EvalError::NonScalar),
        }
    }

    /// Evaluate to a list of values: one for scalars, any number for tuples and calls.
    fn expr(&mut self, x: &Expr) -> Result<Vec<T>, EvalError> {
        match x {
            Expr::Var(v) => Ok(vec![self.lookup(v)?]),
            Expr::Literal(value) => Ok(vec![literal(value)?]),
            Expr::Call { func, args } => {
                let args = args
                    .iter()
                    .map(|a| self.scalar(a))
                    .collect::<Result<Vec<T>, _>>()?;
                (self.call)(func, &args).ok_or_else(|| EvalError::UnknownFunction(func.clone()))
            }
            Expr::Add(xs) => {
                let mut sum = T::zero();
                for x in xs {
                    sum = sum + self.scalar(x)?;
                }
                Ok(vec![sum])
            }
            Expr::Mul(a, b) => Ok(vec![self.scalar(a)? * self.scalar(b)?]),
            // Matrix-vector products need a matrix type, which scalars don't provide.
            Expr::Vector(_) => Err(EvalError::NonScalar),
            Expr::Tuple(xs) => xs.iter().map(|x| self.scalar(x)).collect(),
        }
    }

    /// Execute `stmt`, returning the returned values if it returns.
    fn exec(&mut self, stmt: &Stmt) -> Result<Option<Vec<T>>, EvalError> {
        match stmt {
            Stmt::Assign { targets, value } => {
                let values = self.expr(value)?;
                // Statements without targets are run for their effect only.
                if !targets.is_empty() {
                    if targets.len() != values.len() {
                        return Err(EvalError::TupleArity {
                            targets: targets.len(),
                            values: values.len(),
                        });
                    }
                    self.vars.extend(targets.iter().cloned().zip(values));
                }
                Ok(None)
            }
            Stmt::Block(stmts) => {
                for s in stmts {
                    if let Some(ret) = self.exec(s)? {
                        return Ok(Some(ret));
                    }
                }
                Ok(None)
            }
            Stmt::Return(x) => self.expr(x).map(Some),
        }
    }
}

fn literal<T: Scalar>(value: &Value) -> Result<T, EvalError> {
    let x = match value {
        Value::Bool(b) => Some(if *b { T::one() } else { T::zero() }),
        Value::Int(i) => <T as NumCast>::from(*i),
        Value::Float(x) => <T as NumCast>::from(*x),
        Value::String(_) | Value::Symbol(_) => None,
    };
    x.ok_or_else(|| EvalError::NonNumeric(value.clone()))
}

impl Procedure {
    /// Run the procedure on `args`, calling `call` for every function application.
    ///
    /// `call` returns `None` for functions it doesn't know.
    pub fn eval<T: Scalar>(
        &self,
        args: &[T],
        call: impl FnMut(&Symbol, &[T]) -> Option<Vec<T>>,
    ) -> Result<Vec<T>, EvalError> {
        let mut env = Env::new(&self.inputs, args, call)?;
        env.exec(&self.body)?;
        self.outputs.iter().map(|v| env.lookup(v)).collect()
    }
}

impl FunctionDef {
    /// Call the function on `args`; see [`Procedure::eval`].
    pub fn eval<T: Scalar>(
        &self,
        args: &[T],
        call: impl FnMut(&Symbol, &[T]) -> Option<Vec<T>>,
    ) -> Result<Vec<T>, EvalError> {
        let mut env = Env::new(&self.params, args, call)?;
        env.exec(&self.body)?.ok_or(EvalError::MissingReturn)
    }
}
