//! Compile expressions to straight-line procedures.
use thiserror::Error;

use super::ast::*;
use crate::expr::{Hom, Ob};
use crate::functor::Functor;
use crate::util::log;
use crate::value::{Symbol, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("cannot compose: {outputs} outputs fed into {inputs} inputs")]
    ArityMismatch { outputs: usize, inputs: usize },

    #[error("cannot compile an empty composite")]
    EmptyComposite,

    /// Merging is only compiled for objects of arity one.
    #[error("cannot merge copies of an object of arity {0}")]
    MergeArity(usize),

    #[error("procedure has {expected} inputs but {found} parameter names were given")]
    ArgumentCount { expected: usize, found: usize },

    #[error("parameter name {0} is already used inside the procedure")]
    ParameterCapture(Var),

    #[error("parameter name {0} is given more than once")]
    DuplicateParameter(Var),
}

/// Straight-line code with formal inputs and outputs.
///
/// Every variable is assigned at most once in `body`. Outputs may alias inputs or each other,
/// e.g. the outputs of a copy are all the same variable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Procedure {
    pub inputs: Vec<Var>,
    pub outputs: Vec<Var>,
    pub body: Stmt,
}

impl Procedure {
    /// A procedure with no statements.
    pub fn wires(inputs: Vec<Var>, outputs: Vec<Var>) -> Self {
        Procedure {
            inputs,
            outputs,
            body: Stmt::empty(),
        }
    }

    /// Rename variables in the body and outputs; inputs are left alone.
    fn substitute(&self, s: &Substitution) -> (Stmt, Vec<Var>) {
        let outputs = self.outputs.iter().map(|v| rename(v, s)).collect();
        (self.body.substitute(s), outputs)
    }
}

/// The compiling functor, which owns the supply of fresh variable names.
///
/// Names are `v1, v2, ...` and unique across everything compiled by one `Compiler`, which is
/// what makes single-pass substitution in composites safe.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    counter: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> Var {
        self.counter += 1;
        Var(format!("v{}", self.counter))
    }

    pub fn fresh_vars(&mut self, n: usize) -> Vec<Var> {
        (0..n).map(|_| self.fresh()).collect()
    }

    /// A single-statement procedure computing `value` from fresh `inputs` into `n_outputs`
    /// fresh outputs.
    fn statement(
        &mut self,
        inputs: Vec<Var>,
        n_outputs: usize,
        value: impl FnOnce(&[Var]) -> Expr,
    ) -> Procedure {
        let outputs = self.fresh_vars(n_outputs);
        let value = value(&inputs);
        Procedure {
            inputs,
            body: Stmt::assign(outputs.clone(), value),
            outputs,
        }
    }

    fn compose(f: Procedure, g: Procedure) -> Result<Procedure, CompileError> {
        if f.outputs.len() != g.inputs.len() {
            return Err(CompileError::ArityMismatch {
                outputs: f.outputs.len(),
                inputs: g.inputs.len(),
            });
        }
        let s: Substitution = g.inputs.iter().cloned().zip(f.outputs).collect();
        let (body, outputs) = g.substitute(&s);
        Ok(Procedure {
            inputs: f.inputs,
            outputs,
            body: concat_stmts(f.body, body),
        })
    }

    fn otimes(f: Procedure, g: Procedure) -> Procedure {
        Procedure {
            inputs: [f.inputs, g.inputs].concat(),
            outputs: [f.outputs, g.outputs].concat(),
            body: concat_stmts(f.body, g.body),
        }
    }
}

/// The right-hand side of a generator statement: a call when the generator is named by a
/// symbol, otherwise the value itself as a constant.
fn apply(value: &Value, inputs: &[Var]) -> Expr {
    match value {
        Value::Symbol(func) => Expr::Call {
            func: func.clone(),
            args: Expr::vars(inputs),
        },
        value => Expr::Literal(value.clone()),
    }
}

/// `value * x`, `value * [x₁, ..., xₙ]`, or `0` for a linear map on the unit.
fn linear(value: &Value, inputs: &[Var]) -> Expr {
    let coefficient = Box::new(Expr::Literal(value.clone()));
    match inputs {
        [] => Expr::Literal(Value::Int(0)),
        [x] => Expr::Mul(coefficient, Box::new(Expr::var(x))),
        xs => Expr::Mul(coefficient, Box::new(Expr::Vector(Expr::vars(xs)))),
    }
}

impl<O> Functor<O, Value> for Compiler {
    type Object = usize;
    type Arrow = Procedure;
    type Error = CompileError;

    fn map_object(&mut self, a: &Ob<O>) -> Result<usize, CompileError> {
        Ok(a.arity())
    }

    fn map_arrow(&mut self, f: &Hom<O, Value>) -> Result<Procedure, CompileError> {
        let proc = match f {
            Hom::Generator { value, dom, codom } => {
                let inputs = self.fresh_vars(dom.arity());
                self.statement(inputs, codom.arity(), |xs| apply(value, xs))
            }
            Hom::Linear { value, dom, codom } => {
                let inputs = self.fresh_vars(dom.arity());
                self.statement(inputs, codom.arity(), |xs| linear(value, xs))
            }
            Hom::Id(a) => {
                let xs = self.fresh_vars(a.arity());
                Procedure::wires(xs.clone(), xs)
            }
            Hom::Compose(fs) => {
                let (first, rest) = fs.split_first().ok_or(CompileError::EmptyComposite)?;
                let mut acc = self.map_arrow(first)?;
                for g in rest {
                    let g = self.map_arrow(g)?;
                    acc = Compiler::compose(acc, g)?;
                }
                acc
            }
            Hom::Otimes(fs) => {
                let mut acc = Procedure::wires(vec![], vec![]);
                for g in fs {
                    acc = Compiler::otimes(acc, self.map_arrow(g)?);
                }
                acc
            }
            Hom::Braid(a, b) => {
                let xs = self.fresh_vars(a.arity() + b.arity());
                let (left, right) = xs.split_at(a.arity());
                let outputs = [right, left].concat();
                Procedure::wires(xs, outputs)
            }
            Hom::Mcopy { ob, n } => {
                let xs = self.fresh_vars(ob.arity());
                let outputs = (0..*n).flat_map(|_| xs.iter().cloned()).collect();
                Procedure::wires(xs, outputs)
            }
            Hom::Delete(a) => Procedure::wires(self.fresh_vars(a.arity()), vec![]),
            Hom::Mmerge { ob, n } => {
                if ob.arity() != 1 {
                    return Err(CompileError::MergeArity(ob.arity()));
                }
                let inputs = self.fresh_vars(*n);
                self.statement(inputs, 1, |xs| Expr::Add(Expr::vars(xs)))
            }
            Hom::Create(a) => match a.arity() {
                0 => Procedure::wires(vec![], vec![]),
                1 => self.statement(vec![], 1, |_| Expr::Literal(Value::Int(0))),
                k => self.statement(vec![], k, |_| {
                    Expr::Tuple(vec![Expr::Literal(Value::Int(0)); k])
                }),
            },
        };
        log::trace!(
            "compiled {} inputs to {} outputs in {} statements",
            proc.inputs.len(),
            proc.outputs.len(),
            proc.body.len()
        );
        Ok(proc)
    }
}

/// Compile an expression to a procedure, with a fresh supply of variable names.
pub fn compile<O>(f: &Hom<O, Value>) -> Result<Procedure, CompileError> {
    Compiler::new().map_arrow(f)
}

/// Compile an expression to a named function returning its outputs.
///
/// The function returns its sole output, or a tuple of all outputs otherwise. If `params` is
/// given it names the formal parameters, replacing the generated input names; it must have one
/// name per input, names must be distinct, and they must not clash with variables used in the
/// body.
pub fn compile_function<O>(
    f: &Hom<O, Value>,
    name: impl Into<Symbol>,
    params: Option<Vec<Var>>,
) -> Result<FunctionDef, CompileError> {
    let proc = compile(f)?;

    let (params, body, outputs) = match params {
        None => (proc.inputs.clone(), proc.body, proc.outputs),
        Some(params) => {
            if params.len() != proc.inputs.len() {
                return Err(CompileError::ArgumentCount {
                    expected: proc.inputs.len(),
                    found: params.len(),
                });
            }
            for (i, p) in params.iter().enumerate() {
                if params[..i].contains(p) {
                    return Err(CompileError::DuplicateParameter(p.clone()));
                }
                let captured = !proc.inputs.contains(p)
                    && (proc.body.mentions(p) || proc.outputs.contains(p));
                if captured {
                    return Err(CompileError::ParameterCapture(p.clone()));
                }
            }
            let s: Substitution = proc.inputs.iter().cloned().zip(params.iter().cloned()).collect();
            let (body, outputs) = proc.substitute(&s);
            (params, body, outputs)
        }
    };

    let result = match outputs.as_slice() {
        [x] => Expr::var(x),
        xs => Expr::Tuple(Expr::vars(xs)),
    };
    let def = FunctionDef {
        name: name.into(),
        params,
        body: concat_stmts(body, Stmt::Return(result)),
    };
    log::debug!("compiled function {} with {} statements", def.name, def.body.len());
    Ok(def)
}
