//! Abstract syntax of compiled procedures.
//!
//! Procedures are straight-line code: a sequence of single-assignment statements over scalar
//! variables, followed (in a [`super::FunctionDef`]) by a return.
use core::fmt;
use std::collections::HashMap;

use crate::value::{Symbol, Value};

/// A program variable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Var(pub String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Var(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Var {
    fn from(s: &str) -> Self {
        Var(s.to_string())
    }
}

/// A simultaneous renaming of variables.
pub type Substitution = HashMap<Var, Var>;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Var(Var),
    Literal(Value),
    /// Application of a named function
    Call { func: Symbol, args: Vec<Expr> },
    /// `x₁ + ... + xₙ`; the empty sum is zero.
    Add(Vec<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    /// A column vector, e.g. the argument of a matrix-vector product
    Vector(Vec<Expr>),
    Tuple(Vec<Expr>),
}

impl Expr {
    pub fn var(v: &Var) -> Self {
        Expr::Var(v.clone())
    }

    pub fn vars(vs: &[Var]) -> Vec<Expr> {
        vs.iter().map(Expr::var).collect()
    }

    /// Rename every variable in `self` according to `s`, in a single pass.
    pub fn substitute(&self, s: &Substitution) -> Expr {
        let all = |xs: &[Expr]| -> Vec<Expr> { xs.iter().map(|x| x.substitute(s)).collect() };
        match self {
            Expr::Var(v) => Expr::Var(rename(v, s)),
            Expr::Literal(x) => Expr::Literal(x.clone()),
            Expr::Call { func, args } => Expr::Call {
                func: func.clone(),
                args: all(args),
            },
            Expr::Add(xs) => Expr::Add(all(xs)),
            Expr::Mul(a, b) => Expr::Mul(Box::new(a.substitute(s)), Box::new(b.substitute(s))),
            Expr::Vector(xs) => Expr::Vector(all(xs)),
            Expr::Tuple(xs) => Expr::Tuple(all(xs)),
        }
    }

    /// Whether `v` occurs anywhere in `self`.
    pub fn mentions(&self, v: &Var) -> bool {
        match self {
            Expr::Var(w) => w == v,
            Expr::Literal(_) => false,
            Expr::Call { args: xs, .. } | Expr::Add(xs) | Expr::Vector(xs) | Expr::Tuple(xs) => {
                xs.iter().any(|x| x.mentions(v))
            }
            Expr::Mul(a, b) => a.mentions(v) || b.mentions(v),
        }
    }
}

pub(crate) fn rename(v: &Var, s: &Substitution) -> Var {
    s.get(v).cloned().unwrap_or_else(|| v.clone())
}

fn comma_separated(f: &mut fmt::Formatter<'_>, xs: &[impl fmt::Display]) -> fmt::Result {
    for (i, x) in xs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{x}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Literal(x) => write!(f, "{x}"),
            Expr::Call { func, args } => {
                write!(f, "{func}(")?;
                comma_separated(f, args)?;
                f.write_str(")")
            }
            Expr::Add(xs) if xs.is_empty() => f.write_str("0"),
            Expr::Add(xs) => {
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{x}")?;
                }
                Ok(())
            }
            Expr::Mul(a, b) => {
                for (i, x) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" * ")?;
                    }
                    match x.as_ref() {
                        Expr::Add(xs) if xs.len() > 1 => write!(f, "({x})")?,
                        x => write!(f, "{x}")?,
                    }
                }
                Ok(())
            }
            Expr::Vector(xs) => {
                f.write_str("[")?;
                comma_separated(f, xs)?;
                f.write_str("]")
            }
            Expr::Tuple(xs) => {
                f.write_str("(")?;
                comma_separated(f, xs)?;
                f.write_str(")")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    /// Bind `value` to `targets`: a single variable, a tuple of variables when there is more
    /// than one target, or nothing at all when there are none.
    Assign { targets: Vec<Var>, value: Expr },
    /// Statements executed in order
    Block(Vec<Stmt>),
    Return(Expr),
}

impl Stmt {
    pub fn assign(targets: Vec<Var>, value: Expr) -> Self {
        Stmt::Assign { targets, value }
    }

    /// The empty block
    pub fn empty() -> Self {
        Stmt::Block(vec![])
    }

    /// The statements of a block, or `self` alone.
    pub fn statements(&self) -> &[Stmt] {
        match self {
            Stmt::Block(stmts) => stmts,
            stmt => std::slice::from_ref(stmt),
        }
    }

    /// Number of non-block statements, counting through nested blocks.
    pub fn len(&self) -> usize {
        match self {
            Stmt::Block(stmts) => stmts.iter().map(Stmt::len).sum(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rename every variable in `self`, both read and assigned, according to `s`.
    pub fn substitute(&self, s: &Substitution) -> Stmt {
        match self {
            Stmt::Assign { targets, value } => Stmt::Assign {
                targets: targets.iter().map(|v| rename(v, s)).collect(),
                value: value.substitute(s),
            },
            Stmt::Block(stmts) => Stmt::Block(stmts.iter().map(|x| x.substitute(s)).collect()),
            Stmt::Return(x) => Stmt::Return(x.substitute(s)),
        }
    }

    /// Whether `v` is read or assigned anywhere in `self`.
    pub fn mentions(&self, v: &Var) -> bool {
        match self {
            Stmt::Assign { targets, value } => targets.contains(v) || value.mentions(v),
            Stmt::Block(stmts) => stmts.iter().any(|x| x.mentions(v)),
            Stmt::Return(x) => x.mentions(v),
        }
    }

    fn flatten_into(self, out: &mut Vec<Stmt>) {
        match self {
            Stmt::Block(stmts) => stmts.into_iter().for_each(|x| x.flatten_into(out)),
            stmt => out.push(stmt),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Stmt::Block(stmts) => stmts.iter().try_for_each(|x| x.fmt_indented(f, indent)),
            Stmt::Assign { targets, value } => {
                write!(f, "{:indent$}", "")?;
                match targets.as_slice() {
                    [] => {}
                    [v] => write!(f, "{v} = ")?,
                    vs => {
                        f.write_str("(")?;
                        comma_separated(f, vs)?;
                        f.write_str(") = ")?;
                    }
                }
                writeln!(f, "{value}")
            }
            Stmt::Return(x) => writeln!(f, "{:indent$}return {x}", ""),
        }
    }
}

/// Concatenate two statements into one flat block.
///
/// Blocks on either side are spliced in rather than nested, so the result is a block of
/// non-block statements.
pub fn concat_stmts(a: Stmt, b: Stmt) -> Stmt {
    let mut stmts = Vec::with_capacity(a.len() + b.len());
    a.flatten_into(&mut stmts);
    b.flatten_into(&mut stmts);
    Stmt::Block(stmts)
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// A named function: formal parameters and a body ending in a [`Stmt::Return`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDef {
    pub name: Symbol,
    pub params: Vec<Var>,
    pub body: Stmt,
}

impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        comma_separated(f, &self.params)?;
        writeln!(f, ")")?;
        self.body.fmt_indented(f, 4)?;
        writeln!(f, "end")
    }
}
