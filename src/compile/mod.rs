//! Compile symbolic expressions to executable straight-line code.
//!
//! The [`Compiler`] is a second [functor](crate::functor::Functor) out of the expression
//! grammar. Objects go to their arity, and morphisms go to [`Procedure`]s: composition
//! substitutes variables and concatenates statements, tensor products run side by side, and
//! the structural morphisms only rename wires.
//!
//! ```rust
//! use wiring_diagrams::compile::{compile_function, Var};
//! use wiring_diagrams::expr::{Hom, Ob};
//! use wiring_diagrams::value::Value;
//!
//! let a: Ob<&str> = Ob::generator("A");
//! let f = Hom::generator(Value::symbol("f"), a.clone(), a.clone());
//! let double = Hom::linear(Value::Int(2), a.clone(), a.clone());
//!
//! let def = compile_function(&Hom::compose(f, double), "h", Some(vec![Var::from("x")])).unwrap();
//! assert_eq!(def.to_string(), "function h(x)\n    v2 = f(x)\n    v4 = 2 * v2\n    return v4\nend\n");
//!
//! let y = def.eval(&[5], |_, args| Some(vec![args[0] + 1])).unwrap();
//! assert_eq!(y, vec![12]);
//! ```
pub mod ast;
pub mod compiler;
pub mod eval;

pub use ast::{concat_stmts, Expr, FunctionDef, Stmt, Substitution, Var};
pub use compiler::{compile, compile_function, CompileError, Compiler, Procedure};
pub use eval::{EvalError, Scalar};
