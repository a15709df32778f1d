//! # Wiring Diagrams
//!
//! A [WiringDiagram](crate::wiring::WiringDiagram) is a directed, hierarchical port graph
//! representing a morphism of a symmetric monoidal category: boxes with ordered input and output
//! ports, connected by wires, inside an outer box whose ports are the domain and codomain.
//! For example, the composite `f ; g` of `f : A → B` and `g : B → A` is
//!
//! ```text
//!          ┌───┐     ┌───┐
//!     A ───│ f │─ B ─│ g │─── A
//!          └───┘     └───┘
//! ```
//!
//! a diagram with two boxes and three wires: one from the outer input to `f`, one from `f` to
//! `g`, and one from `g` to the outer output.
//!
//! # Two interpretations of one grammar
//!
//! Morphisms are written as symbolic [expressions](crate::expr), and this crate provides two
//! [functors](crate::functor) out of that grammar:
//!
//! - the [diagram builder](crate::wiring::build), producing wiring diagrams, which can then be
//!   written to and read from [GraphML](crate::graphml);
//! - the [compiler](crate::compile), producing straight-line procedures over scalar variables.
//!
//! ```rust
//! use wiring_diagrams::prelude::*;
//!
//! let a: Ob<Symbol> = Ob::generator("A");
//! let b: Ob<Symbol> = Ob::generator("B");
//! let f: Hom<Symbol, Symbol> = Hom::generator(Symbol::new("f"), a.clone(), b.clone());
//! let g = Hom::generator(Symbol::new("g"), b, a);
//!
//! let d = build(&Hom::compose(f, g)).unwrap();
//! assert_eq!((d.nboxes(), d.nwires()), (2, 3));
//!
//! let text = to_graphml_string(&d, WriteOptions::default()).unwrap();
//! let e: WiringDiagram<Symbol, Symbol, ()> = from_graphml_str(&text).unwrap();
//! assert!(d.is_isomorphic(&e));
//! ```
//!
//! # Features
//!
//! - `log` (default): emit diagnostics through the [`log`](https://docs.rs/log) facade.
//! - `serde`: derive `Serialize` and `Deserialize` for expressions, diagrams and procedures.

pub mod category;
pub mod expr;
pub mod functor;
pub mod value;

pub mod compile;
pub mod graphml;
pub mod wiring;

mod util;

pub mod prelude {
    //! The types and functions needed to build, serialize and compile diagrams.
    pub use crate::category::*;
    pub use crate::compile::{compile, compile_function, Procedure};
    pub use crate::expr::{Hom, Ob};
    pub use crate::graphml::{from_graphml_str, to_graphml_string, WriteOptions};
    pub use crate::value::{Symbol, Value};
    pub use crate::wiring::build::build;
    pub use crate::wiring::{AtomicBox, BoxId, DiagramBox, Port, PortKind, Wire, WiringDiagram};
}
