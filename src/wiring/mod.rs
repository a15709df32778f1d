//! Wiring diagrams: hierarchical port graphs representing morphisms.
//!
//! A [`WiringDiagram`] has an outer interface of ports and contains boxes, each either an
//! [`AtomicBox`] or itself a [`WiringDiagram`], connected by [`Wire`]s. Diagrams form a
//! symmetric monoidal category (see [`category`]) and can be built from symbolic expressions
//! with [`build::build`].
//!
//! ```rust
//! use wiring_diagrams::expr::{Hom, Ob};
//! use wiring_diagrams::wiring::build::build;
//!
//! let a: Ob<&str> = Ob::generator("A");
//! let b: Ob<&str> = Ob::generator("B");
//! let f: Hom<&str, &str> = Hom::generator("f", a.clone(), b.clone());
//! let g = Hom::generator("g", b, a);
//!
//! let d = build(&Hom::compose(f, g)).unwrap();
//! assert_eq!(d.nboxes(), 2);
//! assert_eq!(d.nwires(), 3);
//! ```
pub mod build;
pub mod category;
pub mod diagram;
pub mod isomorphism;
pub mod port;

pub use diagram::*;
pub use port::*;
