// A small theory used throughout the tests.
// Generating objects and generators are both symbols; the compiler sees generators as values.

use wiring_diagrams::expr::{Hom, Ob};
use wiring_diagrams::value::{Symbol, Value};
use wiring_diagrams::wiring::WiringDiagram;

pub type Obj = Symbol;
pub type Gen = Symbol;

pub type Diagram = WiringDiagram<Gen, Obj, ()>;

pub fn ob(name: &str) -> Ob<Obj> {
    Ob::generator(name)
}

/// The tensor product of the named generating objects.
pub fn obs(names: &[&str]) -> Ob<Obj> {
    Ob::otimes(names.iter().map(|n| ob(n)))
}

pub fn gen(name: &str, dom: Ob<Obj>, codom: Ob<Obj>) -> Hom<Obj, Gen> {
    Hom::generator(name, dom, codom)
}

/// `f : A → B`
pub fn f() -> Hom<Obj, Gen> {
    gen("f", ob("A"), ob("B"))
}

/// `g : B → A`
pub fn g() -> Hom<Obj, Gen> {
    gen("g", ob("B"), ob("A"))
}

/// A generator for the compiler, called by name.
pub fn op(name: &str, dom: Ob<Obj>, codom: Ob<Obj>) -> Hom<Obj, Value> {
    Hom::generator(Value::symbol(name), dom, codom)
}
