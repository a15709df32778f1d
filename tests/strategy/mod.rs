// Strategies generating well-typed expressions.
//
// Objects are flat tensor products of the generating objects A, B, C. Morphisms are generated
// from a given domain downwards, so composites are well-typed by construction.

use core::fmt::Debug;

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

use wiring_diagrams::expr::{Hom, Ob};
use wiring_diagrams::value::{Symbol, Value};

use crate::theory::Obj;

pub fn arb_generating_object() -> BoxedStrategy<Obj> {
    prop::sample::select(vec!["A", "B", "C"])
        .prop_map(Symbol::from)
        .boxed()
}

pub fn arb_object() -> BoxedStrategy<Ob<Obj>> {
    prop::collection::vec(arb_generating_object(), 0..4)
        .prop_map(|xs| Ob::otimes(xs.into_iter().map(Ob::Generator)))
        .boxed()
}

/// Generator labels for diagrams.
pub fn arb_symbol() -> BoxedStrategy<Symbol> {
    prop::sample::select(vec!["f", "g", "h", "k"])
        .prop_map(Symbol::from)
        .boxed()
}

/// Generator labels for the compiler.
pub fn arb_value() -> BoxedStrategy<Value> {
    arb_symbol().prop_map(Value::Symbol).boxed()
}

fn generators(dom: &Ob<Obj>) -> Vec<Obj> {
    dom.ports().expect("generated objects are flat")
}

fn from_generators(xs: &[Obj]) -> Ob<Obj> {
    Ob::otimes(xs.iter().cloned().map(Ob::Generator))
}

fn leaf<A: Clone + Debug + 'static>(
    dom: Ob<Obj>,
    labels: BoxedStrategy<A>,
) -> BoxedStrategy<Hom<Obj, A>> {
    let xs = generators(&dom);
    let mut options = vec![
        {
            let dom = dom.clone();
            (labels, arb_object())
                .prop_map(move |(a, codom)| Hom::Generator {
                    value: a,
                    dom: dom.clone(),
                    codom,
                })
                .boxed()
        },
        Just(Hom::id(dom.clone())).boxed(),
        {
            let dom = dom.clone();
            (1..3usize).prop_map(move |n| Hom::mcopy(dom.clone(), n)).boxed()
        },
        Just(Hom::delete(dom.clone())).boxed(),
    ];
    if let Some((first, rest)) = xs.split_first() {
        let braid = Hom::braid(from_generators(&[first.clone()]), from_generators(rest));
        options.push(Just(braid).boxed());
    }
    if xs.is_empty() {
        options.push(arb_object().prop_map(Hom::create).boxed());
    }
    proptest::strategy::Union::new(options).boxed()
}

/// Morphisms with domain `dom`, nested at most `depth` composites or tensors deep.
pub fn arb_hom_from<A: Clone + Debug + 'static>(
    dom: Ob<Obj>,
    depth: u32,
    labels: BoxedStrategy<A>,
) -> BoxedStrategy<Hom<Obj, A>> {
    let leaves = leaf(dom.clone(), labels.clone());
    if depth == 0 {
        return leaves;
    }

    let composite = {
        let labels = labels.clone();
        arb_hom_from(dom.clone(), depth - 1, labels.clone())
            .prop_flat_map(move |f| {
                arb_hom_from(f.codom(), depth - 1, labels.clone())
                    .prop_map(move |g| Hom::compose(f.clone(), g))
            })
            .boxed()
    };

    let xs = generators(&dom);
    let tensor = (0..=xs.len())
        .prop_flat_map(move |k| {
            let (left, right) = xs.split_at(k);
            (
                arb_hom_from(from_generators(left), depth - 1, labels.clone()),
                arb_hom_from(from_generators(right), depth - 1, labels.clone()),
            )
                .prop_map(|(f, g)| Hom::otimes(f, g))
        })
        .boxed();

    prop_oneof![2 => leaves, 1 => composite, 1 => tensor].boxed()
}

pub fn arb_hom() -> BoxedStrategy<Hom<Obj, Symbol>> {
    arb_object()
        .prop_flat_map(|dom| arb_hom_from(dom, 2, arb_symbol()))
        .boxed()
}

pub fn arb_compiled_hom() -> BoxedStrategy<Hom<Obj, Value>> {
    arb_object()
        .prop_flat_map(|dom| arb_hom_from(dom, 2, arb_value()))
        .boxed()
}

/// `n` composable morphisms `f₁ ; f₂ ; ... ; fₙ`
pub fn arb_composable(n: usize) -> BoxedStrategy<Vec<Hom<Obj, Symbol>>> {
    arb_object()
        .prop_flat_map(move |dom| arb_chain_from(dom, n))
        .boxed()
}

fn arb_chain_from(dom: Ob<Obj>, n: usize) -> BoxedStrategy<Vec<Hom<Obj, Symbol>>> {
    if n == 0 {
        return Just(vec![]).boxed();
    }
    arb_hom_from(dom, 1, arb_symbol())
        .prop_flat_map(move |f| {
            arb_chain_from(f.codom(), n - 1).prop_map(move |mut rest| {
                rest.insert(0, f.clone());
                rest
            })
        })
        .boxed()
}
