//! Wiring diagrams as morphisms of a symmetric monoidal category with diagonals and codiagonals.
//!
//! Copying, deleting, merging and creating are represented implicitly, by wires fanning out of
//! or into a single port, rather than by junction boxes.
use super::diagram::*;
use super::port::*;
use crate::category::*;

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> Arrow for WiringDiagram<B, P, W> {
    type Object = Vec<P>;
    type Error = WiringError;

    fn source(&self) -> Self::Object {
        self.input_ports().to_vec()
    }

    fn target(&self) -> Self::Object {
        self.output_ports().to_vec()
    }

    fn identity(a: &Self::Object) -> Self {
        let mut f = WiringDiagram::new(a.clone(), a.clone());
        for i in 0..a.len() {
            f.push_wire(Wire::between(
                Port::output(INPUT_ID, i),
                Port::input(OUTPUT_ID, i),
            ));
        }
        f
    }

    fn compose(&self, other: &Self) -> Result<Self, Self::Error> {
        check_composable(self.output_ports(), other.input_ports())?;

        let mut h = WiringDiagram::new(self.source(), other.target());
        let f = h.add_box(self.clone());
        let g = h.add_box(other.clone());

        let wires = (0..self.input_ports().len())
            .map(|i| Wire::between(Port::output(INPUT_ID, i), Port::input(f, i)))
            .chain(
                (0..self.output_ports().len())
                    .map(|i| Wire::between(Port::output(f, i), Port::input(g, i))),
            )
            .chain(
                (0..other.output_ports().len())
                    .map(|j| Wire::between(Port::output(g, j), Port::input(OUTPUT_ID, j))),
            );
        h.add_wires(wires)?;

        h.substitute(f)?;
        h.substitute(g)?;
        Ok(h)
    }
}

/// Check that a codomain and a domain agree port for port.
pub fn check_composable<P: PartialEq>(codomain: &[P], domain: &[P]) -> Result<(), WiringError> {
    if codomain.len() != domain.len() {
        return Err(WiringError::DomainMismatch {
            codomain: codomain.len(),
            domain: domain.len(),
        });
    }
    match codomain.iter().zip(domain).position(|(a, b)| a != b) {
        Some(index) => Err(WiringError::PortTypeMismatch { index }),
        None => Ok(()),
    }
}

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> Monoidal for WiringDiagram<B, P, W> {
    fn unit() -> Self::Object {
        vec![]
    }

    fn tensor(&self, other: &Self) -> Self {
        let sources = concat(self.input_ports(), other.input_ports());
        let targets = concat(self.output_ports(), other.output_ports());
        let mut h = WiringDiagram::new(sources, targets);
        h.absorb(self.clone(), 0, 0);
        h.absorb(
            other.clone(),
            self.input_ports().len(),
            self.output_ports().len(),
        );
        h
    }
}

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> SymmetricMonoidal
    for WiringDiagram<B, P, W>
{
    fn twist(a: &Self::Object, b: &Self::Object) -> Self {
        let mut f = WiringDiagram::new(concat(a, b), concat(b, a));
        let (m, n) = (a.len(), b.len());
        for i in 0..m {
            f.push_wire(Wire::between(
                Port::output(INPUT_ID, i),
                Port::input(OUTPUT_ID, n + i),
            ));
        }
        for j in 0..n {
            f.push_wire(Wire::between(
                Port::output(INPUT_ID, m + j),
                Port::input(OUTPUT_ID, j),
            ));
        }
        f
    }
}

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> Cartesian for WiringDiagram<B, P, W> {
    fn mcopy(a: &Self::Object, n: usize) -> Self {
        let mut f = WiringDiagram::new(a.clone(), repeat(a, n));
        for k in 0..n {
            for i in 0..a.len() {
                f.push_wire(Wire::between(
                    Port::output(INPUT_ID, i),
                    Port::input(OUTPUT_ID, k * a.len() + i),
                ));
            }
        }
        f
    }

    fn delete(a: &Self::Object) -> Self {
        WiringDiagram::new(a.clone(), vec![])
    }
}

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> Cocartesian for WiringDiagram<B, P, W> {
    fn mmerge(a: &Self::Object, n: usize) -> Self {
        let mut f = WiringDiagram::new(repeat(a, n), a.clone());
        for k in 0..n {
            for i in 0..a.len() {
                f.push_wire(Wire::between(
                    Port::output(INPUT_ID, k * a.len() + i),
                    Port::input(OUTPUT_ID, i),
                ));
            }
        }
        f
    }

    fn create(a: &Self::Object) -> Self {
        WiringDiagram::new(vec![], a.clone())
    }
}

fn concat<T: Clone>(v1: &[T], v2: &[T]) -> Vec<T> {
    v1.iter().cloned().chain(v2.iter().cloned()).collect()
}

fn repeat<T: Clone>(v: &[T], n: usize) -> Vec<T> {
    (0..n).flat_map(|_| v.iter().cloned()).collect()
}

use core::ops::{BitOr, Shr};

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> Shr<&WiringDiagram<B, P, W>>
    for &WiringDiagram<B, P, W>
{
    type Output = Result<WiringDiagram<B, P, W>, WiringError>;

    fn shr(self, rhs: &WiringDiagram<B, P, W>) -> Self::Output {
        self.compose(rhs)
    }
}

impl<B: Clone, P: Clone + PartialEq, W: Clone + Default> BitOr<&WiringDiagram<B, P, W>>
    for &WiringDiagram<B, P, W>
{
    type Output = WiringDiagram<B, P, W>;

    fn bitor(self, rhs: &WiringDiagram<B, P, W>) -> Self::Output {
        self.tensor(rhs)
    }
}
