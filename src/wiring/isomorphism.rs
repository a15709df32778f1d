//! Isomorphisms of wiring diagrams
use std::collections::BTreeMap;

use super::diagram::*;
use super::port::*;

impl<B: PartialEq, P: PartialEq, W: PartialEq> WiringDiagram<B, P, W> {
    /// Find an isomorphism of wiring diagrams which preserves the relative order of box ids,
    /// returning `None` if there is none.
    ///
    /// Box ids are assigned in construction order, so this identifies diagrams built (or read)
    /// the same way regardless of which ids were retired along the way. Boxes must agree on
    /// payloads and port values, nested diagrams must be isomorphic, and wires must agree as a
    /// multiset under the relabeling.
    pub fn isomorphism(&self, other: &Self) -> Option<BTreeMap<BoxId, BoxId>> {
        if self.input_ports() != other.input_ports()
            || self.output_ports() != other.output_ports()
            || self.nboxes() != other.nboxes()
            || self.nwires() != other.nwires()
        {
            return None;
        }

        let mut ids = BTreeMap::from([(INPUT_ID, INPUT_ID), (OUTPUT_ID, OUTPUT_ID)]);
        for ((u, b), (v, c)) in self.boxes().zip(other.boxes()) {
            if !same_box(b, c) {
                return None;
            }
            ids.insert(u, v);
        }

        let mut used = vec![false; other.nwires()];
        for w in self.wires() {
            let source = w.source.with_box(ids[&w.source.box_id]);
            let target = w.target.with_box(ids[&w.target.box_id]);
            let found = other.wires().iter().enumerate().position(|(i, x)| {
                !used[i] && x.source == source && x.target == target && x.value == w.value
            })?;
            used[found] = true;
        }

        Some(ids)
    }

    pub fn is_isomorphic(&self, other: &Self) -> bool {
        self.isomorphism(other).is_some()
    }
}

fn same_box<B: PartialEq, P: PartialEq, W: PartialEq>(
    b: &DiagramBox<B, P, W>,
    c: &DiagramBox<B, P, W>,
) -> bool {
    match (b, c) {
        (DiagramBox::Atomic(b), DiagramBox::Atomic(c)) => b == c,
        (DiagramBox::Diagram(b), DiagramBox::Diagram(c)) => b.is_isomorphic(c),
        _ => false,
    }
}
