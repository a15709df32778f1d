use std::collections::BTreeMap;

use thiserror::Error;

use super::port::*;
use crate::util::log;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    #[error("box {0} does not exist")]
    UnknownBox(BoxId),

    #[error("port {0:?} does not exist")]
    InvalidPort(Port),

    #[error("wire must flow from an output port to an input port, got {from:?} -> {to:?}")]
    WrongDirection { from: Port, to: Port },

    #[error("box {0} is atomic, not a wiring diagram")]
    NotADiagram(BoxId),

    #[error("box {0} is wired to itself")]
    SelfLoop(BoxId),

    #[error("domain mismatch: codomain has {codomain} ports but domain has {domain}")]
    DomainMismatch { codomain: usize, domain: usize },

    #[error("domain mismatch: codomain and domain differ at port {index}")]
    PortTypeMismatch { index: usize },
}

/// A box with no internal structure: a payload and two fixed-length lists of port values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomicBox<B, P> {
    pub value: B,
    pub input_ports: Vec<P>,
    pub output_ports: Vec<P>,
}

impl<B, P> AtomicBox<B, P> {
    pub fn new(value: B, input_ports: Vec<P>, output_ports: Vec<P>) -> Self {
        AtomicBox {
            value,
            input_ports,
            output_ports,
        }
    }
}

/// A box contained in a [`WiringDiagram`]: either atomic or itself a wiring diagram.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagramBox<B, P, W> {
    Atomic(AtomicBox<B, P>),
    Diagram(WiringDiagram<B, P, W>),
}

impl<B, P, W> DiagramBox<B, P, W> {
    pub fn input_ports(&self) -> &[P] {
        match self {
            DiagramBox::Atomic(b) => &b.input_ports,
            DiagramBox::Diagram(d) => &d.input_ports,
        }
    }

    pub fn output_ports(&self) -> &[P] {
        match self {
            DiagramBox::Atomic(b) => &b.output_ports,
            DiagramBox::Diagram(d) => &d.output_ports,
        }
    }

    pub fn ports(&self, kind: PortKind) -> &[P] {
        match kind {
            PortKind::Input => self.input_ports(),
            PortKind::Output => self.output_ports(),
        }
    }

    // A slice, not a Vec: port values may change but their number may not.
    fn ports_mut(&mut self, kind: PortKind) -> &mut [P] {
        match (self, kind) {
            (DiagramBox::Atomic(b), PortKind::Input) => &mut b.input_ports,
            (DiagramBox::Atomic(b), PortKind::Output) => &mut b.output_ports,
            (DiagramBox::Diagram(d), PortKind::Input) => &mut d.input_ports,
            (DiagramBox::Diagram(d), PortKind::Output) => &mut d.output_ports,
        }
    }

    /// The payload of an atomic box.
    pub fn value(&self) -> Option<&B> {
        match self {
            DiagramBox::Atomic(b) => Some(&b.value),
            DiagramBox::Diagram(_) => None,
        }
    }
}

impl<B, P, W> From<AtomicBox<B, P>> for DiagramBox<B, P, W> {
    fn from(b: AtomicBox<B, P>) -> Self {
        DiagramBox::Atomic(b)
    }
}

impl<B, P, W> From<WiringDiagram<B, P, W>> for DiagramBox<B, P, W> {
    fn from(d: WiringDiagram<B, P, W>) -> Self {
        DiagramBox::Diagram(d)
    }
}

/// A directed, hierarchical port graph representing a morphism.
///
/// The diagram has an outer interface of input and output ports and contains boxes connected by
/// wires. Wires may also attach to the outer interface via the pseudo-boxes [`INPUT_ID`] and
/// [`OUTPUT_ID`]; from the inside, the diagram's inputs are *outputs* of [`INPUT_ID`]:
///
/// ```text
///              ┌──────────────────────────────┐
///   in 0 ──────┤INPUT_ID       ┌───┐  OUTPUT_ID├────── out 0
///              │  (out 0) ─────┤ f ├─── (in 0) │
///              │               └───┘           │
///              └──────────────────────────────┘
/// ```
///
/// Diagrams are built incrementally: [`WiringDiagram::add_box`] hands out fresh, never-reused
/// [`BoxId`]s and [`WiringDiagram::add_wire`] checks that both endpoints exist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WiringDiagram<B, P, W> {
    input_ports: Vec<P>,
    output_ports: Vec<P>,
    boxes: BTreeMap<BoxId, DiagramBox<B, P, W>>,
    wires: Vec<Wire<W>>,
    next_id: usize,
}

impl<B, P, W> WiringDiagram<B, P, W> {
    /// An empty diagram with the given outer interface.
    pub fn new(input_ports: Vec<P>, output_ports: Vec<P>) -> Self {
        WiringDiagram {
            input_ports,
            output_ports,
            boxes: BTreeMap::new(),
            wires: vec![],
            next_id: BoxId::FIRST.0,
        }
    }

    pub fn input_id(&self) -> BoxId {
        INPUT_ID
    }

    pub fn output_id(&self) -> BoxId {
        OUTPUT_ID
    }

    pub fn input_ports(&self) -> &[P] {
        &self.input_ports
    }

    pub fn output_ports(&self) -> &[P] {
        &self.output_ports
    }

    /// Add a box, returning its fresh id.
    pub fn add_box(&mut self, b: impl Into<DiagramBox<B, P, W>>) -> BoxId {
        let id = BoxId(self.next_id);
        self.next_id += 1;
        self.boxes.insert(id, b.into());
        log::trace!("added box {id}");
        id
    }

    pub fn add_boxes<T: Into<DiagramBox<B, P, W>>>(
        &mut self,
        boxes: impl IntoIterator<Item = T>,
    ) -> Vec<BoxId> {
        boxes.into_iter().map(|b| self.add_box(b)).collect()
    }

    pub fn box_(&self, id: BoxId) -> Option<&DiagramBox<B, P, W>> {
        self.boxes.get(&id)
    }

    /// Ids of contained boxes, in increasing order. Excludes the boundary pseudo-boxes.
    pub fn box_ids(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.boxes.keys().copied()
    }

    pub fn boxes(&self) -> impl Iterator<Item = (BoxId, &DiagramBox<B, P, W>)> {
        self.boxes.iter().map(|(id, b)| (*id, b))
    }

    pub fn nboxes(&self) -> usize {
        self.boxes.len()
    }

    /// Ports of kind `kind` on box `id`, as seen from inside this diagram.
    ///
    /// The boundary is flipped: [`INPUT_ID`] has the diagram's input ports as its *outputs*
    /// and no inputs, [`OUTPUT_ID`] has the diagram's output ports as its *inputs*.
    pub fn ports(&self, id: BoxId, kind: PortKind) -> Option<&[P]> {
        match (id, kind) {
            (INPUT_ID, PortKind::Output) => Some(&self.input_ports),
            (OUTPUT_ID, PortKind::Input) => Some(&self.output_ports),
            (INPUT_ID, PortKind::Input) | (OUTPUT_ID, PortKind::Output) => Some(&[]),
            _ => self.boxes.get(&id).map(|b| b.ports(kind)),
        }
    }

    pub fn has_port(&self, port: &Port) -> bool {
        self.port_value(port).is_some()
    }

    pub fn port_value(&self, port: &Port) -> Option<&P> {
        self.ports(port.box_id, port.kind)?.get(port.index)
    }

    /// Replace the value attached to an existing port.
    pub fn set_port_value(&mut self, port: &Port, value: P) -> Result<(), WiringError> {
        let ports: &mut [P] = match (port.box_id, port.kind) {
            (INPUT_ID, PortKind::Output) => &mut self.input_ports,
            (OUTPUT_ID, PortKind::Input) => &mut self.output_ports,
            (INPUT_ID, PortKind::Input) | (OUTPUT_ID, PortKind::Output) => &mut [],
            (id, kind) => self
                .boxes
                .get_mut(&id)
                .ok_or(WiringError::UnknownBox(id))?
                .ports_mut(kind),
        };
        let slot = ports
            .get_mut(port.index)
            .ok_or(WiringError::InvalidPort(*port))?;
        *slot = value;
        Ok(())
    }

    /// Add a wire after checking that it runs from an existing output port to an existing input
    /// port.
    pub fn add_wire(&mut self, wire: Wire<W>) -> Result<(), WiringError> {
        if wire.source.kind != PortKind::Output || wire.target.kind != PortKind::Input {
            return Err(WiringError::WrongDirection {
                from: wire.source,
                to: wire.target,
            });
        }
        for port in [&wire.source, &wire.target] {
            if !self.has_port(port) {
                return Err(WiringError::InvalidPort(*port));
            }
        }
        self.wires.push(wire);
        Ok(())
    }

    pub fn add_wires(&mut self, wires: impl IntoIterator<Item = Wire<W>>) -> Result<(), WiringError> {
        wires.into_iter().try_for_each(|w| self.add_wire(w))
    }

    // Unchecked; only for wires valid by construction.
    pub(crate) fn push_wire(&mut self, wire: Wire<W>) {
        self.wires.push(wire);
    }

    pub fn wires(&self) -> &[Wire<W>] {
        &self.wires
    }

    pub fn nwires(&self) -> usize {
        self.wires.len()
    }

    /// Wires whose target is on box `id`.
    pub fn in_wires(&self, id: BoxId) -> impl Iterator<Item = &Wire<W>> {
        self.wires.iter().filter(move |w| w.target.box_id == id)
    }

    /// Wires whose source is on box `id`.
    pub fn out_wires(&self, id: BoxId) -> impl Iterator<Item = &Wire<W>> {
        self.wires.iter().filter(move |w| w.source.box_id == id)
    }

    /// Remove a box and every wire attached to it. Its id is retired, not reused.
    pub fn rem_box(&mut self, id: BoxId) -> Result<DiagramBox<B, P, W>, WiringError> {
        let b = self.boxes.remove(&id).ok_or(WiringError::UnknownBox(id))?;
        self.wires
            .retain(|w| w.source.box_id != id && w.target.box_id != id);
        log::trace!("removed box {id}");
        Ok(b)
    }

    // Move all boxes and wires of `other` into `self`, shifting its boundary ports by the given
    // offsets. Returns the new ids of `other`'s boxes in order.
    pub(crate) fn absorb(
        &mut self,
        other: WiringDiagram<B, P, W>,
        input_offset: usize,
        output_offset: usize,
    ) -> BTreeMap<BoxId, BoxId> {
        let mut ids = BTreeMap::new();
        for (old, b) in other.boxes {
            ids.insert(old, self.add_box(b));
        }
        let remap = |p: Port| match p.box_id {
            INPUT_ID => Port {
                index: p.index + input_offset,
                ..p
            },
            OUTPUT_ID => Port {
                index: p.index + output_offset,
                ..p
            },
            id => p.with_box(ids[&id]),
        };
        self.wires
            .extend(other.wires.into_iter().map(|w| w.map_ports(remap)));
        ids
    }
}

impl<B, P, W: Clone> WiringDiagram<B, P, W> {
    /// Replace the nested diagram box `id` by its contents.
    ///
    /// Wires crossing the nested boundary are fused with the outer wires attached to the box; the
    /// fused wire keeps the payload of the outer wire on the input side. Returns the new ids of
    /// the inlined boxes, in order.
    pub fn substitute(&mut self, id: BoxId) -> Result<Vec<BoxId>, WiringError> {
        match self.boxes.get(&id) {
            None => return Err(WiringError::UnknownBox(id)),
            Some(DiagramBox::Atomic(_)) => return Err(WiringError::NotADiagram(id)),
            Some(DiagramBox::Diagram(_)) => {}
        }
        if self
            .wires
            .iter()
            .any(|w| w.source.box_id == id && w.target.box_id == id)
        {
            return Err(WiringError::SelfLoop(id));
        }
        let Some(DiagramBox::Diagram(sub)) = self.boxes.remove(&id) else {
            return Err(WiringError::NotADiagram(id));
        };

        let (incident, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.wires)
            .into_iter()
            .partition(|w| w.source.box_id == id || w.target.box_id == id);
        self.wires = kept;
        let incoming: Vec<&Wire<W>> = incident.iter().filter(|w| w.target.box_id == id).collect();
        let outgoing: Vec<&Wire<W>> = incident.iter().filter(|w| w.source.box_id == id).collect();

        let mut ids = BTreeMap::new();
        for (old, b) in sub.boxes {
            ids.insert(old, self.add_box(b));
        }

        for w in sub.wires {
            match (w.source.box_id, w.target.box_id) {
                (INPUT_ID, OUTPUT_ID) => {
                    for inc in incoming.iter().filter(|x| x.target.index == w.source.index) {
                        for out in outgoing.iter().filter(|x| x.source.index == w.target.index) {
                            self.wires
                                .push(Wire::new(inc.value.clone(), inc.source, out.target));
                        }
                    }
                }
                (INPUT_ID, t) => {
                    for inc in incoming.iter().filter(|x| x.target.index == w.source.index) {
                        self.wires.push(Wire::new(
                            inc.value.clone(),
                            inc.source,
                            w.target.with_box(ids[&t]),
                        ));
                    }
                }
                (s, OUTPUT_ID) => {
                    for out in outgoing.iter().filter(|x| x.source.index == w.target.index) {
                        self.wires.push(Wire::new(
                            out.value.clone(),
                            w.source.with_box(ids[&s]),
                            out.target,
                        ));
                    }
                }
                (s, t) => self.wires.push(Wire::new(
                    w.value,
                    w.source.with_box(ids[&s]),
                    w.target.with_box(ids[&t]),
                )),
            }
        }

        log::trace!("substituted box {id} with {} boxes", ids.len());
        Ok(ids.into_values().collect())
    }
}

impl<B, P: Clone, W: Default> WiringDiagram<B, P, W> {
    /// A diagram consisting of a single atomic box wired to the whole outer interface.
    pub fn singleton(value: B, input_ports: Vec<P>, output_ports: Vec<P>) -> Self {
        let mut d = WiringDiagram::new(input_ports.clone(), output_ports.clone());
        let (m, n) = (input_ports.len(), output_ports.len());
        let v = d.add_box(AtomicBox::new(value, input_ports, output_ports));
        d.wires
            .extend((0..m).map(|i| Wire::between(Port::output(INPUT_ID, i), Port::input(v, i))));
        d.wires
            .extend((0..n).map(|j| Wire::between(Port::output(v, j), Port::input(OUTPUT_ID, j))));
        d
    }
}
