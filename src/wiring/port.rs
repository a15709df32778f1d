//! Data types for ports and wires
use core::fmt;

/// Identifies a box within one [`super::WiringDiagram`].
///
/// The two smallest ids are reserved for the boundary pseudo-boxes [`INPUT_ID`] and
/// [`OUTPUT_ID`]; contained boxes are numbered from 2 upwards and ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxId(pub usize);

/// The pseudo-box whose *output* ports are the diagram's input ports.
pub const INPUT_ID: BoxId = BoxId(0);

/// The pseudo-box whose *input* ports are the diagram's output ports.
pub const OUTPUT_ID: BoxId = BoxId(1);

impl BoxId {
    /// The first id handed out to a contained box.
    pub const FIRST: BoxId = BoxId(2);

    pub fn is_boundary(&self) -> bool {
        *self == INPUT_ID || *self == OUTPUT_ID
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PortKind {
    Input,
    Output,
}

impl PortKind {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// A port, addressed by its box, direction and 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Port {
    pub box_id: BoxId,
    pub kind: PortKind,
    pub index: usize,
}

impl Port {
    pub fn new(box_id: BoxId, kind: PortKind, index: usize) -> Self {
        Port {
            box_id,
            kind,
            index,
        }
    }

    pub fn input(box_id: BoxId, index: usize) -> Self {
        Port::new(box_id, PortKind::Input, index)
    }

    pub fn output(box_id: BoxId, index: usize) -> Self {
        Port::new(box_id, PortKind::Output, index)
    }

    /// The same port with its box replaced.
    pub fn with_box(self, box_id: BoxId) -> Self {
        Port { box_id, ..self }
    }
}

/// A directed wire between two ports, carrying a payload `value`.
///
/// Wires always flow from an output port to an input port. Seen from inside a diagram, the
/// diagram's own inputs are outputs of [`INPUT_ID`] and its outputs are inputs of
/// [`OUTPUT_ID`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wire<W> {
    pub value: W,
    pub source: Port,
    pub target: Port,
}

impl<W> Wire<W> {
    pub fn new(value: W, source: Port, target: Port) -> Self {
        Wire {
            value,
            source,
            target,
        }
    }

    /// Rewrite both endpoints with `f`
    pub fn map_ports(self, mut f: impl FnMut(Port) -> Port) -> Self {
        Wire {
            value: self.value,
            source: f(self.source),
            target: f(self.target),
        }
    }
}

impl<W: Default> Wire<W> {
    /// A wire carrying the default payload.
    pub fn between(source: Port, target: Port) -> Self {
        Wire::new(W::default(), source, target)
    }
}
