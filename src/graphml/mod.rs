//! GraphML serialization of wiring diagrams.
//!
//! A [`WiringDiagram`](crate::wiring::WiringDiagram) is written as a hierarchical GraphML graph:
//! the root `<graph>` contains exactly one `<node>` standing for the diagram itself, which
//! contains a nested `<graph>` with one `<node>` per box (recursively, for nested diagrams) and
//! one `<edge>` per wire.
//!
//! ```xml
//! <graphml xmlns="http://graphml.graphdrawing.org/xmlns">
//!   <key id="d1" for="port" attr.name="portkind" attr.type="string"/>
//!   <key id="d2" for="node" attr.name="value" attr.type="string"/>
//!   <graph id="G" edgedefault="directed">
//!     <node id="n">
//!       <port name="in:1"><data key="d1">input</data></port>
//!       <port name="out:1"><data key="d1">output</data></port>
//!       <graph edgedefault="directed">
//!         <node id="n:n2">
//!           <data key="d2">f</data>
//!           <port name="in:1"><data key="d1">input</data></port>
//!           <port name="out:1"><data key="d1">output</data></port>
//!         </node>
//!         <edge source="n" sourceport="in:1" target="n:n2" targetport="in:1"/>
//!         <edge source="n:n2" sourceport="out:1" target="n" targetport="out:1"/>
//!       </graph>
//!     </node>
//!   </graph>
//! </graphml>
//! ```
//!
//! Port names are 1-based. Wires attached to the boundary of a diagram name the node of that
//! diagram. Payloads of boxes, ports and wires are converted to `<data>` attributes with
//! [`ToGraphML`] and recovered with [`FromGraphML`].
pub mod data;
pub mod read;
pub mod write;
pub mod xml;

pub use data::{FromGraphML, Properties, ToGraphML};
pub use read::{from_graphml_str, read_graphml, ReadError};
pub use write::{to_graphml_string, write_graphml, WriteError, WriteOptions, WriteState};
pub use xml::{Element, XmlError};

use crate::wiring::{BoxId, PortKind};

pub const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// Reserved port attribute recording the direction of a port.
pub const PORTKIND_KEY: &str = "portkind";

const ROOT_NODE_ID: &str = "n";

fn port_kind(kind: PortKind) -> &'static str {
    match kind {
        PortKind::Input => "input",
        PortKind::Output => "output",
    }
}

fn parse_port_kind(s: &str) -> Option<PortKind> {
    match s {
        "input" => Some(PortKind::Input),
        "output" => Some(PortKind::Output),
        _ => None,
    }
}

/// `in:1`, `out:3`, ... from a 0-based index.
fn port_name(kind: PortKind, index: usize) -> String {
    match kind {
        PortKind::Input => format!("in:{}", index + 1),
        PortKind::Output => format!("out:{}", index + 1),
    }
}

/// Inverse of [`port_name`].
fn parse_port_name(name: &str) -> Option<(PortKind, usize)> {
    let (kind, index) = name.split_once(':')?;
    let kind = match kind {
        "in" => PortKind::Input,
        "out" => PortKind::Output,
        _ => return None,
    };
    let index: usize = index.parse().ok()?;
    Some((kind, index.checked_sub(1)?))
}

fn child_id(parent: &str, id: BoxId) -> String {
    format!("{parent}:n{}", id.0)
}
