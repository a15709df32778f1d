//! Parse wiring diagrams from GraphML.
use std::collections::HashMap;

use thiserror::Error;

use super::data::*;
use super::xml::{Element, XmlError};
use super::*;
use crate::util::log;
use crate::value::Value;
use crate::wiring::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("expected root element <graphml>, found <{0}>")]
    UnexpectedRoot(String),

    #[error("expected exactly one top-level graph, found {0}")]
    GraphCount(usize),

    #[error("expected exactly one top-level node, found {0}")]
    NodeCount(usize),

    #[error("node {node:?} contains {count} graphs, expected at most one")]
    NestedGraphs { node: String, count: usize },

    #[error("<{element}> is missing attribute {attribute:?}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("unknown attribute type {0:?}")]
    UnknownAttributeType(String),

    #[error("unknown key domain {0:?}")]
    UnknownKeyScope(String),

    #[error("<data> refers to undeclared key {0:?}")]
    UndeclaredKey(String),

    #[error("key {key:?} is declared for {declared} elements, but used on a {used} element")]
    KeyScopeMismatch {
        key: String,
        declared: &'static str,
        used: &'static str,
    },

    #[error("node id {0:?} is used more than once")]
    DuplicateNode(String),

    #[error("cannot parse {text:?} as a value of key {key:?}")]
    InvalidValue { key: String, text: String },

    #[error("invalid port {port:?} on node {node:?}")]
    InvalidPort { node: String, port: String },

    #[error("edge endpoint {node:?} port {port:?} does not exist")]
    UnknownEndpoint { node: String, port: String },

    #[error("could not decode payload: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Wiring(#[from] WiringError),
}

fn required<'a>(element: &'a Element, attribute: &'static str) -> Result<&'a str, ReadError> {
    element
        .attr(attribute)
        .ok_or_else(|| ReadError::MissingAttribute {
            element: element.name.clone(),
            attribute,
        })
}

/// The `<key>` declarations of a document, by id.
struct Keys(HashMap<String, Key>);

impl Keys {
    fn read(doc: &Element) -> Result<Self, ReadError> {
        let mut keys = HashMap::new();
        for el in doc.children_named("key") {
            let id = required(el, "id")?;
            let name = required(el, "attr.name")?;
            let type_name = required(el, "attr.type")?;
            let ty = AttrType::parse(type_name)
                .ok_or_else(|| ReadError::UnknownAttributeType(type_name.to_string()))?;
            let scope_name = el.attr("for").unwrap_or("all");
            let scope = KeyScope::parse(scope_name)
                .ok_or_else(|| ReadError::UnknownKeyScope(scope_name.to_string()))?;
            let default = match el.children_named("default").next() {
                Some(d) => Some(parse_value(id, ty, &d.text)?),
                None => None,
            };
            let key = Key {
                id: id.to_string(),
                name: name.to_string(),
                ty,
                scope,
                default,
            };
            keys.insert(key.id.clone(), key);
        }
        Ok(Keys(keys))
    }

    /// Read the `<data>` children of `element`, filling in declared defaults.
    fn data(&self, element: &Element, scope: KeyScope) -> Result<Properties, ReadError> {
        let mut props = Properties::new();
        for data in element.children_named("data") {
            let id = required(data, "key")?;
            let key = self
                .0
                .get(id)
                .ok_or_else(|| ReadError::UndeclaredKey(id.to_string()))?;
            if !key.scope.covers(scope) {
                return Err(ReadError::KeyScopeMismatch {
                    key: id.to_string(),
                    declared: key.scope.as_str(),
                    used: scope.as_str(),
                });
            }
            props.insert(key.name.clone(), parse_value(id, key.ty, &data.text)?);
        }
        for key in self.0.values() {
            if let (Some(default), true) = (&key.default, key.scope.covers(scope)) {
                props
                    .entry(key.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        Ok(props)
    }
}

fn parse_value(key: &str, ty: AttrType, text: &str) -> Result<Value, ReadError> {
    ty.parse_value(text).ok_or_else(|| ReadError::InvalidValue {
        key: key.to_string(),
        text: text.to_string(),
    })
}

struct Reader<'a> {
    keys: &'a Keys,
}

impl Reader<'_> {
    /// Read the `<port>` children of a node into input and output port values.
    fn ports<P: FromGraphML>(&self, node: &Element) -> Result<(Vec<P>, Vec<P>), ReadError> {
        let node_id = node.attr("id").unwrap_or_default();
        let invalid = |port: &str| ReadError::InvalidPort {
            node: node_id.to_string(),
            port: port.to_string(),
        };

        let mut inputs = vec![];
        let mut outputs = vec![];
        for port in node.children_named("port") {
            let name = required(port, "name")?;
            let (kind, index) = parse_port_name(name).ok_or_else(|| invalid(name))?;

            let mut props = self.keys.data(port, KeyScope::Port)?;
            if let Some(declared) = props.remove(PORTKIND_KEY) {
                let declared = match &declared {
                    Value::String(s) => parse_port_kind(s),
                    _ => None,
                };
                if declared != Some(kind) {
                    return Err(invalid(name));
                }
            }

            let value = P::from_graphml(props)?;
            match kind {
                PortKind::Input => inputs.push((index, value)),
                PortKind::Output => outputs.push((index, value)),
            }
        }

        // Ports may appear in any order, but their indices must be exactly 0..n.
        let dense = |mut ports: Vec<(usize, P)>, kind| {
            ports.sort_by_key(|(i, _)| *i);
            ports
                .into_iter()
                .enumerate()
                .map(|(expected, (i, value))| {
                    if i == expected {
                        Ok(value)
                    } else {
                        Err(invalid(&port_name(kind, i)))
                    }
                })
                .collect::<Result<Vec<P>, ReadError>>()
        };
        let inputs = dense(inputs, PortKind::Input)?;
        let outputs = dense(outputs, PortKind::Output)?;
        Ok((inputs, outputs))
    }

    fn node<B: FromGraphML, P: FromGraphML, W: FromGraphML>(
        &self,
        node: &Element,
    ) -> Result<DiagramBox<B, P, W>, ReadError> {
        let node_id = required(node, "id")?;
        let graphs: Vec<&Element> = node.children_named("graph").collect();
        match graphs.as_slice() {
            [] => {
                let (inputs, outputs) = self.ports(node)?;
                let value = B::from_graphml(self.keys.data(node, KeyScope::Node)?)?;
                Ok(DiagramBox::Atomic(AtomicBox::new(value, inputs, outputs)))
            }
            [graph] => Ok(DiagramBox::Diagram(self.diagram(node, graph)?)),
            _ => Err(ReadError::NestedGraphs {
                node: node_id.to_string(),
                count: graphs.len(),
            }),
        }
    }

    /// Read the diagram represented by `node`, whose contents are in `graph`.
    fn diagram<B: FromGraphML, P: FromGraphML, W: FromGraphML>(
        &self,
        node: &Element,
        graph: &Element,
    ) -> Result<WiringDiagram<B, P, W>, ReadError> {
        let node_id = required(node, "id")?;
        let (inputs, outputs) = self.ports(node)?;
        let mut d = WiringDiagram::new(inputs, outputs);

        let mut ids = HashMap::new();
        for child in graph.children_named("node") {
            let child_id = required(child, "id")?;
            if ids.contains_key(child_id) || child_id == node_id {
                return Err(ReadError::DuplicateNode(child_id.to_string()));
            }
            let b = self.node(child)?;
            ids.insert(child_id, d.add_box(b));
        }

        let resolve = |node: &str, port: &str| -> Result<Port, ReadError> {
            let unknown = || ReadError::UnknownEndpoint {
                node: node.to_string(),
                port: port.to_string(),
            };
            let (kind, index) = parse_port_name(port).ok_or_else(unknown)?;
            if node == node_id {
                // The boundary is seen from the inside: our inputs are outputs of INPUT_ID.
                Ok(match kind {
                    PortKind::Input => Port::output(INPUT_ID, index),
                    PortKind::Output => Port::input(OUTPUT_ID, index),
                })
            } else {
                let id = ids.get(node).ok_or_else(unknown)?;
                Ok(Port::new(*id, kind, index))
            }
        };

        for edge in graph.children_named("edge") {
            let source = resolve(required(edge, "source")?, required(edge, "sourceport")?)?;
            let target = resolve(required(edge, "target")?, required(edge, "targetport")?)?;
            let value = W::from_graphml(self.keys.data(edge, KeyScope::Edge)?)?;
            d.add_wire(Wire::new(value, source, target))?;
        }

        Ok(d)
    }
}

/// Read a wiring diagram from a GraphML document tree.
///
/// The payload types `B`, `P` and `W` of boxes, ports and wires determine how `<data>` is
/// decoded. Reading is all-or-nothing: any structural problem with the document is an error.
pub fn read_graphml<B: FromGraphML, P: FromGraphML, W: FromGraphML>(
    doc: &Element,
) -> Result<WiringDiagram<B, P, W>, ReadError> {
    if doc.name != "graphml" {
        return Err(ReadError::UnexpectedRoot(doc.name.clone()));
    }
    let keys = Keys::read(doc)?;

    let graphs: Vec<&Element> = doc.children_named("graph").collect();
    let [graph] = graphs.as_slice() else {
        return Err(ReadError::GraphCount(graphs.len()));
    };
    let nodes: Vec<&Element> = graph.children_named("node").collect();
    let [node] = nodes.as_slice() else {
        return Err(ReadError::NodeCount(nodes.len()));
    };

    let reader = Reader { keys: &keys };
    let d = match reader.node::<B, P, W>(node)? {
        DiagramBox::Diagram(d) => d,
        // A lone atomic box is read as the diagram wrapping it.
        DiagramBox::Atomic(b) => {
            let mut d = WiringDiagram::new(vec![], vec![]);
            d.add_box(b);
            d
        }
    };
    log::debug!(
        "read GraphML document with {} keys and {} top-level boxes",
        keys.0.len(),
        d.nboxes()
    );
    Ok(d)
}

/// Read a wiring diagram from GraphML text.
pub fn from_graphml_str<B: FromGraphML, P: FromGraphML, W: FromGraphML>(
    text: &str,
) -> Result<WiringDiagram<B, P, W>, ReadError> {
    read_graphml(&Element::parse(text)?)
}
