//! Serialize wiring diagrams to GraphML.
use std::collections::HashMap;

use thiserror::Error;

use super::data::*;
use super::xml::{Element, XmlError};
use super::*;
use crate::util::log;
use crate::value::Value;
use crate::wiring::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WriteError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// All values of one attribute must share the type its key was declared with.
    #[error("attribute {name:?} was declared as {declared} but has a value of type {found}")]
    AttributeType {
        name: String,
        declared: AttrType,
        found: AttrType,
    },
}

/// Formatting options for [`to_graphml_string`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level, or `None` to write everything on one line.
    pub indent: Option<usize>,
    /// Whether to emit an `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// State of a single write pass: the table of attribute keys declared so far.
///
/// Keys are registered on first use. Each `(scope, attribute name)` pair gets a fresh id
/// `d1, d2, ...`, and its type is taken from the first value written for it.
#[derive(Debug, Default)]
pub struct WriteState {
    keys: Vec<Key>,
    index: HashMap<(KeyScope, String), usize>,
}

impl WriteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys registered so far, in order of registration.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    fn key(&mut self, scope: KeyScope, name: &str, value: &Value) -> Result<&Key, WriteError> {
        let i = match self.index.get(&(scope, name.to_string())) {
            Some(&i) => i,
            None => {
                let key = Key {
                    id: format!("d{}", self.keys.len() + 1),
                    name: name.to_string(),
                    ty: AttrType::of(value),
                    scope,
                    default: None,
                };
                log::trace!("registered GraphML key {} for {}:{}", key.id, scope.as_str(), name);
                self.index.insert((scope, name.to_string()), self.keys.len());
                self.keys.push(key);
                self.keys.len() - 1
            }
        };
        let key = &self.keys[i];
        if !key.ty.accepts(value) {
            return Err(WriteError::AttributeType {
                name: name.to_string(),
                declared: key.ty,
                found: AttrType::of(value),
            });
        }
        Ok(key)
    }

    /// Append one `<data>` element per property to `element`.
    fn write_data(
        &mut self,
        element: &mut Element,
        scope: KeyScope,
        props: &Properties,
    ) -> Result<(), WriteError> {
        for (name, value) in props {
            let key = self.key(scope, name, value)?;
            element.push(
                Element::new("data")
                    .with_attr("key", key.id.as_str())
                    .with_text(format_value(value)),
            );
        }
        Ok(())
    }

    fn write_port<P: ToGraphML>(
        &mut self,
        kind: PortKind,
        index: usize,
        value: &P,
    ) -> Result<Element, WriteError> {
        let mut port = Element::new("port").with_attr("name", port_name(kind, index));
        let mut props = Properties::from([(PORTKIND_KEY.to_string(), Value::from(port_kind(kind)))]);
        props.extend(value.to_graphml());
        self.write_data(&mut port, KeyScope::Port, &props)?;
        Ok(port)
    }

    fn write_ports<P: ToGraphML>(
        &mut self,
        node: &mut Element,
        inputs: &[P],
        outputs: &[P],
    ) -> Result<(), WriteError> {
        for (i, p) in inputs.iter().enumerate() {
            let port = self.write_port(PortKind::Input, i, p)?;
            node.push(port);
        }
        for (i, p) in outputs.iter().enumerate() {
            let port = self.write_port(PortKind::Output, i, p)?;
            node.push(port);
        }
        Ok(())
    }

    fn write_box<B: ToGraphML, P: ToGraphML, W: ToGraphML>(
        &mut self,
        node_id: &str,
        b: &DiagramBox<B, P, W>,
    ) -> Result<Element, WriteError> {
        match b {
            DiagramBox::Atomic(b) => {
                let mut node = Element::new("node").with_attr("id", node_id);
                self.write_data(&mut node, KeyScope::Node, &b.value.to_graphml())?;
                self.write_ports(&mut node, &b.input_ports, &b.output_ports)?;
                Ok(node)
            }
            DiagramBox::Diagram(d) => self.write_diagram(node_id, d),
        }
    }

    /// Write `d` as a node with id `node_id` containing a nested graph.
    fn write_diagram<B: ToGraphML, P: ToGraphML, W: ToGraphML>(
        &mut self,
        node_id: &str,
        d: &WiringDiagram<B, P, W>,
    ) -> Result<Element, WriteError> {
        let mut node = Element::new("node").with_attr("id", node_id);
        self.write_ports(&mut node, d.input_ports(), d.output_ports())?;

        let mut graph = Element::new("graph").with_attr("edgedefault", "directed");
        for (id, b) in d.boxes() {
            let child = self.write_box(&child_id(node_id, id), b)?;
            graph.push(child);
        }

        // Boundary ports are named by the enclosing node, with the direction flipped back.
        let endpoint = |port: &Port| -> (String, String) {
            match port.box_id {
                INPUT_ID => (node_id.to_string(), port_name(PortKind::Input, port.index)),
                OUTPUT_ID => (node_id.to_string(), port_name(PortKind::Output, port.index)),
                id => (child_id(node_id, id), port_name(port.kind, port.index)),
            }
        };
        for wire in d.wires() {
            let (source, sourceport) = endpoint(&wire.source);
            let (target, targetport) = endpoint(&wire.target);
            let mut edge = Element::new("edge")
                .with_attr("source", source)
                .with_attr("sourceport", sourceport)
                .with_attr("target", target)
                .with_attr("targetport", targetport);
            self.write_data(&mut edge, KeyScope::Edge, &wire.value.to_graphml())?;
            graph.push(edge);
        }

        node.push(graph);
        Ok(node)
    }
}

/// Write a wiring diagram as a GraphML document tree.
pub fn write_graphml<B: ToGraphML, P: ToGraphML, W: ToGraphML>(
    d: &WiringDiagram<B, P, W>,
) -> Result<Element, WriteError> {
    let mut state = WriteState::new();
    let node = state.write_diagram(ROOT_NODE_ID, d)?;

    let mut doc = Element::new("graphml")
        .with_attr("xmlns", GRAPHML_NS)
        .with_attr("xmlns:xsi", XSI_NS)
        .with_attr("xsi:schemaLocation", SCHEMA_LOCATION);
    for key in state.keys() {
        doc.push(
            Element::new("key")
                .with_attr("id", key.id.as_str())
                .with_attr("for", key.scope.as_str())
                .with_attr("attr.name", key.name.as_str())
                .with_attr("attr.type", key.ty.as_str()),
        );
    }
    doc.push(
        Element::new("graph")
            .with_attr("id", "G")
            .with_attr("edgedefault", "directed")
            .with_child(node),
    );

    log::debug!(
        "wrote GraphML document with {} keys and {} top-level boxes",
        state.keys().len(),
        d.nboxes()
    );
    Ok(doc)
}

/// Write a wiring diagram as GraphML text.
pub fn to_graphml_string<B: ToGraphML, P: ToGraphML, W: ToGraphML>(
    d: &WiringDiagram<B, P, W>,
    options: WriteOptions,
) -> Result<String, WriteError> {
    let doc = write_graphml(d)?;
    Ok(doc.to_xml_string(options.indent, options.declaration)?)
}
