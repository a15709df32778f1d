use wiring_diagrams::graphml::*;
use wiring_diagrams::value::Value;
use wiring_diagrams::wiring::*;

use crate::theory::*;

// One box `f : A → B` between the boundaries; ports listed out of order, no portkind data.
const HAND_WRITTEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="k0" for="node" attr.name="value" attr.type="string"/>
  <key id="k1" for="port" attr.name="value" attr.type="string">
    <default>A</default>
  </key>
  <graph id="G" edgedefault="directed">
    <node id="outer">
      <port name="out:1"><data key="k1">B</data></port>
      <port name="in:1"/>
      <graph id="G2" edgedefault="directed">
        <node id="box">
          <data key="k0">f</data>
          <port name="out:1"><data key="k1">B</data></port>
          <port name="in:1"/>
        </node>
        <edge source="outer" sourceport="in:1" target="box" targetport="in:1"/>
        <edge source="box" sourceport="out:1" target="outer" targetport="out:1"/>
      </graph>
    </node>
  </graph>
</graphml>"#;

#[test]
fn test_read_hand_written() {
    let d: Diagram = from_graphml_str(HAND_WRITTEN).unwrap();

    // Missing port data falls back to the key default.
    assert_eq!(d.input_ports(), &[Obj::from("A")]);
    assert_eq!(d.output_ports(), &[Obj::from("B")]);

    let expected = Diagram::singleton("f".into(), vec!["A".into()], vec!["B".into()]);
    assert!(d.is_isomorphic(&expected));
}

#[test]
fn test_read_properties_and_integer_types() {
    let text = r#"<graphml>
      <key id="a" for="all" attr.name="weight" attr.type="int"><default>7</default></key>
      <key id="b" for="node" attr.name="label" attr.type="string"/>
      <key id="c" for="edge" attr.name="on" attr.type="boolean"/>
      <graph>
        <node id="n">
          <graph>
            <node id="x"><data key="b">hello</data><data key="a">-2</data></node>
            <node id="y"/>
          </graph>
        </node>
      </graph>
    </graphml>"#;
    let d: WiringDiagram<Properties, Properties, Properties> = from_graphml_str(text).unwrap();

    let values: Vec<_> = d.boxes().filter_map(|(_, b)| b.value().cloned()).collect();
    assert_eq!(
        values,
        vec![
            Properties::from([
                ("label".to_string(), Value::from("hello")),
                ("weight".to_string(), Value::Int(-2)),
            ]),
            Properties::from([("weight".to_string(), Value::Int(7))]),
        ]
    );
}

#[test]
fn test_read_single_atomic_node() {
    let text = r#"<graphml>
      <key id="d0" for="node" attr.name="value" attr.type="string"/>
      <graph><node id="n"><data key="d0">f</data></node></graph>
    </graphml>"#;
    let d: WiringDiagram<Gen, Obj, ()> = from_graphml_str(text).unwrap();
    assert_eq!(d.nboxes(), 1);
    assert_eq!(d.nwires(), 0);
}

#[test]
fn test_read_element_tree() {
    let doc = Element::parse(HAND_WRITTEN).unwrap();
    let d: Diagram = read_graphml(&doc).unwrap();
    assert_eq!(d.nboxes(), 1);

    // Reading is independent of where the tree came from.
    let rewritten = Element::parse(&doc.to_xml_string(None, false).unwrap()).unwrap();
    assert_eq!(rewritten, doc);
}
