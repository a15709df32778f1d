use proptest::proptest;

use wiring_diagrams::category::*;
use wiring_diagrams::expr::{ExprError, Hom, Ob};
use wiring_diagrams::wiring::build::{build, BuildError};
use wiring_diagrams::wiring::*;

use crate::strategy::{arb_composable, arb_hom};
use crate::theory::*;

#[test_log::test]
fn test_build_composite_example() {
    let d = build(&Hom::compose(f(), g())).unwrap();

    assert_eq!(d.input_ports(), &[Obj::from("A")]);
    assert_eq!(d.output_ports(), &[Obj::from("A")]);
    assert_eq!(d.nboxes(), 2);
    assert_eq!(d.nwires(), 3);

    let labels: Vec<_> = d.boxes().filter_map(|(_, b)| b.value().cloned()).collect();
    assert_eq!(labels, vec![Gen::from("f"), Gen::from("g")]);

    // exactly one wire between the two boxes
    let internal = d
        .wires()
        .iter()
        .filter(|w| !w.source.box_id.is_boundary() && !w.target.box_id.is_boundary())
        .count();
    assert_eq!(internal, 1);
}

#[test]
fn test_build_generator() {
    let h = gen("h", obs(&["A", "B"]), ob("C"));
    let d = build(&h).unwrap();
    let expected = Diagram::singleton("h".into(), vec!["A".into(), "B".into()], vec!["C".into()]);
    assert_eq!(d, expected);
    assert_eq!(d.nwires(), 3);
}

#[test]
fn test_build_structural_morphisms() {
    let a = ob("A");
    let cases: Vec<(Hom<Obj, Gen>, usize, usize, usize)> = vec![
        (Hom::id(obs(&["A", "B"])), 2, 2, 2),
        (Hom::braid(ob("A"), obs(&["B", "C"])), 3, 3, 3),
        (Hom::mcopy(a.clone(), 2), 1, 2, 2),
        (Hom::delete(a.clone()), 1, 0, 0),
        (Hom::mmerge(a.clone(), 3), 3, 1, 3),
        (Hom::create(a.clone()), 0, 1, 0),
        (Hom::linear("M", a.clone(), obs(&["A", "A"])), 1, 2, 3),
    ];
    for (f, inputs, outputs, wires) in cases {
        let d = build(&f).unwrap();
        assert_eq!(d.input_ports().len(), inputs, "{f:?}");
        assert_eq!(d.output_ports().len(), outputs, "{f:?}");
        assert_eq!(d.nwires(), wires, "{f:?}");
    }
}

#[test]
fn test_build_errors() {
    let ill_typed = Hom::compose(f(), f());
    assert_eq!(
        build(&ill_typed),
        Err(BuildError::Wiring(WiringError::PortTypeMismatch { index: 0 }))
    );

    let empty: Hom<Obj, Gen> = Hom::compose_all([]);
    assert_eq!(build(&empty), Err(BuildError::EmptyComposite));

    // A tensor factor which is itself an unnormalized product.
    let nested = Ob::Otimes(vec![ob("A"), Ob::Otimes(vec![ob("B"), ob("C")])]);
    assert_eq!(
        build(&Hom::<Obj, Gen>::id(nested)),
        Err(BuildError::Object(ExprError::NonFlatObject))
    );

    // An empty tensor is the identity on the unit.
    let unit: Hom<Obj, Gen> = Hom::otimes_all([]);
    assert_eq!(build(&unit), Ok(Diagram::identity(&vec![])));
}

proptest! {
    #[test]
    fn test_build_preserves_type(f in arb_hom()) {
        let d = build(&f).unwrap();
        assert_eq!(d.input_ports(), f.dom().ports().unwrap());
        assert_eq!(d.output_ports(), f.codom().ports().unwrap());

        // every wire is valid and flows output → input
        for w in d.wires() {
            assert_eq!(w.source.kind, PortKind::Output);
            assert_eq!(w.target.kind, PortKind::Input);
            assert!(d.has_port(&w.source));
            assert!(d.has_port(&w.target));
        }
    }

    #[test]
    fn test_composition_associative(fgh in arb_composable(3)) {
        let [f, g, h] = fgh.as_slice() else { panic!("arb_composable returned unexpected size result") };
        let (f, g, h) = (build(f).unwrap(), build(g).unwrap(), build(h).unwrap());

        let x = (&(&f >> &g).unwrap() >> &h).unwrap();
        let y = (&f >> &(&g >> &h).unwrap()).unwrap();
        assert!(x.is_isomorphic(&y));
    }

    #[test]
    fn test_identity_law(f in arb_hom()) {
        let d = build(&f).unwrap();
        let id_a = Diagram::identity(&d.source());
        let id_b = Diagram::identity(&d.target());

        assert!((&id_a >> &d).unwrap().is_isomorphic(&d));
        assert!((&d >> &id_b).unwrap().is_isomorphic(&d));
    }

    #[test]
    fn test_build_is_functorial(fg in arb_composable(2)) {
        let [f, g] = fg.as_slice() else { panic!("arb_composable returned unexpected size result") };
        let whole = build(&Hom::compose(f.clone(), g.clone())).unwrap();
        let parts = (&build(f).unwrap() >> &build(g).unwrap()).unwrap();
        assert!(whole.is_isomorphic(&parts));
    }
}
