use std::collections::HashSet;

use proptest::proptest;

use wiring_diagrams::compile::*;
use wiring_diagrams::expr::Hom;
use wiring_diagrams::value::{Symbol, Value};

use crate::strategy::arb_compiled_hom;
use crate::theory::*;

fn vars(names: &[&str]) -> Vec<Var> {
    names.iter().map(|s| Var::from(*s)).collect()
}

fn no_calls(_: &Symbol, _: &[f64]) -> Option<Vec<f64>> {
    None
}

#[test]
fn test_compile_identity() {
    let p = compile(&Hom::<Obj, Value>::id(obs(&["A", "B"]))).unwrap();
    assert!(p.body.is_empty());
    assert_eq!(p.inputs, vars(&["v1", "v2"]));
    assert_eq!(p.outputs, p.inputs);
    assert_eq!(p.eval(&[1.0, 2.0], no_calls), Ok(vec![1.0, 2.0]));
}

#[test_log::test]
fn test_compile_composite() {
    let h = Hom::compose(op("f", ob("A"), ob("B")), op("g", ob("B"), ob("A")));
    let p = compile(&h).unwrap();

    assert_eq!(p.inputs, vars(&["v1"]));
    assert_eq!(p.outputs, vars(&["v4"]));
    assert_eq!(p.body.len(), 2);
    // g reads f's output; its own input name was substituted away.
    assert_eq!(p.body.to_string(), "v2 = f(v1)\nv4 = g(v2)\n");
    assert!(!p.body.mentions(&Var::from("v3")));

    let y = p.eval(&[3.0], |func: &Symbol, args: &[f64]| match func.as_str() {
        "f" => Some(vec![args[0] * 10.0]),
        "g" => Some(vec![args[0] + 1.0]),
        _ => None,
    });
    assert_eq!(y, Ok(vec![31.0]));
    assert_eq!(
        p.eval(&[3.0], no_calls),
        Err(EvalError::UnknownFunction(Symbol::from("f")))
    );
}

#[test]
fn test_compile_copy_then_merge() {
    let a = ob("A");
    let h = Hom::compose(Hom::mcopy(a.clone(), 3), Hom::mmerge(a, 3));
    let p = compile(&h).unwrap();

    // A single sum reading the same input three times. Merging adds, so the composite is
    // multiplication by 3 rather than the identity.
    assert_eq!(p.body.len(), 1);
    assert_eq!(p.body.to_string(), "v5 = v1 + v1 + v1\n");
    assert_eq!(p.eval(&[2.0], no_calls), Ok(vec![6.0]));
}

#[test]
fn test_compile_structural() {
    let braid = compile(&Hom::<Obj, Value>::braid(ob("A"), obs(&["B", "C"]))).unwrap();
    assert!(braid.body.is_empty());
    assert_eq!(braid.outputs, vars(&["v2", "v3", "v1"]));
    assert_eq!(braid.eval(&[1, 2, 3], |_, _| None), Ok(vec![2, 3, 1]));

    let copy = compile(&Hom::<Obj, Value>::mcopy(obs(&["A", "B"]), 2)).unwrap();
    assert_eq!(copy.outputs, vars(&["v1", "v2", "v1", "v2"]));

    let delete = compile(&Hom::<Obj, Value>::delete(ob("A"))).unwrap();
    assert_eq!((delete.inputs.len(), delete.outputs.len()), (1, 0));

    let create = compile(&Hom::<Obj, Value>::create(obs(&["A", "B"]))).unwrap();
    assert_eq!(create.body.to_string(), "(v1, v2) = (0, 0)\n");
    assert_eq!(create.eval(&[], no_calls), Ok(vec![0.0, 0.0]));

    let unit = compile(&Hom::<Obj, Value>::create(obs(&[]))).unwrap();
    assert!(unit.body.is_empty() && unit.outputs.is_empty());
}

#[test]
fn test_compile_linear() {
    let scalar = compile(&Hom::<Obj, Value>::linear(Value::Int(3), ob("A"), ob("A"))).unwrap();
    assert_eq!(scalar.body.to_string(), "v2 = 3 * v1\n");
    assert_eq!(scalar.eval(&[2.5], no_calls), Ok(vec![7.5]));

    let matrix = Hom::<Obj, Value>::linear(Value::symbol("M"), obs(&["A", "A"]), obs(&["A", "A"]));
    let matrix = compile(&matrix).unwrap();
    assert_eq!(matrix.body.to_string(), "(v3, v4) = M * [v1, v2]\n");

    let zero = compile(&Hom::<Obj, Value>::linear(Value::Int(3), obs(&[]), ob("A"))).unwrap();
    assert_eq!(zero.body.to_string(), "v1 = 0\n");
}

#[test]
fn test_compile_constant_generator() {
    let one = Hom::<Obj, Value>::generator(Value::Float(1.5), obs(&[]), ob("A"));
    let p = compile(&one).unwrap();
    assert_eq!(p.body.to_string(), "v1 = 1.5\n");
    assert_eq!(p.eval(&[], no_calls), Ok(vec![1.5]));
}

#[test]
fn test_compile_errors() {
    let bad = Hom::compose(
        op("f", ob("A"), ob("B")),
        op("g", obs(&["B", "B"]), ob("A")),
    );
    assert_eq!(
        compile(&bad),
        Err(CompileError::ArityMismatch {
            outputs: 1,
            inputs: 2
        })
    );

    let empty: Hom<Obj, Value> = Hom::compose_all([]);
    assert_eq!(compile(&empty), Err(CompileError::EmptyComposite));

    let merge = Hom::<Obj, Value>::mmerge(obs(&["A", "B"]), 2);
    assert_eq!(compile(&merge), Err(CompileError::MergeArity(2)));
}

#[test]
fn test_compile_function() {
    let h = Hom::compose(op("f", ob("A"), ob("B")), op("g", ob("B"), ob("A")));

    let def = compile_function(&h, "h", None).unwrap();
    assert_eq!(
        def.to_string(),
        "function h(v1)\n    v2 = f(v1)\n    v4 = g(v2)\n    return v4\nend\n"
    );

    let def = compile_function(&h, "h", Some(vars(&["x"]))).unwrap();
    assert_eq!(def.params, vars(&["x"]));
    assert_eq!(
        def.to_string(),
        "function h(x)\n    v2 = f(x)\n    v4 = g(v2)\n    return v4\nend\n"
    );

    // Several outputs are returned as a tuple.
    let copy = compile_function(&Hom::<Obj, Value>::mcopy(ob("A"), 2), "dup", Some(vars(&["x"])));
    let copy = copy.unwrap();
    assert_eq!(copy.to_string(), "function dup(x)\n    return (x, x)\nend\n");
    assert_eq!(copy.eval(&[4.0], no_calls), Ok(vec![4.0, 4.0]));
}

#[test]
fn test_compile_function_parameters() {
    let h = Hom::compose(op("f", ob("A"), ob("B")), op("g", ob("B"), ob("A")));
    assert_eq!(
        compile_function(&h, "h", Some(vars(&["x", "y"]))),
        Err(CompileError::ArgumentCount {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(
        compile_function(&h, "h", Some(vars(&["v2"]))),
        Err(CompileError::ParameterCapture(Var::from("v2")))
    );

    // Swapping parameter names is a simultaneous renaming, not a capture.
    let swap = Hom::<Obj, Value>::braid(ob("A"), ob("B"));
    let def = compile_function(&swap, "swap", Some(vars(&["v2", "v1"]))).unwrap();
    assert_eq!(def.to_string(), "function swap(v2, v1)\n    return (v1, v2)\nend\n");
    assert_eq!(def.eval(&[1.0, 2.0], no_calls), Ok(vec![2.0, 1.0]));

    // Two inputs can't share one name.
    assert_eq!(
        compile_function(&swap, "swap", Some(vars(&["x", "x"]))),
        Err(CompileError::DuplicateParameter(Var::from("x")))
    );
    assert_eq!(
        compile_function(&swap, "swap", Some(vars(&["v1", "v1"]))),
        Err(CompileError::DuplicateParameter(Var::from("v1")))
    );
}

// Variables read by `x`, in order.
fn reads(x: &Expr, out: &mut Vec<Var>) {
    match x {
        Expr::Var(v) => out.push(v.clone()),
        Expr::Literal(_) => {}
        Expr::Call { args: xs, .. } | Expr::Add(xs) | Expr::Vector(xs) | Expr::Tuple(xs) => {
            xs.iter().for_each(|x| reads(x, out))
        }
        Expr::Mul(a, b) => {
            reads(a, out);
            reads(b, out);
        }
    }
}

// Checks every read is of a defined variable and every variable is assigned once.
fn check_scoping(stmt: &Stmt, defined: &mut HashSet<Var>) {
    match stmt {
        Stmt::Assign { targets, value } => {
            let mut read = vec![];
            reads(value, &mut read);
            for v in read {
                assert!(defined.contains(&v), "{v} read before assignment");
            }
            for v in targets {
                assert!(defined.insert(v.clone()), "{v} assigned twice");
            }
        }
        Stmt::Block(stmts) => stmts.iter().for_each(|s| check_scoping(s, defined)),
        Stmt::Return(_) => panic!("procedures don't return"),
    }
}

proptest! {
    #[test]
    fn test_compile_preserves_arity(f in arb_compiled_hom()) {
        let p = compile(&f).unwrap();
        assert_eq!(p.inputs.len(), f.dom().arity());
        assert_eq!(p.outputs.len(), f.codom().arity());
    }

    #[test]
    fn test_compiled_code_is_well_scoped(f in arb_compiled_hom()) {
        let p = compile(&f).unwrap();

        let mut defined: HashSet<Var> = p.inputs.iter().cloned().collect();
        assert_eq!(defined.len(), p.inputs.len(), "inputs are distinct");
        check_scoping(&p.body, &mut defined);
        for v in &p.outputs {
            assert!(defined.contains(v), "output {v} is never assigned");
        }
    }
}
