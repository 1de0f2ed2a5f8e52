//! End-to-end delegation behavior against the real embedded interpreter.

use krait_delegate::{builtins, import_module, Arg, DelegateError, Delegator, Shortcuts};
use std::sync::Arc;

fn int_value(text: &str) -> Delegator {
    builtins()
        .expect("builtins")
        .attr("int")
        .expect("int builtin")
        .call(&[Arg::from(text)])
        .expect("int() call")
}

fn fresh_dict() -> Delegator {
    builtins()
        .expect("builtins")
        .attr("dict")
        .expect("dict builtin")
        .call(&[])
        .expect("dict() call")
}

#[test]
fn rewrap_closure_preserves_identity() {
    let d = fresh_dict();
    let marker = builtins()
        .unwrap()
        .attr("object")
        .unwrap()
        .call(&[])
        .unwrap();
    d.set_item("k", &marker).unwrap();

    // dict item lookup hands back the very object that was stored; the
    // dispatch result must be a wrapper around that same handle
    let got = d.invoke("[]", &[Arg::from("k")]).unwrap();
    assert!(got.handle().ptr_eq(marker.handle()));
}

#[test]
fn non_handle_results_pass_through_unchanged() {
    assert_eq!(int_value("42").to_text().unwrap(), "42");
    assert_eq!(int_value("42").repr().unwrap(), "42");
    assert!(int_value("42").truthy().unwrap());
    assert!(int_value("0").not_().unwrap());
}

#[test]
fn chained_delegation_is_transparent() {
    let os = import_module("os").unwrap();
    let joined = os
        .attr("path")
        .unwrap()
        .attr("join")
        .unwrap()
        .call(&[Arg::from("a"), Arg::from("b")])
        .unwrap();
    assert!(joined.to_text().unwrap().contains('a'));
    assert!(joined.to_text().unwrap().contains('b'));
}

#[test]
fn exception_fields_are_rewrapped() {
    let zero = int_value("0");
    let err = zero.invoke("/", &[Arg::from(&zero)]).unwrap_err();
    let DelegateError::Foreign(exc) = err else {
        panic!("expected a foreign exception");
    };

    let exc_type = exc.exc_type.expect("exception type");
    let zde = builtins().unwrap().attr("ZeroDivisionError").unwrap();
    assert!(exc_type.handle().ptr_eq(zde.handle()));
    assert!(exc.value.is_some());
    // raised straight out of the operator function, no interpreter frames:
    // the absent traceback must stay absent
    assert!(exc.traceback.is_none());
}

#[test]
fn traceback_is_wrapped_when_present() {
    let b = builtins().unwrap();
    let err = b
        .attr("eval")
        .unwrap()
        .call(&[Arg::from("1/0")])
        .unwrap_err();
    let DelegateError::Foreign(exc) = err else {
        panic!("expected a foreign exception");
    };
    let traceback = exc.traceback.expect("traceback from evaluated frame");

    // the rewrapped traceback is an ordinary wrapped value; keep delegating
    let formatted = import_module("traceback")
        .unwrap()
        .attr("format_tb")
        .unwrap()
        .call(&[Arg::from(&traceback)])
        .unwrap();
    assert!(formatted.to_text().unwrap().contains("<string>"));
}

#[test]
fn missing_member_is_reclassified() {
    let obj = builtins()
        .unwrap()
        .attr("object")
        .unwrap()
        .call(&[])
        .unwrap();
    let err = obj.invoke("definitely_not_there", &[]).unwrap_err();
    match err {
        DelegateError::NoSuchMember { member, receiver } => {
            assert_eq!(member, "definitely_not_there");
            assert_eq!(receiver, "Delegator");
        }
        other => panic!("expected NoSuchMember, got {:?}", other),
    }
}

#[test]
fn non_attribute_errors_are_not_reclassified() {
    let zero = int_value("0");
    let err = zero.invoke("/", &[Arg::from(&zero)]).unwrap_err();
    assert!(matches!(err, DelegateError::Foreign(_)));
}

#[test]
fn subscript_set_enforces_arity() {
    let d = fresh_dict();

    for args in [
        vec![],
        vec![Arg::from("k")],
        vec![Arg::from("k"), Arg::from(1), Arg::from(2)],
    ] {
        match d.invoke("[]=", &args).unwrap_err() {
            DelegateError::WrongArity { got, expected } => {
                assert_eq!(got, args.len());
                assert_eq!(expected, 2);
            }
            other => panic!("expected WrongArity, got {:?}", other),
        }
    }

    d.invoke("[]=", &[Arg::from("k"), Arg::from(5)]).unwrap();
    assert_eq!(d.get_item("k").unwrap().to_text().unwrap(), "5");
}

#[test]
fn subscript_get_enforces_arity() {
    let d = fresh_dict();
    match d.invoke("[]", &[]).unwrap_err() {
        DelegateError::WrongArity { got, expected } => {
            assert_eq!(got, 0);
            assert_eq!(expected, 1);
        }
        other => panic!("expected WrongArity, got {:?}", other),
    }
}

#[test]
fn comparison_operators_round_trip() {
    let a = int_value("42");
    let b = int_value("32");

    let check = |op: &str| a.invoke(op, &[Arg::from(&b)]).unwrap().truthy().unwrap();
    assert!(!check("<"));
    assert!(!check("<="));
    assert!(!check("=="));
    assert!(check(">"));
    assert!(check(">="));
    assert!(a.ne(&b).unwrap());
}

#[test]
fn equality_and_inequality_agree() {
    let a = int_value("42");
    let same = int_value("42");
    let other = int_value("32");

    assert!(a.eq(&same).unwrap());
    assert!(!a.ne(&same).unwrap());
    assert!(!a.eq(&other).unwrap());
    assert!(a.ne(&other).unwrap());
}

#[test]
fn arithmetic_and_unary_operators() {
    let a = int_value("42");
    let b = int_value("32");

    assert_eq!(a.invoke("+", &[Arg::from(&b)]).unwrap().to_text().unwrap(), "74");
    assert_eq!(a.invoke("-", &[Arg::from(&b)]).unwrap().to_text().unwrap(), "10");
    assert_eq!(a.invoke("%", &[Arg::from(&b)]).unwrap().to_text().unwrap(), "10");
    assert_eq!(a.invoke("-@", &[]).unwrap().to_text().unwrap(), "-42");
    assert_eq!(a.invoke("+@", &[]).unwrap().to_text().unwrap(), "42");
    assert_eq!(a.invoke("~", &[]).unwrap().to_text().unwrap(), "-43");
    assert_eq!(
        int_value("2")
            .invoke("**", &[Arg::from(10)])
            .unwrap()
            .to_text()
            .unwrap(),
        "1024"
    );
}

#[test]
fn string_operators_delegate() {
    let s = builtins()
        .unwrap()
        .attr("str")
        .unwrap()
        .call(&[Arg::from("ab")])
        .unwrap();
    assert_eq!(s.invoke("+", &[Arg::from(&s)]).unwrap().to_text().unwrap(), "abab");
    assert_eq!(
        s.invoke("*", &[Arg::from(3)]).unwrap().to_text().unwrap(),
        "ababab"
    );
}

#[test]
fn three_way_comparison() {
    let a = int_value("42");
    let b = int_value("32");
    assert_eq!(a.invoke("<=>", &[Arg::from(&b)]).unwrap().to_text().unwrap(), "1");
    assert_eq!(b.invoke("<=>", &[Arg::from(&a)]).unwrap().to_text().unwrap(), "-1");
    assert_eq!(a.invoke("<=>", &[Arg::from(&a)]).unwrap().to_text().unwrap(), "0");
}

#[test]
fn containment_test() {
    let lst = builtins()
        .unwrap()
        .attr("list")
        .unwrap()
        .call(&[])
        .unwrap();
    lst.invoke("append", &[Arg::from(2)]).unwrap();
    assert!(lst.invoke("in", &[Arg::from(2)]).unwrap().truthy().unwrap());
    assert!(!lst.invoke("in", &[Arg::from(9)]).unwrap().truthy().unwrap());
}

#[test]
fn bare_access_returns_the_callable_itself() {
    let s = builtins()
        .unwrap()
        .attr("str")
        .unwrap()
        .call(&[Arg::from("hi")])
        .unwrap();

    let bare = s.invoke("ljust", &[]).unwrap();
    let callable = builtins().unwrap().attr("callable").unwrap();
    assert!(callable.call(&[Arg::from(&bare)]).unwrap().truthy().unwrap());

    // the bare result is the bound method, so calling it later still works
    assert_eq!(bare.call(&[Arg::from(4)]).unwrap().to_text().unwrap(), "hi  ");
    // one argument invokes instead of returning the member
    assert_eq!(
        s.invoke("ljust", &[Arg::from(4)]).unwrap().to_text().unwrap(),
        "hi  "
    );
}

#[test]
fn keyword_builder_populates_by_side_effect() {
    let dict_ctor = builtins().unwrap().attr("dict").unwrap();
    let d = dict_ctor
        .call_kw(&[], |kw| {
            kw.set("foo", "a value")?;
            kw.set("bar", 7)?;
            Ok(())
        })
        .unwrap();

    let len = builtins()
        .unwrap()
        .attr("len")
        .unwrap()
        .call(&[Arg::from(&d)])
        .unwrap();
    assert_eq!(len.to_text().unwrap(), "2");
    assert_eq!(d.get_item("foo").unwrap().to_text().unwrap(), "a value");
    assert_eq!(d.get_item("bar").unwrap().to_text().unwrap(), "7");
}

#[test]
fn keyword_call_carries_positionals_alongside() {
    let lst = builtins()
        .unwrap()
        .attr("list")
        .unwrap()
        .call(&[])
        .unwrap();
    for n in [3, 1, 2] {
        lst.invoke("append", &[Arg::from(n)]).unwrap();
    }

    let sorted = builtins()
        .unwrap()
        .invoke_kw("sorted", &[Arg::from(&lst)], |kw| kw.set("reverse", true))
        .unwrap();
    assert_eq!(sorted.to_text().unwrap(), "[3, 2, 1]");
}

#[test]
fn assignment_style_names_bind_attributes() {
    let ns = import_module("types")
        .unwrap()
        .attr("SimpleNamespace")
        .unwrap()
        .call(&[])
        .unwrap();

    ns.invoke("label=", &[Arg::from("bound")]).unwrap();
    assert_eq!(ns.attr("label").unwrap().to_text().unwrap(), "bound");

    ns.set_attr("count", 5).unwrap();
    assert_eq!(ns.attr("count").unwrap().to_text().unwrap(), "5");

    match ns.invoke("label=", &[]).unwrap_err() {
        DelegateError::WrongArity { got, expected } => {
            assert_eq!(got, 0);
            assert_eq!(expected, 1);
        }
        other => panic!("expected WrongArity, got {:?}", other),
    }
}

#[test]
fn isolated_registries_work() {
    let sc = Arc::new(Shortcuts::resolve().expect("registry"));
    let hello = krait_embed::unicode("hello").expect("foreign string");
    let d = Delegator::with_registry(hello, Arc::clone(&sc));

    let upper = d.attr("upper").unwrap().call(&[]).unwrap();
    assert_eq!(upper.to_text().unwrap(), "HELLO");

    // the registry's own builtin lookup works standalone too
    let int_fn = sc.builtin("int").expect("int via registry");
    let n = Delegator::with_registry(int_fn, Arc::clone(&sc))
        .call(&[Arg::from("7")])
        .unwrap();
    assert_eq!(n.to_text().unwrap(), "7");
}

#[test]
fn wrap_uses_the_global_registry() {
    let hello = krait_embed::unicode("hello").expect("foreign string");
    let d = Delegator::wrap(hello).expect("wrap");
    assert_eq!(d.to_text().unwrap(), "hello");
}
