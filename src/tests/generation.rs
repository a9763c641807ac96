//! Assertions over emitted source text, without invoking the compiler
//! collaborator.

use super::support::*;
use crate::codegen::{generate, Strategy};
use crate::language::ast::{BinOp, Program};
use crate::language::errors::SemanticError;

fn static_source(program: &Program) -> String {
    generate(program, Strategy::Static).expect("generation")
}

#[test]
fn entry_scaffolding_is_present() {
    let source = static_source(&sum_program());
    assert!(source.contains("#[no_mangle]"));
    assert!(source.contains("pub extern \"C\" fn rill_entry()"));
    assert!(source.contains("fn __main()"));
    assert!(source.contains("std::panic::catch_unwind(__main)"));
}

#[test]
fn lint_header_keeps_constant_panics_compilable() {
    let source = static_source(&sum_program());
    assert!(source.contains("unconditional_panic"));
    assert!(source.contains("arithmetic_overflow"));
}

#[test]
fn reference_two_frames_up_gets_two_indirections() {
    let source = static_source(&nested_closure_program());
    assert!(source.contains("__env.__env.p5"));
    assert!(source.contains("__env.a"));
}

#[test]
fn sibling_invocation_constructs_a_fresh_context() {
    let source = static_source(&nested_closure_program());
    // outer -> inner is a same-frame call: a brand-new record from outer's
    // own slots plus outer's enclosing context.
    assert!(source.contains("inner(outer__env { __env: __env.clone(), a, ..Default::default() }, 3i64)"));
    // __main -> outer likewise, but the entry frame has no parent.
    assert!(source.contains("outer(__main__env { p5, ..Default::default() }, 2i64)"));
}

#[test]
fn ancestor_invocation_reuses_the_existing_context() {
    let source = static_source(&ancestor_call_program());
    assert!(source.contains("g(__env.clone(), y)"));
    // No context is constructed for the upward call.
    assert!(!source.contains("g(__main__env"));
}

#[test]
fn recursion_resolves_one_frame_up() {
    let source = static_source(&fib_program());
    assert!(source.contains("fib(__env.clone(), (n) - (1i64))"));
    assert!(source.contains("fn fib(mut __env: __main__env, mut n: i64) -> i64"));
}

#[test]
fn frames_compile_to_context_records() {
    let source = static_source(&fib_program());
    assert!(source.contains("struct __main__env"));
    assert!(source.contains("struct fib__env"));
    assert!(source.contains("__env: __main__env"));
}

#[test]
fn variables_declare_at_frame_top() {
    let source = static_source(&sum_program());
    assert!(source.contains("let mut a: i64;"));
    assert!(source.contains("a = (2i64) + (3i64);"));
    assert!(source.contains("return a;"));
}

#[test]
fn for_loop_wraps_a_while_with_bare_clauses() {
    let source = static_source(&counting_loop_program());
    assert!(source.contains("i = 1i64;\n"));
    assert!(source.contains("while ((i) < (10i64))"));
    assert!(source.contains("i = (i) + (1i64);\n"));
    // The bare step clause must not double its terminator.
    assert!(!source.contains(";;"));
}

#[test]
fn dynamic_strategy_wraps_literals_and_operators() {
    let source = generate(&sum_program(), Strategy::Dynamic).expect("generation");
    assert!(source.contains("(Val::I(2)).add(Val::I(3))"));
    assert!(source.contains("let mut a: Val;"));
    assert!(source.contains("enum Val"));
}

#[test]
fn dynamic_conditions_coerce_through_truth() {
    let source = generate(&fib_program(), Strategy::Dynamic).expect("generation");
    assert!(source.contains(").truth())"));
    assert!(source.contains("fn fib(mut __env: __main__env, mut n: Val) -> Val"));
}

#[test]
fn dynamic_boolean_literals_are_tagged() {
    let program = Program::with_return(vec![], boolean(true));
    let source = generate(&program, Strategy::Dynamic).expect("generation");
    assert!(source.contains("return Val::B(true);"));
}

#[test]
fn unresolved_reference_reports_name_and_position() {
    let program = Program::new(vec![write(crate::language::ast::Expr::deref(
        "x",
        sp(3, 7),
    ))]);
    let err = generate(&program, Strategy::Static).unwrap_err();
    match err {
        SemanticError::UnresolvedReference { name, span } => {
            assert_eq!(name, "x");
            assert_eq!(span.line, 3);
            assert_eq!(span.column, 7);
        }
        other => panic!("expected unresolved reference, got {other:?}"),
    }
}

#[test]
fn duplicate_sibling_definitions_fail_at_the_second() {
    let first = fn_def("f", &[], vec![], Some(int(1)));
    let second = fn_def_at("f", &[], vec![], Some(int(2)), sp(9, 1));
    let program = Program::new(vec![first, second]);
    let err = generate(&program, Strategy::Static).unwrap_err();
    match err {
        SemanticError::DuplicateDefinition { name, owner, span } => {
            assert_eq!(name, "f");
            assert_eq!(owner, "__main");
            assert_eq!(span.line, 9);
        }
        other => panic!("expected duplicate definition, got {other:?}"),
    }
}

#[test]
fn duplicate_parameter_names_fail() {
    use crate::language::ast::ScalarType;
    let program = Program::new(vec![fn_def(
        "f",
        &[("p", ScalarType::Long), ("p", ScalarType::Long)],
        vec![],
        Some(int(1)),
    )]);
    let err = generate(&program, Strategy::Static).unwrap_err();
    assert!(matches!(err, SemanticError::DuplicateDefinition { .. }));
}

#[test]
fn static_operand_mismatch_is_rejected() {
    let program = Program::with_return(vec![], bin(BinOp::Add, int(2), rat(2.5)));
    let err = generate(&program, Strategy::Static).unwrap_err();
    assert!(matches!(err, SemanticError::TypeMismatch { .. }));
}

#[test]
fn static_retyping_a_variable_is_rejected() {
    let program = Program::new(vec![assign("a", int(1)), assign("a", rat(2.0))]);
    let err = generate(&program, Strategy::Static).unwrap_err();
    assert!(matches!(err, SemanticError::TypeMismatch { .. }));
}

#[test]
fn dynamic_strategy_accepts_heterogeneous_reassignment() {
    let program = Program::new(vec![assign("a", int(1)), assign("a", rat(2.0))]);
    assert!(generate(&program, Strategy::Dynamic).is_ok());
}

#[test]
fn unresolved_call_reports_the_callee() {
    let program = Program::with_return(vec![], call("missing", vec![]));
    let err = generate(&program, Strategy::Static).unwrap_err();
    match err {
        SemanticError::UnresolvedCall { name, .. } => assert_eq!(name, "missing"),
        other => panic!("expected unresolved call, got {other:?}"),
    }
}
