//! End-to-end lifecycle tests. These shell out to the external compiler
//! collaborator and map real artifacts, so they are slower than the rest
//! of the suite.

use tempfile::TempDir;

use super::support::*;
use crate::codegen::{generate, Strategy};
use crate::exec::error::ExecError;
use crate::exec::ExecutionHost;
use crate::language::ast::{BinOp, Program};
use crate::runtime::error::RuntimeError;
use crate::{Engine, EngineError, Value};

fn engine(strategy: Strategy) -> (Engine, TempDir) {
    let scratch = TempDir::new().expect("scratch dir");
    (Engine::with_scratch(strategy, scratch.path()), scratch)
}

fn evaluate(strategy: Strategy, program: &Program) -> Option<Value> {
    let (mut engine, _scratch) = engine(strategy);
    engine.evaluate(program).expect("evaluation")
}

#[test]
fn sum_evaluates_to_five_statically() {
    assert_eq!(
        evaluate(Strategy::Static, &sum_program()),
        Some(Value::Integer(5))
    );
}

#[test]
fn sum_evaluates_to_five_dynamically() {
    assert_eq!(
        evaluate(Strategy::Dynamic, &sum_program()),
        Some(Value::Integer(5))
    );
}

#[test]
fn fib_of_ten_is_fifty_five_statically() {
    assert_eq!(
        evaluate(Strategy::Static, &fib_program()),
        Some(Value::Integer(55))
    );
}

#[test]
fn fib_of_ten_is_fifty_five_dynamically() {
    assert_eq!(
        evaluate(Strategy::Dynamic, &fib_program()),
        Some(Value::Integer(55))
    );
}

#[test]
fn nested_closures_see_outer_slots() {
    assert_eq!(
        evaluate(Strategy::Static, &nested_closure_program()),
        Some(Value::Integer(32))
    );
}

#[test]
fn ancestor_calls_climb_the_frame_chain() {
    assert_eq!(
        evaluate(Strategy::Static, &ancestor_call_program()),
        Some(Value::Integer(10))
    );
}

#[test]
fn execution_mode_yields_no_value() {
    assert_eq!(evaluate(Strategy::Static, &counting_loop_program()), None);
}

#[test]
fn rational_results_cross_the_boundary() {
    let program = Program::with_return(vec![], bin(BinOp::Add, rat(2.5), rat(0.5)));
    assert_eq!(
        evaluate(Strategy::Static, &program),
        Some(Value::Rational(3.0))
    );
}

#[test]
fn boolean_results_cross_the_boundary() {
    let program = Program::with_return(vec![], bin(BinOp::Lt, int(2), int(3)));
    assert_eq!(
        evaluate(Strategy::Dynamic, &program),
        Some(Value::Boolean(true))
    );
}

#[test]
fn division_by_zero_surfaces_as_a_runtime_error() {
    let program = Program::with_return(
        vec![assign("a", int(0))],
        bin(BinOp::Divide, int(1), var("a")),
    );
    let (mut engine, _scratch) = engine(Strategy::Static);
    let err = engine.evaluate(&program).unwrap_err();
    match err {
        EngineError::Exec(ExecError::Runtime(RuntimeError::Panic { message })) => {
            assert!(message.contains("divide by zero"), "got: {message}");
        }
        other => panic!("expected a runtime panic, got {other:?}"),
    }
}

#[test]
fn constant_division_by_zero_still_defers_to_run_time() {
    // rustc can const-propagate `1 / 0`; the generated unit must still
    // compile and panic when invoked, not be rejected by the lint pass.
    let program = Program::with_return(vec![], bin(BinOp::Divide, int(1), int(0)));
    let (mut engine, _scratch) = engine(Strategy::Static);
    let err = engine.evaluate(&program).unwrap_err();
    match err {
        EngineError::Exec(ExecError::Runtime(RuntimeError::Panic { message })) => {
            assert!(message.contains("divide by zero"), "got: {message}");
        }
        other => panic!("expected a runtime panic, got {other:?}"),
    }
}

#[test]
fn dynamic_boolean_arithmetic_panics_at_runtime() {
    let program = Program::with_return(vec![], bin(BinOp::Add, boolean(true), int(1)));
    let (mut engine, _scratch) = engine(Strategy::Dynamic);
    let err = engine.evaluate(&program).unwrap_err();
    match err {
        EngineError::Exec(ExecError::Runtime(RuntimeError::Panic { message })) => {
            assert!(message.contains("cannot add boolean values"), "got: {message}");
        }
        other => panic!("expected a runtime panic, got {other:?}"),
    }
}

#[test]
fn identical_program_runs_twice_under_fresh_names() {
    let (mut engine, _scratch) = engine(Strategy::Static);
    assert_eq!(
        engine.evaluate(&sum_program()).expect("first run"),
        Some(Value::Integer(5))
    );
    assert_eq!(
        engine.evaluate(&sum_program()).expect("second run"),
        Some(Value::Integer(5))
    );
}

#[test]
fn recompiling_a_unit_serves_the_new_code() {
    let scratch = TempDir::new().expect("scratch dir");
    let mut host = ExecutionHost::new(scratch.path());

    let v1 = generate(&Program::with_return(vec![], int(1)), Strategy::Static)
        .expect("generation");
    let v2 = generate(&Program::with_return(vec![], int(2)), Strategy::Static)
        .expect("generation");

    let gen1 = host.compile("unit", &v1).expect("compile v1");
    host.load("unit", gen1).expect("load v1");
    assert_eq!(host.invoke("unit").expect("invoke v1"), Some(Value::Integer(1)));
    assert!(host.unload("unit"));

    let gen2 = host.compile("unit", &v2).expect("compile v2");
    assert!(gen2 > gen1);
    host.load("unit", gen2).expect("load v2");
    assert_eq!(host.invoke("unit").expect("invoke v2"), Some(Value::Integer(2)));
    assert!(host.unload("unit"));

    // The superseded artifact can no longer be mapped.
    match host.load("unit", gen1).unwrap_err() {
        ExecError::StaleGeneration {
            requested, latest, ..
        } => {
            assert_eq!(requested, gen1);
            assert_eq!(latest, gen2);
        }
        other => panic!("expected a stale generation, got {other:?}"),
    }
}
