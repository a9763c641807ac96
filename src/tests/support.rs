//! AST construction helpers standing in for the parser collaborator.

use crate::language::ast::*;
use crate::language::span::Span;

pub(crate) fn sp(line: u32, column: u32) -> Span {
    Span::new(line, column)
}

pub(crate) fn int(value: i64) -> Expr {
    Expr::integer(value, sp(0, 0))
}

pub(crate) fn rat(value: f64) -> Expr {
    Expr::rational(value, sp(0, 0))
}

pub(crate) fn boolean(value: bool) -> Expr {
    if value {
        Expr::True { span: sp(0, 0) }
    } else {
        Expr::False { span: sp(0, 0) }
    }
}

pub(crate) fn var(name: &str) -> Expr {
    Expr::deref(name, sp(0, 0))
}

pub(crate) fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs, sp(0, 0))
}

pub(crate) fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::invoke(name, args, sp(0, 0))
}

pub(crate) fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign(Assign::new(name, value, sp(0, 0)))
}

pub(crate) fn write(expr: Expr) -> Stmt {
    Stmt::Write {
        expr,
        span: sp(0, 0),
    }
}

pub(crate) fn fn_def(
    name: &str,
    params: &[(&str, ScalarType)],
    body: Vec<Stmt>,
    ret: Option<Expr>,
) -> Stmt {
    fn_def_at(name, params, body, ret, sp(0, 0))
}

pub(crate) fn fn_def_at(
    name: &str,
    params: &[(&str, ScalarType)],
    body: Vec<Stmt>,
    ret: Option<Expr>,
    span: Span,
) -> Stmt {
    Stmt::FnDef(FnDef {
        name: name.to_string(),
        params: params
            .iter()
            .map(|(param, ty)| Param::new(*ty, *param, sp(0, 0)))
            .collect(),
        body: Block::new(body),
        ret,
        span,
    })
}

/// `a = 2 + 3` followed by `return a`.
pub(crate) fn sum_program() -> Program {
    Program::with_return(
        vec![assign("a", bin(BinOp::Add, int(2), int(3)))],
        var("a"),
    )
}

/// The recursion workhorse:
/// `fib(n) -> { if (n==0 or n==1) r=n else r=fib(n-1)+fib(n-2); return r }`
/// returning `fib(10)`.
pub(crate) fn fib_program() -> Program {
    let cond = bin(
        BinOp::Or,
        bin(BinOp::Eq, var("n"), int(0)),
        bin(BinOp::Eq, var("n"), int(1)),
    );
    let recurse = bin(
        BinOp::Add,
        call("fib", vec![bin(BinOp::Subtract, var("n"), int(1))]),
        call("fib", vec![bin(BinOp::Subtract, var("n"), int(2))]),
    );
    let body = vec![Stmt::If {
        cond,
        then_block: Block::new(vec![assign("r", var("n"))]),
        else_block: Some(Block::new(vec![assign("r", recurse)])),
        span: sp(0, 0),
    }];
    Program::with_return(
        vec![fn_def("fib", &[("n", ScalarType::Long)], body, Some(var("r")))],
        call("fib", vec![int(10)]),
    )
}

/// Two nesting levels, exercising reference depth and sibling invocation:
/// `p5 = 10; outer(a) -> { inner(b) -> { return b * p5 + a }
/// return inner(3) }; return outer(2)` — evaluates to 32.
pub(crate) fn nested_closure_program() -> Program {
    let inner_ret = bin(
        BinOp::Add,
        bin(BinOp::Times, var("b"), var("p5")),
        var("a"),
    );
    let inner = fn_def("inner", &[("b", ScalarType::Long)], vec![], Some(inner_ret));
    let outer = fn_def(
        "outer",
        &[("a", ScalarType::Long)],
        vec![inner],
        Some(call("inner", vec![int(3)])),
    );
    Program::with_return(
        vec![assign("p5", int(10)), outer],
        call("outer", vec![int(2)]),
    )
}

/// An ancestor invocation: `g` is defined at top level and called from
/// inside `h`, one frame up — evaluates to 10.
pub(crate) fn ancestor_call_program() -> Program {
    let g = fn_def(
        "g",
        &[("x", ScalarType::Long)],
        vec![],
        Some(bin(BinOp::Add, var("x"), int(1))),
    );
    let h = fn_def(
        "h",
        &[("y", ScalarType::Long)],
        vec![],
        Some(bin(BinOp::Times, call("g", vec![var("y")]), int(2))),
    );
    Program::with_return(vec![g, h], call("h", vec![int(4)]))
}

/// `for (i=1; i<10; i=i+1) { write i }` in execution mode.
pub(crate) fn counting_loop_program() -> Program {
    Program::new(vec![Stmt::For {
        init: Assign::new("i", int(1), sp(0, 0)),
        cond: bin(BinOp::Lt, var("i"), int(10)),
        step: Assign::new("i", bin(BinOp::Add, var("i"), int(1)), sp(0, 0)),
        body: Block::new(vec![write(var("i"))]),
        span: sp(0, 0),
    }])
}
