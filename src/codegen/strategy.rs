use crate::language::ast::{BinOp, ScalarType, UnOp};

use super::frames::ExprTy;

/// The two interchangeable value-emission policies.
///
/// `Static` resolves literals and operators to native host primitives at
/// generation time; `Dynamic` wraps everything in the tagged `Val` runtime
/// emitted into the generated unit, deferring type errors to execution.
/// Both share the frame/closure machinery unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Static,
    Dynamic,
}

impl Strategy {
    pub(super) fn integer_literal(&self, value: i64) -> (ExprTy, String) {
        match self {
            Strategy::Static => (ExprTy::Long, format!("{value}i64")),
            Strategy::Dynamic => (ExprTy::Dynamic, format!("Val::I({value})")),
        }
    }

    pub(super) fn rational_literal(&self, value: f64) -> (ExprTy, String) {
        match self {
            Strategy::Static => (ExprTy::Rational, format!("{value:?}f64")),
            Strategy::Dynamic => (ExprTy::Dynamic, format!("Val::R({value:?})")),
        }
    }

    pub(super) fn boolean_literal(&self, value: bool) -> (ExprTy, String) {
        match self {
            Strategy::Static => (ExprTy::Boolean, format!("{value}")),
            Strategy::Dynamic => (ExprTy::Dynamic, format!("Val::B({value})")),
        }
    }

    /// Slot type for a declared parameter.
    pub(super) fn param_ty(&self, declared: ScalarType) -> ExprTy {
        match self {
            Strategy::Static => match declared {
                ScalarType::Long => ExprTy::Long,
                ScalarType::Rational => ExprTy::Rational,
                ScalarType::Boolean => ExprTy::Boolean,
            },
            Strategy::Dynamic => ExprTy::Dynamic,
        }
    }

    /// Fixed per-operator template for binary expressions. The static
    /// strategy combines operands with the native operator; the dynamic one
    /// compiles to a named method call on the left operand.
    pub(super) fn binary(&self, op: BinOp, lhs: &str, rhs: &str) -> String {
        match self {
            Strategy::Static => format!("({}) {} ({})", lhs, static_binary_op(op), rhs),
            Strategy::Dynamic => format!("({}).{}({})", lhs, dynamic_binary_method(op), rhs),
        }
    }

    pub(super) fn unary(&self, op: UnOp, operand: &str) -> String {
        match self {
            Strategy::Static => match op {
                UnOp::Not => format!("!({operand})"),
                // Rust has no unary plus; identity.
                UnOp::Plus => format!("({operand})"),
                UnOp::Minus => format!("-({operand})"),
            },
            Strategy::Dynamic => match op {
                UnOp::Not => format!("({operand}).not()"),
                UnOp::Plus => format!("({operand}).plus()"),
                UnOp::Minus => format!("({operand}).minus()"),
            },
        }
    }

    /// Condition expressions under the dynamic strategy are coerced through
    /// the runtime truth test.
    pub(super) fn condition(&self, cond: &str) -> String {
        match self {
            Strategy::Static => cond.to_string(),
            Strategy::Dynamic => format!("({cond}).truth()"),
        }
    }

    /// `write` template; rationals keep their fraction marker.
    pub(super) fn write_stmt(&self, ty: ExprTy, expr: &str) -> String {
        match (self, ty) {
            (Strategy::Static, ExprTy::Rational) => format!("println!(\"{{:?}}\", {expr});\n"),
            _ => format!("println!(\"{{}}\", {expr});\n"),
        }
    }

    /// Scaffolding emitted ahead of the generated functions: lint header,
    /// the C-layout result record, and (dynamic only) the `Val` runtime.
    pub(super) fn preamble(&self) -> String {
        let mut out = String::new();
        out.push_str(ALLOW_HEADER);
        out.push_str(ABI_SOURCE);
        if matches!(self, Strategy::Dynamic) {
            out.push_str(VAL_RUNTIME_SOURCE);
        }
        out
    }

    /// The `extern "C"` entry function calling the root frame under
    /// `catch_unwind` and converting the outcome to the result record.
    pub(super) fn entry_fn(&self, entry_symbol: &str, root_fn: &str, returns: Option<ExprTy>) -> String {
        let ok_arm = match (self, returns) {
            (_, None) => "Ok(_) => __unit_result(),".to_string(),
            (Strategy::Static, Some(ExprTy::Long)) => "Ok(v) => __int_result(v),".to_string(),
            (Strategy::Static, Some(ExprTy::Rational)) => {
                "Ok(v) => __rational_result(v),".to_string()
            }
            (Strategy::Static, Some(ExprTy::Boolean)) => "Ok(v) => __bool_result(v),".to_string(),
            (Strategy::Dynamic, Some(_)) | (Strategy::Static, Some(_)) => {
                // Dynamic results carry their tag at run time. (Static
                // Unknown return types are rejected before rendering.)
                "Ok(v) => match v {\n        Val::I(v) => __int_result(v),\n        Val::R(v) => __rational_result(v),\n        Val::B(v) => __bool_result(v),\n    },"
                    .to_string()
            }
        };
        format!(
            "#[no_mangle]\npub extern \"C\" fn {entry_symbol}() -> RawResult {{\n    \
             std::panic::set_hook(Box::new(|_| {{}}));\n    \
             match std::panic::catch_unwind({root_fn}) {{\n        \
             {ok_arm}\n        \
             Err(e) => __error_result(e),\n    }}\n}}\n"
        )
    }
}

fn static_binary_op(op: BinOp) -> &'static str {
    match op {
        BinOp::Or => "||",
        BinOp::And => "&&",
        BinOp::Eq => "==",
        BinOp::Neq => "!=",
        BinOp::Gte => ">=",
        BinOp::Lte => "<=",
        BinOp::Gt => ">",
        BinOp::Lt => "<",
        BinOp::Add => "+",
        BinOp::Subtract => "-",
        BinOp::Times => "*",
        BinOp::Divide => "/",
    }
}

fn dynamic_binary_method(op: BinOp) -> &'static str {
    match op {
        BinOp::Or => "or",
        BinOp::And => "and",
        BinOp::Eq => "eq",
        BinOp::Neq => "neq",
        BinOp::Gte => "gte",
        BinOp::Lte => "lte",
        BinOp::Gt => "gt",
        BinOp::Lt => "lt",
        BinOp::Add => "add",
        BinOp::Subtract => "subtract",
        BinOp::Times => "multiply",
        BinOp::Divide => "divide",
    }
}

// `unconditional_panic` and `arithmetic_overflow` are deny-by-default;
// without the allow, rustc rejects a constant-foldable `1 / 0` at compile
// time and the deferred arithmetic error never reaches execution.
const ALLOW_HEADER: &str = "#![allow(non_camel_case_types, non_snake_case, unused_mut, \
                            unused_variables, unused_parens, dead_code, unused_imports, \
                            unconditional_panic, arithmetic_overflow)]\n\n";

/// The result record crossing the library boundary, plus its constructors.
/// Mirrored byte-for-byte by `exec::abi::RawResult` on the host side.
const ABI_SOURCE: &str = r#"
#[repr(C)]
pub struct RawResult {
    pub tag: u8,
    pub int_val: i64,
    pub rational_val: f64,
    pub bool_val: u8,
    pub err: *mut std::os::raw::c_char,
}

pub const TAG_UNIT: u8 = 0;
pub const TAG_INT: u8 = 1;
pub const TAG_RATIONAL: u8 = 2;
pub const TAG_BOOL: u8 = 3;
pub const TAG_ERROR: u8 = 4;

fn __blank_result(tag: u8) -> RawResult {
    RawResult { tag, int_val: 0, rational_val: 0.0, bool_val: 0, err: std::ptr::null_mut() }
}

fn __unit_result() -> RawResult {
    __blank_result(TAG_UNIT)
}

fn __int_result(v: i64) -> RawResult {
    let mut r = __blank_result(TAG_INT);
    r.int_val = v;
    r
}

fn __rational_result(v: f64) -> RawResult {
    let mut r = __blank_result(TAG_RATIONAL);
    r.rational_val = v;
    r
}

fn __bool_result(v: bool) -> RawResult {
    let mut r = __blank_result(TAG_BOOL);
    r.bool_val = v as u8;
    r
}

fn __error_result(err: Box<dyn std::any::Any + Send>) -> RawResult {
    let message = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown runtime failure".to_string()
    };
    let mut r = __blank_result(TAG_ERROR);
    r.err = std::ffi::CString::new(message).unwrap_or_default().into_raw();
    r
}
"#;

/// Self-contained dynamic runtime emitted into the generated unit. Kept in
/// lockstep with `runtime::Value`: left-biased coercion, boolean arithmetic
/// panics, Debug formatting for rationals.
const VAL_RUNTIME_SOURCE: &str = r#"
#[derive(Clone, Copy, Debug)]
pub enum Val {
    I(i64),
    R(f64),
    B(bool),
}

impl Default for Val {
    fn default() -> Val {
        Val::I(0)
    }
}

impl Val {
    pub fn truth(self) -> bool {
        match self {
            Val::I(v) => v != 0,
            Val::R(v) => v != 0.0,
            Val::B(v) => v,
        }
    }

    pub fn to_i(self) -> i64 {
        match self {
            Val::I(v) => v,
            Val::R(v) => v as i64,
            Val::B(v) => v as i64,
        }
    }

    pub fn to_r(self) -> f64 {
        match self {
            Val::I(v) => v as f64,
            Val::R(v) => v,
            Val::B(v) => (v as u8) as f64,
        }
    }

    pub fn to_text(self) -> String {
        format!("{}", self)
    }

    pub fn compare(self, other: Val) -> std::cmp::Ordering {
        match self {
            Val::I(v) => v.cmp(&other.to_i()),
            Val::R(v) => v.total_cmp(&other.to_r()),
            Val::B(v) => v.cmp(&other.truth()),
        }
    }

    pub fn add(self, other: Val) -> Val {
        match self {
            Val::I(v) => Val::I(v + other.to_i()),
            Val::R(v) => Val::R(v + other.to_r()),
            Val::B(_) => panic!("cannot add boolean values"),
        }
    }

    pub fn subtract(self, other: Val) -> Val {
        match self {
            Val::I(v) => Val::I(v - other.to_i()),
            Val::R(v) => Val::R(v - other.to_r()),
            Val::B(_) => panic!("cannot subtract boolean values"),
        }
    }

    pub fn multiply(self, other: Val) -> Val {
        match self {
            Val::I(v) => Val::I(v * other.to_i()),
            Val::R(v) => Val::R(v * other.to_r()),
            Val::B(_) => panic!("cannot multiply boolean values"),
        }
    }

    pub fn divide(self, other: Val) -> Val {
        match self {
            Val::I(v) => Val::I(v / other.to_i()),
            Val::R(v) => Val::R(v / other.to_r()),
            Val::B(_) => panic!("cannot divide boolean values"),
        }
    }

    pub fn eq(self, other: Val) -> Val {
        Val::B(self.compare(other) == std::cmp::Ordering::Equal)
    }

    pub fn neq(self, other: Val) -> Val {
        Val::B(self.compare(other) != std::cmp::Ordering::Equal)
    }

    pub fn gt(self, other: Val) -> Val {
        Val::B(self.compare(other) == std::cmp::Ordering::Greater)
    }

    pub fn gte(self, other: Val) -> Val {
        Val::B(self.compare(other) != std::cmp::Ordering::Less)
    }

    pub fn lt(self, other: Val) -> Val {
        Val::B(self.compare(other) == std::cmp::Ordering::Less)
    }

    pub fn lte(self, other: Val) -> Val {
        Val::B(self.compare(other) != std::cmp::Ordering::Greater)
    }

    pub fn and(self, other: Val) -> Val {
        Val::B(self.truth() && other.truth())
    }

    pub fn or(self, other: Val) -> Val {
        Val::B(self.truth() || other.truth())
    }

    pub fn not(self) -> Val {
        Val::B(!self.truth())
    }

    pub fn plus(self) -> Val {
        match self {
            Val::I(v) => Val::I(v),
            Val::R(v) => Val::R(v),
            Val::B(_) => panic!("cannot negate boolean values"),
        }
    }

    pub fn minus(self) -> Val {
        match self {
            Val::I(v) => Val::I(-v),
            Val::R(v) => Val::R(-v),
            Val::B(_) => panic!("cannot negate boolean values"),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::I(v) => write!(f, "{}", v),
            Val::R(v) => write!(f, "{:?}", v),
            Val::B(v) => write!(f, "{}", v),
        }
    }
}
"#;
