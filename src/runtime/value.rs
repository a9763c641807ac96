use std::cmp::Ordering;
use std::fmt;

/// The dynamic runtime value: a closed tagged variant over the three
/// primitive types the language knows about.
///
/// The operation set is total over this closed set and left-biased: the
/// left operand's variant decides the result variant and the right operand
/// is coerced to it. This mirrors the runtime emitted into generated units
/// under the dynamic strategy, and is what `invoke` hands back to callers.
///
/// Arithmetic on a Boolean panics — a type error the dynamic strategy
/// defers to execution time, surfacing as a runtime failure of the
/// generated program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Rational(f64),
    Boolean(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Rational(_) => "rational",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Boolean coercion; condition expressions pass through this.
    pub fn as_boolean(&self) -> bool {
        match self {
            Value::Integer(v) => *v != 0,
            Value::Rational(v) => *v != 0.0,
            Value::Boolean(v) => *v,
        }
    }

    pub fn as_integer(&self) -> i64 {
        match self {
            Value::Integer(v) => *v,
            Value::Rational(v) => *v as i64,
            Value::Boolean(v) => i64::from(*v),
        }
    }

    pub fn as_rational(&self) -> f64 {
        match self {
            Value::Integer(v) => *v as f64,
            Value::Rational(v) => *v,
            Value::Boolean(v) => f64::from(u8::from(*v)),
        }
    }

    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Ordering comparison underlying the relational operators.
    pub fn compare(&self, other: &Value) -> Ordering {
        match self {
            Value::Integer(v) => v.cmp(&other.as_integer()),
            Value::Rational(v) => v.total_cmp(&other.as_rational()),
            Value::Boolean(v) => v.cmp(&other.as_boolean()),
        }
    }

    pub fn add(&self, other: &Value) -> Value {
        match self {
            Value::Integer(v) => Value::Integer(v + other.as_integer()),
            Value::Rational(v) => Value::Rational(v + other.as_rational()),
            Value::Boolean(_) => panic!("cannot add boolean values"),
        }
    }

    pub fn subtract(&self, other: &Value) -> Value {
        match self {
            Value::Integer(v) => Value::Integer(v - other.as_integer()),
            Value::Rational(v) => Value::Rational(v - other.as_rational()),
            Value::Boolean(_) => panic!("cannot subtract boolean values"),
        }
    }

    pub fn multiply(&self, other: &Value) -> Value {
        match self {
            Value::Integer(v) => Value::Integer(v * other.as_integer()),
            Value::Rational(v) => Value::Rational(v * other.as_rational()),
            Value::Boolean(_) => panic!("cannot multiply boolean values"),
        }
    }

    /// Integer division by zero panics, like the generated program's.
    pub fn divide(&self, other: &Value) -> Value {
        match self {
            Value::Integer(v) => Value::Integer(v / other.as_integer()),
            Value::Rational(v) => Value::Rational(v / other.as_rational()),
            Value::Boolean(_) => panic!("cannot divide boolean values"),
        }
    }

    pub fn eq_value(&self, other: &Value) -> Value {
        Value::Boolean(self.compare(other) == Ordering::Equal)
    }

    pub fn neq(&self, other: &Value) -> Value {
        Value::Boolean(self.compare(other) != Ordering::Equal)
    }

    pub fn gt(&self, other: &Value) -> Value {
        Value::Boolean(self.compare(other) == Ordering::Greater)
    }

    pub fn gte(&self, other: &Value) -> Value {
        Value::Boolean(self.compare(other) != Ordering::Less)
    }

    pub fn lt(&self, other: &Value) -> Value {
        Value::Boolean(self.compare(other) == Ordering::Less)
    }

    pub fn lte(&self, other: &Value) -> Value {
        Value::Boolean(self.compare(other) != Ordering::Greater)
    }

    pub fn and(&self, other: &Value) -> Value {
        Value::Boolean(self.as_boolean() && other.as_boolean())
    }

    pub fn or(&self, other: &Value) -> Value {
        Value::Boolean(self.as_boolean() || other.as_boolean())
    }

    pub fn not(&self) -> Value {
        Value::Boolean(!self.as_boolean())
    }

    pub fn unary_plus(&self) -> Value {
        match self {
            Value::Integer(v) => Value::Integer(*v),
            Value::Rational(v) => Value::Rational(*v),
            Value::Boolean(_) => panic!("cannot negate boolean values"),
        }
    }

    pub fn unary_minus(&self) -> Value {
        match self {
            Value::Integer(v) => Value::Integer(-v),
            Value::Rational(v) => Value::Rational(-v),
            Value::Boolean(_) => panic!("cannot negate boolean values"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            // Debug float formatting keeps the trailing .0 on whole values,
            // matching the generated program's output.
            Value::Rational(v) => write!(f, "{v:?}"),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}
