use crate::language::span::Span;

/// A whole script, as handed over by the parser collaborator.
///
/// Malformed source never reaches this crate: the parser guarantees shape
/// and arity, so every node here is structurally well-formed. A trailing
/// `ret` expression puts the program in evaluation mode.
#[derive(Clone, Debug)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub ret: Option<Expr>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self {
            statements,
            ret: None,
        }
    }

    pub fn with_return(statements: Vec<Stmt>, ret: Expr) -> Self {
        Self {
            statements,
            ret: Some(ret),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Write {
        expr: Expr,
        span: Span,
    },
    Assign(Assign),
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },
    For {
        init: Assign,
        cond: Expr,
        step: Assign,
        body: Block,
        span: Span,
    },
    Block(Block),
    FnDef(FnDef),
    /// Invocation in statement position; any result is discarded.
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
}

#[derive(Clone, Debug)]
pub struct Assign {
    pub target: String,
    pub value: Expr,
    pub span: Span,
}

impl Assign {
    pub fn new(target: impl Into<String>, value: Expr, span: Span) -> Self {
        Self {
            target: target.into(),
            value,
            span,
        }
    }
}

/// Function or procedure definition. A definition with a `ret` expression
/// returns a value; one without is a procedure. The body may be empty for
/// pure single-expression functions.
#[derive(Clone, Debug)]
pub struct FnDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub ret: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub ty: ScalarType,
    pub name: String,
    pub span: Span,
}

impl Param {
    pub fn new(ty: ScalarType, name: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            name: name.into(),
            span,
        }
    }
}

/// Declared parameter types. Under the dynamic strategy the declaration is
/// accepted but every slot holds a tagged runtime value regardless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    Long,
    Rational,
    Boolean,
}

#[derive(Clone, Debug)]
pub enum Expr {
    Integer {
        value: i64,
        span: Span,
    },
    Rational {
        value: f64,
        span: Span,
    },
    True {
        span: Span,
    },
    False {
        span: Span,
    },
    /// Dereference of a variable or parameter.
    Deref {
        name: String,
        span: Span,
    },
    /// Invocation in expression position.
    Invoke {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn integer(value: i64, span: Span) -> Self {
        Expr::Integer { value, span }
    }

    pub fn rational(value: f64, span: Span) -> Self {
        Expr::Rational { value, span }
    }

    pub fn deref(name: impl Into<String>, span: Span) -> Self {
        Expr::Deref {
            name: name.into(),
            span,
        }
    }

    pub fn invoke(name: impl Into<String>, args: Vec<Expr>, span: Span) -> Self {
        Expr::Invoke {
            name: name.into(),
            args,
            span,
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr, span: Span) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }
    }

    pub fn unary(op: UnOp, operand: Expr, span: Span) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Integer { span, .. }
            | Expr::Rational { span, .. }
            | Expr::True { span }
            | Expr::False { span }
            | Expr::Deref { span, .. }
            | Expr::Invoke { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. } => *span,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Neq,
    Gte,
    Lte,
    Gt,
    Lt,
    Add,
    Subtract,
    Times,
    Divide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Plus,
    Minus,
}
