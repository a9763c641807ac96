use crate::language::span::Span;
use thiserror::Error;

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Resolution failures raised while generating code. Each aborts generation
/// immediately; no partial source text ever reaches the compiler
/// collaborator.
#[derive(Clone, Debug, Error)]
pub enum SemanticError {
    #[error("`{name}` is already defined in `{owner}`")]
    DuplicateDefinition {
        name: String,
        owner: String,
        span: Span,
    },
    #[error("variable `{name}` has not been initialised")]
    UnresolvedReference { name: String, span: Span },
    #[error("can't find function `{name}`")]
    UnresolvedCall { name: String, span: Span },
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String, span: Span },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateDefinition { span, .. }
            | SemanticError::UnresolvedReference { span, .. }
            | SemanticError::UnresolvedCall { span, .. }
            | SemanticError::TypeMismatch { span, .. } => *span,
        }
    }

    /// The offending lexeme, for reports.
    pub fn lexeme(&self) -> &str {
        match self {
            SemanticError::DuplicateDefinition { name, .. }
            | SemanticError::UnresolvedReference { name, .. }
            | SemanticError::UnresolvedCall { name, .. } => name,
            SemanticError::TypeMismatch { .. } => "",
        }
    }
}
