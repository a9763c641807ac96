use crate::exec::error::ExecError;
use crate::language::errors::SemanticError;
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
pub struct SemanticDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    message: String,
    label: String,
}

impl SemanticDiagnostic {
    pub fn from_error(src: NamedSource<String>, err: &SemanticError) -> Self {
        let span = err.span();
        let label = if err.lexeme().is_empty() {
            format!("at line {} column {}", span.line, span.column)
        } else {
            format!("near `{}`", err.lexeme())
        };
        Self {
            src,
            span: span.to_source_span(),
            message: err.to_string(),
            label,
        }
    }
}

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("compilation of unit `{unit}` failed")]
pub struct CompilationDiagnostic {
    unit: String,
    #[help]
    diagnostics: Option<String>,
}

impl CompilationDiagnostic {
    pub fn from_error(err: &ExecError) -> Option<Self> {
        match err {
            ExecError::Compilation { unit, diagnostics } => Some(Self {
                unit: unit.clone(),
                diagnostics: Some(diagnostics.clone()),
            }),
            _ => None,
        }
    }
}

pub fn emit_semantic_error(name: &str, source: String, err: &SemanticError) {
    let src = NamedSource::new(name, source);
    let diagnostic = SemanticDiagnostic::from_error(src, err);
    eprintln!("{:?}", Report::new(diagnostic));
}

pub fn emit_compilation_error(err: &ExecError) {
    if let Some(diagnostic) = CompilationDiagnostic::from_error(err) {
        eprintln!("{:?}", Report::new(diagnostic));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::span::Span;

    #[test]
    fn semantic_adapter_maps_span_and_lexeme() {
        let err = SemanticError::UnresolvedReference {
            name: "x".to_string(),
            span: Span::with_range(2, 7, 10, 11),
        };
        let src = NamedSource::new("script", "write y;\nwrite x;\n".to_string());
        let diagnostic = SemanticDiagnostic::from_error(src, &err);
        assert_eq!(diagnostic.label, "near `x`");
        assert_eq!(diagnostic.span, (10, 1).into());
        assert!(diagnostic.message.contains("`x`"));
    }

    #[test]
    fn semantic_adapter_falls_back_to_position_without_a_lexeme() {
        let err = SemanticError::TypeMismatch {
            message: "operands differ".to_string(),
            span: Span::new(4, 3),
        };
        let src = NamedSource::new("script", String::new());
        let diagnostic = SemanticDiagnostic::from_error(src, &err);
        assert_eq!(diagnostic.label, "at line 4 column 3");
    }

    #[test]
    fn compilation_adapter_carries_the_diagnostic_text() {
        let err = ExecError::Compilation {
            unit: "unit_1".to_string(),
            diagnostics: "error: expected one of".to_string(),
        };
        let diagnostic = CompilationDiagnostic::from_error(&err).expect("adapter");
        assert_eq!(diagnostic.unit, "unit_1");
        assert_eq!(
            diagnostic.diagnostics.as_deref(),
            Some("error: expected one of")
        );
    }

    #[test]
    fn compilation_adapter_ignores_other_failures() {
        let err = ExecError::UnknownUnit {
            unit: "unit_1".to_string(),
        };
        assert!(CompilationDiagnostic::from_error(&err).is_none());
    }
}
