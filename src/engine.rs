use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::codegen::{self, Strategy};
use crate::exec::error::ExecError;
use crate::exec::ExecutionHost;
use crate::language::ast::Program;
use crate::language::errors::SemanticError;
use crate::runtime::Value;

/// Process-wide sequence so every request gets a fresh unit name, even
/// across engines sharing one scratch directory.
static UNIT_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// The end-to-end pipeline: generate → compile → load → invoke → unload,
/// one request at a time, each under a unique generated name.
pub struct Engine {
    strategy: Strategy,
    host: ExecutionHost,
}

impl Engine {
    /// `RILL_SCRATCH` overrides the scratch directory; the default lives
    /// under the system temp dir. The directory is never auto-cleaned.
    pub fn new(strategy: Strategy) -> Self {
        let scratch = std::env::var_os("RILL_SCRATCH")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("rill-scratch"));
        Self::with_scratch(strategy, scratch)
    }

    pub fn with_scratch(strategy: Strategy, scratch: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            host: ExecutionHost::new(scratch),
        }
    }

    /// Emitted host source for `program`, without executing it.
    pub fn generate_source(&self, program: &Program) -> Result<String, SemanticError> {
        codegen::generate(program, self.strategy)
    }

    /// Run `program` and hand back its result: a value when the program
    /// ends in a top-level return, `None` otherwise.
    pub fn evaluate(&mut self, program: &Program) -> Result<Option<Value>, EngineError> {
        let source = self.generate_source(program)?;
        let name = fresh_unit_name();
        Ok(self.host.run(&name, &source)?)
    }

    /// Run `program` for effect, discarding any result.
    pub fn execute(&mut self, program: &Program) -> Result<(), EngineError> {
        self.evaluate(program).map(|_| ())
    }

    pub fn host(&mut self) -> &mut ExecutionHost {
        &mut self.host
    }
}

fn fresh_unit_name() -> String {
    let seq = UNIT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("rill_unit_{}_{}", std::process::id(), seq)
}
