//! Host-source generation: a depth-first visitor over the AST that builds
//! the scope tree and emits Rust source text for the dynamic execution
//! host to compile.

pub mod frames;
mod emit;
mod strategy;


use crate::language::ast::Program;
use crate::language::errors::SemanticResult;

use frames::{ExprTy, FrameArena, FrameId};

pub use strategy::Strategy;

/// Name of the implicit entry frame every program compiles into.
pub const ENTRY_FRAME: &str = "__main";

/// Symbol exported by every generated unit.
pub const ENTRY_SYMBOL: &str = "rill_entry";

/// Prefix every line with one indentation step.
pub(crate) fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("    {line}\n")
            }
        })
        .collect()
}

/// Generate complete host source for `program` under the chosen strategy.
///
/// One depth-first pass: frames are pushed when a definition is entered and
/// popped when it is left. Any resolution failure aborts before text is
/// assembled; the compiler collaborator never sees partial output.
pub fn generate(program: &Program, strategy: Strategy) -> SemanticResult<String> {
    let mut generator = Generator::new(strategy)?;
    generator.emit_program(program)?;
    Ok(generator.finish())
}

/// The code generator: one emission rule per AST node kind, threading the
/// active frame and (for for-loop clauses) a terminator-suppression flag.
pub struct Generator {
    strategy: Strategy,
    arena: FrameArena,
    current: FrameId,
    root: FrameId,
}

impl Generator {
    pub fn new(strategy: Strategy) -> SemanticResult<Self> {
        let mut arena = FrameArena::new();
        let root = arena.push_frame(ENTRY_FRAME, None, Default::default())?;
        Ok(Self {
            strategy,
            arena,
            current: root,
            root,
        })
    }

    /// Assemble the finished unit: scaffolding, the rendered frame tree,
    /// and the entry function.
    fn finish(self) -> String {
        let returns = self.arena.frame(self.root).returns;
        let mut out = self.strategy.preamble();
        out.push('\n');
        out.push_str(&self.arena.render(self.root));
        out.push('\n');
        out.push_str(&self.strategy.entry_fn(ENTRY_SYMBOL, ENTRY_FRAME, returns));
        out
    }
}

/// A typed expression fragment: the host-language text plus the type the
/// generator knows for it.
#[derive(Clone, Debug)]
pub(crate) struct Snippet {
    pub ty: ExprTy,
    pub text: String,
}
