//! Dynamic execution host: compiles generated source with the external
//! compiler collaborator, maps the artifact with the loader substrate,
//! invokes the fixed entry point, and reclaims the unit afterward.

pub mod abi;
pub mod compiler;
pub mod error;
pub mod loader;

use std::path::{Path, PathBuf};

use crate::codegen::ENTRY_SYMBOL;
use crate::runtime::Value;

use abi::RawResult;
use compiler::AotCompiler;
use error::ExecError;
use loader::{Generation, UnitLoader};

type EntryFn = unsafe extern "C" fn() -> RawResult;

/// One compile → load → invoke → unload lifecycle per request, strictly
/// sequential. Sequential reuse across requests is safe because each
/// request uses a unique generated name and a generation-suffixed
/// artifact; concurrent reuse of one name is unsupported.
pub struct ExecutionHost {
    compiler: AotCompiler,
    loader: UnitLoader,
}

impl ExecutionHost {
    pub fn new(scratch: impl Into<PathBuf>) -> Self {
        let scratch = scratch.into();
        Self {
            compiler: AotCompiler::new(&scratch),
            loader: UnitLoader::new(scratch),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        self.loader.scratch_dir()
    }

    /// Compile `source` under `name`, bumping the unit's generation.
    /// Compiler rejection carries the full diagnostic text verbatim.
    pub fn compile(&mut self, name: &str, source: &str) -> Result<Generation, ExecError> {
        let generation = self.loader.next_generation(name);
        let artifact = self.loader.artifact_path(name, generation);
        self.compiler.compile(name, source, &artifact)?;
        Ok(generation)
    }

    /// Map a compiled unit; only the latest generation may be loaded.
    pub fn load(&mut self, name: &str, generation: Generation) -> Result<(), ExecError> {
        self.loader.load(name, generation)
    }

    /// Call the unit's zero-argument entry point: a value back in
    /// evaluation mode, nothing in execution mode, or the generated
    /// program's own failure propagated unmodified.
    pub fn invoke(&mut self, name: &str) -> Result<Option<Value>, ExecError> {
        // SAFETY: every generated unit exports the entry symbol with this
        // exact signature; the codegen layer and the loaded artifact come
        // from the same pipeline run.
        let raw = unsafe {
            let entry = self.loader.symbol::<EntryFn>(name, ENTRY_SYMBOL)?;
            entry()
        };
        raw.into_outcome().map_err(ExecError::Runtime)
    }

    /// Drop the unit's mapping. Invoked deterministically after `invoke`
    /// completes or fails.
    pub fn unload(&mut self, name: &str) -> bool {
        self.loader.unload(name)
    }

    /// The full lifecycle, with the unload guaranteed on every path.
    pub fn run(&mut self, name: &str, source: &str) -> Result<Option<Value>, ExecError> {
        let generation = self.compile(name, source)?;
        self.load(name, generation)?;
        let outcome = self.invoke(name);
        self.unload(name);
        outcome
    }
}
