use thiserror::Error;

use crate::runtime::error::RuntimeError;

use super::loader::Generation;

/// Failures of the compile/load/invoke/unload lifecycle. Compilation
/// diagnostics are carried verbatim; runtime failures propagate unmodified.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Generation succeeded but the compiler collaborator rejected the
    /// emitted text — a generator defect, since well-formed input should
    /// always yield valid host source.
    #[error("compilation of unit `{unit}` failed:\n{diagnostics}")]
    Compilation { unit: String, diagnostics: String },
    #[error("stale generation {requested} for unit `{unit}`; latest is {latest}")]
    StaleGeneration {
        unit: String,
        requested: Generation,
        latest: Generation,
    },
    #[error("unit `{unit}` has never been compiled")]
    UnknownUnit { unit: String },
    #[error("unit `{unit}` is not loaded")]
    NotLoaded { unit: String },
    #[error("failed to load unit `{unit}`")]
    Load {
        unit: String,
        #[source]
        source: libloading::Error,
    },
    #[error("unit `{unit}` does not export the entry symbol")]
    MissingEntry {
        unit: String,
        #[source]
        source: libloading::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
