use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::ExecError;

/// The ahead-of-time compiler collaborator: an external `rustc` building
/// each generated unit into a dynamic library on the scratch path.
///
/// Only the input/output contract matters here: source text in, compiled
/// artifact on disk or the full diagnostic text verbatim.
pub struct AotCompiler {
    scratch: PathBuf,
    rustc: OsString,
}

impl AotCompiler {
    /// `RILL_RUSTC` overrides the compiler binary, like a toolchain
    /// setting; defaults to `rustc` on the search path.
    pub fn new(scratch: impl Into<PathBuf>) -> Self {
        let rustc = std::env::var_os("RILL_RUSTC").unwrap_or_else(|| OsString::from("rustc"));
        Self {
            scratch: scratch.into(),
            rustc,
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.scratch.join(format!("{name}.rs"))
    }

    /// Persist `source` under `name` in the scratch directory and compile
    /// it to `artifact`. The library search path is the process's own
    /// resolution path extended with the scratch directory.
    pub fn compile(&self, name: &str, source: &str, artifact: &Path) -> Result<(), ExecError> {
        fs::create_dir_all(&self.scratch)?;
        let source_path = self.source_path(name);
        fs::write(&source_path, source)?;

        let output = Command::new(&self.rustc)
            .arg("--edition=2021")
            .arg("--crate-type=cdylib")
            .arg("--crate-name")
            .arg(name)
            .arg("-o")
            .arg(artifact)
            .arg("-L")
            .arg(&self.scratch)
            .arg(&source_path)
            .output()?;

        if !output.status.success() {
            let mut diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.trim().is_empty() {
                diagnostics.push_str(&stdout);
            }
            return Err(ExecError::Compilation {
                unit: name.to_string(),
                diagnostics,
            });
        }
        Ok(())
    }
}
