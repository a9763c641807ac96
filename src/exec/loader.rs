use std::collections::HashMap;
use std::path::{Path, PathBuf};

use libloading::Library;

use super::error::ExecError;

pub type Generation = u64;

/// Loader substrate with explicit reload semantics.
///
/// Every compile bumps a per-name generation counter and every artifact
/// path carries its generation, so a reused name never aliases a
/// previously mapped library and the platform's library cache cannot hand
/// back stale code. Loading a generation other than the latest fails.
#[derive(Default)]
pub struct UnitLoader {
    scratch: PathBuf,
    latest: HashMap<String, Generation>,
    loaded: HashMap<String, LoadedUnit>,
}

struct LoadedUnit {
    generation: Generation,
    library: Library,
}

impl UnitLoader {
    pub fn new(scratch: impl Into<PathBuf>) -> Self {
        Self {
            scratch: scratch.into(),
            latest: HashMap::new(),
            loaded: HashMap::new(),
        }
    }

    pub fn artifact_path(&self, name: &str, generation: Generation) -> PathBuf {
        self.scratch.join(format!(
            "{name}.{generation}{}",
            std::env::consts::DLL_SUFFIX
        ))
    }

    /// Reserve the next generation for `name`. Older generations become
    /// stale immediately, whether or not their compile succeeded.
    pub fn next_generation(&mut self, name: &str) -> Generation {
        let entry = self.latest.entry(name.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn latest_generation(&self, name: &str) -> Option<Generation> {
        self.latest.get(name).copied()
    }

    /// Map the unit's artifact into the process. Replaces any previously
    /// loaded generation of the same name.
    pub fn load(&mut self, name: &str, generation: Generation) -> Result<(), ExecError> {
        let latest = self
            .latest_generation(name)
            .ok_or_else(|| ExecError::UnknownUnit {
                unit: name.to_string(),
            })?;
        if generation != latest {
            return Err(ExecError::StaleGeneration {
                unit: name.to_string(),
                requested: generation,
                latest,
            });
        }
        let path = self.artifact_path(name, generation);
        // SAFETY: the artifact was produced by our own compile step; its
        // initialisers are the ones rustc emits for a cdylib.
        let library = unsafe { Library::new(&path) }.map_err(|source| ExecError::Load {
            unit: name.to_string(),
            source,
        })?;
        self.loaded.insert(
            name.to_string(),
            LoadedUnit {
                generation,
                library,
            },
        );
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn loaded_generation(&self, name: &str) -> Option<Generation> {
        self.loaded.get(name).map(|unit| unit.generation)
    }

    /// Resolve a symbol in a loaded unit.
    ///
    /// # Safety
    /// The caller must give the correct type for the symbol.
    pub unsafe fn symbol<T>(
        &self,
        name: &str,
        symbol: &str,
    ) -> Result<libloading::Symbol<'_, T>, ExecError> {
        let unit = self.loaded.get(name).ok_or_else(|| ExecError::NotLoaded {
            unit: name.to_string(),
        })?;
        unit.library
            .get(symbol.as_bytes())
            .map_err(|source| ExecError::MissingEntry {
                unit: name.to_string(),
                source,
            })
    }

    /// Drop the unit's mapping so a later load of the same name reads
    /// fresh bytes. Returns whether anything was loaded.
    pub fn unload(&mut self, name: &str) -> bool {
        self.loaded.remove(name).is_some()
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }
}
