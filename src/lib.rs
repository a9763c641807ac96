pub mod codegen;
pub mod diagnostics;
pub mod engine;
pub mod exec;
pub mod language;
pub mod runtime;

#[cfg(test)]
mod tests;

pub use codegen::{generate, Strategy};
pub use engine::{Engine, EngineError};
pub use runtime::Value;
