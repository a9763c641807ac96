use thiserror::Error;

/// A failure raised inside an executed generated program, propagated to the
/// pipeline's caller unmodified.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("{message}")]
    Panic { message: String },
}

impl RuntimeError {
    pub fn panic(message: impl Into<String>) -> Self {
        RuntimeError::Panic {
            message: message.into(),
        }
    }
}
