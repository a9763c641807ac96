pub mod error;
pub mod value;

pub use value::Value;
