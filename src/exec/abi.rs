use std::os::raw::c_char;

use crate::runtime::error::RuntimeError;
use crate::runtime::Value;

/// Result record returned by a generated unit's entry point.
///
/// Field-for-field mirror of the `RawResult` emitted into every generated
/// unit; the layouts must stay in lockstep.
#[repr(C)]
#[derive(Debug)]
pub struct RawResult {
    pub tag: u8,
    pub int_val: i64,
    pub rational_val: f64,
    pub bool_val: u8,
    pub err: *mut c_char,
}

pub const TAG_UNIT: u8 = 0;
pub const TAG_INT: u8 = 1;
pub const TAG_RATIONAL: u8 = 2;
pub const TAG_BOOL: u8 = 3;
pub const TAG_ERROR: u8 = 4;

impl RawResult {
    /// Convert into the invocation outcome: a value (evaluation mode),
    /// nothing (execution mode), or the propagated runtime failure.
    ///
    /// The error message is copied out of the unit's memory before the
    /// library is dropped; the unit's allocation is deliberately never
    /// freed across the allocator boundary.
    pub fn into_outcome(self) -> Result<Option<Value>, RuntimeError> {
        match self.tag {
            TAG_INT => Ok(Some(Value::Integer(self.int_val))),
            TAG_RATIONAL => Ok(Some(Value::Rational(self.rational_val))),
            TAG_BOOL => Ok(Some(Value::Boolean(self.bool_val != 0))),
            TAG_ERROR => {
                let message = if self.err.is_null() {
                    "unknown runtime failure".to_string()
                } else {
                    // Written by the generated entry as a nul-terminated
                    // string; valid while the library stays loaded.
                    unsafe { std::ffi::CStr::from_ptr(self.err) }
                        .to_string_lossy()
                        .into_owned()
                };
                Err(RuntimeError::panic(message))
            }
            _ => Ok(None),
        }
    }
}
