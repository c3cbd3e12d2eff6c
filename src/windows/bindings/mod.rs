//! Windows API bindings
//!
//! Low-level FFI bindings to Windows system libraries.

pub mod advapi32;
pub mod kernel32;
