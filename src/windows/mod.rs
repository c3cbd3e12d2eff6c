//! Windows API layer
//!
//! Provides safe wrappers around the Windows API functions the elevation
//! core needs. All unsafe FFI calls are contained within this module.

pub mod bindings;
pub mod platform;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use platform::WindowsPlatform;
pub use types::{Handle, ParentProcessAttributeList, ServiceHandle};
pub use utils::{ErrorCode, Win32Result};

// Re-export key bindings
pub use bindings::{advapi32, kernel32};
