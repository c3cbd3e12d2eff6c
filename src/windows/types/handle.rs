//! Safe HANDLE wrappers with automatic cleanup

use crate::windows::bindings::{advapi32, kernel32};
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::winnt::HANDLE;
use winapi::um::winsvc::SC_HANDLE;

/// Safe wrapper around Windows HANDLE with RAII semantics
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    /// Create a new Handle wrapper
    pub fn new(handle: HANDLE) -> Self {
        Handle { handle }
    }

    /// Check if handle is null or the invalid sentinel
    pub fn is_null(&self) -> bool {
        self.handle.is_null() || self.handle == INVALID_HANDLE_VALUE
    }

    /// Get the raw handle
    pub fn raw(&self) -> HANDLE {
        self.handle
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if !self.is_null() {
            // Ignore errors on cleanup
            unsafe {
                let _ = kernel32::close_handle(self.handle);
            }
        }
    }
}

// Send + Sync are safe because HANDLEs are process-local
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}

/// Service control manager or service handle, closed with CloseServiceHandle
pub struct ServiceHandle {
    handle: SC_HANDLE,
}

impl ServiceHandle {
    pub fn new(handle: SC_HANDLE) -> Self {
        ServiceHandle { handle }
    }

    pub fn raw(&self) -> SC_HANDLE {
        self.handle
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe {
                let _ = advapi32::close_service_handle(self.handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_handle_creation() {
        let handle = Handle::new(ptr::null_mut());
        assert!(handle.is_null());
        assert_eq!(handle.raw(), ptr::null_mut());
    }

    #[test]
    fn test_invalid_sentinel_is_null() {
        let handle = Handle::new(INVALID_HANDLE_VALUE);
        assert!(handle.is_null());
        // Must not be closed on drop
        drop(handle);
    }

    #[test]
    fn test_null_service_handle_drop() {
        let handle = ServiceHandle::new(ptr::null_mut());
        assert!(handle.raw().is_null());
    }
}
