//! Safe process and thread handle wrappers with RAII semantics

use std::fmt;

#[cfg(windows)]
use crate::core::types::{ElevationError, ElevationResult};
#[cfg(windows)]
use crate::windows::bindings::kernel32;
#[cfg(windows)]
use crate::windows::types::Handle;
#[cfg(windows)]
use crate::windows::utils::Win32Result;
#[cfg(windows)]
use winapi::um::winnt::HANDLE;

/// Access rights for process handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Use the process as a parent of a new process
    pub const CREATE_PROCESS: Self = Self { value: 0x0080 };
    /// Duplicate handles owned by the process
    pub const DUP_HANDLE: Self = Self { value: 0x0040 };
    /// Query information access, including the token
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Reduced query access, enough to open the token
    pub const QUERY_LIMITED_INFORMATION: Self = Self { value: 0x1000 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        for right in rights {
            value |= right.value;
        }
        Self { value }
    }

    /// Whether every bit of `other` is present
    pub fn contains(&self, other: Self) -> bool {
        self.value & other.value == other.value
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for ProcessAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.value)
    }
}

/// Safe wrapper around a Windows process handle
#[cfg(windows)]
pub struct ProcessHandle {
    handle: Handle,
    pid: u32,
}

#[cfg(windows)]
impl ProcessHandle {
    /// Wrap a handle obtained elsewhere; it is closed on drop
    pub fn from_raw_handle(handle: HANDLE, pid: u32) -> Self {
        ProcessHandle {
            handle: Handle::new(handle),
            pid,
        }
    }

    /// Open a process with specified access rights
    pub fn open(pid: u32, access: ProcessAccess) -> Win32Result<Self> {
        let raw_handle = kernel32::open_process(pid, access.value())?;
        Ok(Self::from_raw_handle(raw_handle, pid))
    }

    /// Get the process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the raw handle, valid as long as this ProcessHandle exists
    pub fn raw(&self) -> HANDLE {
        self.handle.raw()
    }

    /// Check if handle is valid
    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    /// Blocks until the process exits and returns its exit code
    pub fn wait_for_exit(&self) -> Win32Result<u32> {
        unsafe {
            kernel32::wait_forever(self.raw())?;
            kernel32::exit_code_process(self.raw())
        }
    }

    /// Forcibly ends the process
    pub fn terminate(&self, exit_code: u32) -> Win32Result<()> {
        unsafe { kernel32::terminate_process(self.raw(), exit_code) }
    }
}

#[cfg(windows)]
impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Owned handle to a process's primary thread
#[cfg(windows)]
pub struct ThreadHandle {
    handle: Handle,
}

#[cfg(windows)]
impl ThreadHandle {
    pub fn from_raw_handle(handle: HANDLE) -> Self {
        ThreadHandle {
            handle: Handle::new(handle),
        }
    }

    /// Decrements the suspend count; the thread runs once it reaches zero
    pub fn resume(&self) -> Win32Result<u32> {
        unsafe { kernel32::resume_thread(self.handle.raw()) }
    }
}

/// A process created by the launcher, with its primary thread.
///
/// Both handles are closed on drop; the process itself keeps running.
#[cfg(windows)]
pub struct ChildProcess {
    pub process: ProcessHandle,
    pub thread: ThreadHandle,
    command: String,
}

#[cfg(windows)]
impl ChildProcess {
    pub fn new(process: ProcessHandle, thread: ThreadHandle, command: impl Into<String>) -> Self {
        ChildProcess {
            process,
            thread,
            command: command.into(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }

    /// Releases the suspended primary thread
    pub fn resume(&self) -> ElevationResult<()> {
        self.thread
            .resume()
            .map(|_| ())
            .map_err(|e| ElevationError::process_creation(self.command.as_str(), e.code()))
    }
}
