//! Kernel32.dll bindings for process, thread and session operations

use crate::windows::utils::{ErrorCode, Win32Result};
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::processthreadsapi::{
    GetCurrentProcess, GetExitCodeProcess, OpenProcess, ResumeThread, TerminateProcess,
};
use winapi::um::synchapi::WaitForSingleObject;
use winapi::um::tlhelp32::{CreateToolhelp32Snapshot, TH32CS_SNAPPROCESS};
use winapi::um::winbase::{WTSGetActiveConsoleSessionId, INFINITE, WAIT_FAILED};
use winapi::um::winnt::HANDLE;

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> Win32Result<HANDLE> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(ErrorCode::last_error())
        } else {
            Ok(handle)
        }
    }
}

/// Pseudo-handle of the calling process, never closed
pub fn current_process() -> HANDLE {
    unsafe { GetCurrentProcess() }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle
pub unsafe fn close_handle(handle: HANDLE) -> Win32Result<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(ErrorCode::last_error())
    } else {
        Ok(())
    }
}

/// Safe wrapper for ResumeThread, returns the previous suspend count
///
/// # Safety
/// The handle must be a valid thread handle with THREAD_SUSPEND_RESUME access
pub unsafe fn resume_thread(thread: HANDLE) -> Win32Result<u32> {
    let previous = ResumeThread(thread);
    if previous == DWORD::MAX {
        Err(ErrorCode::last_error())
    } else {
        Ok(previous)
    }
}

/// Safe wrapper for TerminateProcess
///
/// # Safety
/// The handle must be a valid process handle with PROCESS_TERMINATE access
pub unsafe fn terminate_process(process: HANDLE, exit_code: u32) -> Win32Result<()> {
    if TerminateProcess(process, exit_code) == FALSE {
        Err(ErrorCode::last_error())
    } else {
        Ok(())
    }
}

/// Blocks until `handle` is signaled, without timeout
///
/// # Safety
/// The handle must be a valid waitable handle with SYNCHRONIZE access
pub unsafe fn wait_forever(handle: HANDLE) -> Win32Result<()> {
    if WaitForSingleObject(handle, INFINITE) == WAIT_FAILED {
        Err(ErrorCode::last_error())
    } else {
        Ok(())
    }
}

/// Safe wrapper for GetExitCodeProcess
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn exit_code_process(process: HANDLE) -> Win32Result<u32> {
    let mut code: DWORD = 0;
    if GetExitCodeProcess(process, &mut code) == FALSE {
        Err(ErrorCode::last_error())
    } else {
        Ok(code)
    }
}

/// Session attached to the physical console, if any
pub fn active_console_session_id() -> Option<u32> {
    match unsafe { WTSGetActiveConsoleSessionId() } {
        0xFFFF_FFFF => None,
        id => Some(id),
    }
}

/// Snapshot of all running processes
pub fn process_snapshot() -> Win32Result<HANDLE> {
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
    if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
        Err(ErrorCode::last_error())
    } else {
        Ok(snapshot)
    }
}
