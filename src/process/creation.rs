//! Raw process creation for both launch strategies

use crate::core::types::{ElevationError, ElevationResult, LaunchRequest};
use crate::process::handle::{ChildProcess, ProcessHandle, ThreadHandle};
use crate::process::token::AccessToken;
use crate::windows::bindings::advapi32;
use crate::windows::types::ParentProcessAttributeList;
use std::{mem, ptr};
use winapi::um::processthreadsapi::PROCESS_INFORMATION;
use winapi::um::winbase::{
    CREATE_NEW_CONSOLE, CREATE_SUSPENDED, EXTENDED_STARTUPINFO_PRESENT, STARTF_USESHOWWINDOW,
    STARTUPINFOEXW,
};
use winapi::um::winuser::SW_SHOWNORMAL;

fn startup_info() -> STARTUPINFOEXW {
    let mut startup: STARTUPINFOEXW = unsafe { mem::zeroed() };
    startup.StartupInfo.cb = mem::size_of::<STARTUPINFOEXW>() as u32;
    startup.StartupInfo.dwFlags = STARTF_USESHOWWINDOW;
    startup.StartupInfo.wShowWindow = SW_SHOWNORMAL as u16;
    startup
}

fn into_child(info: PROCESS_INFORMATION, request: &LaunchRequest) -> ChildProcess {
    ChildProcess::new(
        ProcessHandle::from_raw_handle(info.hProcess, info.dwProcessId),
        ThreadHandle::from_raw_handle(info.hThread),
        request.command_line(),
    )
}

/// Creates the process directly under `token`, sharing the caller's console.
///
/// The calling thread must hold the privileges for assigning a primary token.
pub fn create_with_token(
    token: &AccessToken,
    request: &LaunchRequest,
) -> ElevationResult<ChildProcess> {
    let mut command_line = request.to_wide_buffer();
    let mut startup = startup_info();

    let info = unsafe {
        advapi32::create_process_as_user(token.raw(), &mut command_line, 0, &mut startup)
    }
    .map_err(|e| ElevationError::process_creation(request.command_line(), e.code()))?;
    Ok(into_child(info, request))
}

/// Creates the process suspended in a new console, with `parent` as its
/// parent process and the caller's own token.
pub fn create_suspended_with_parent(
    parent: &ProcessHandle,
    request: &LaunchRequest,
) -> ElevationResult<ChildProcess> {
    let creation_error = |code: u32| ElevationError::process_creation(request.command_line(), code);

    let mut attributes =
        ParentProcessAttributeList::new(parent.raw()).map_err(|e| creation_error(e.code()))?;
    let mut command_line = request.to_wide_buffer();
    let mut startup = startup_info();
    startup.lpAttributeList = attributes.as_raw();

    let info = unsafe {
        advapi32::create_process_as_user(
            ptr::null_mut(),
            &mut command_line,
            CREATE_SUSPENDED | EXTENDED_STARTUPINFO_PRESENT | CREATE_NEW_CONSOLE,
            &mut startup,
        )
    }
    .map_err(|e| creation_error(e.code()))?;
    Ok(into_child(info, request))
}
