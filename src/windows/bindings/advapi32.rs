//! Advapi32.dll bindings for tokens, privileges, impersonation, process
//! creation under a token and the service control manager

use crate::core::types::Luid;
use crate::windows::utils::{string_to_wide, wide_to_string, ErrorCode, Win32Result};
use std::{mem, ptr};
use winapi::shared::minwindef::{DWORD, FALSE, LPVOID};
use winapi::shared::winerror::{ERROR_INSUFFICIENT_BUFFER, ERROR_NOT_ALL_ASSIGNED};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::processthreadsapi::{
    CreateProcessAsUserW, OpenProcessToken, SetThreadToken, PROCESS_INFORMATION,
};
use winapi::um::securitybaseapi::{
    AdjustTokenPrivileges, DuplicateTokenEx, GetTokenInformation, IsWellKnownSid, RevertToSelf,
    SetTokenInformation,
};
use winapi::um::winbase::{LookupPrivilegeNameW, LookupPrivilegeValueW, STARTUPINFOEXW};
use winapi::um::winnt::{
    SecurityImpersonation, TokenSessionId, TokenUser, WinLocalSystemSid, HANDLE, LUID,
    PTOKEN_PRIVILEGES, TOKEN_INFORMATION_CLASS, TOKEN_TYPE, TOKEN_USER,
};
use winapi::um::winsvc::{
    CloseServiceHandle, OpenSCManagerW, OpenServiceW, QueryServiceStatusEx, StartServiceW,
    SC_HANDLE, SC_STATUS_PROCESS_INFO, SERVICE_STATUS_PROCESS,
};

fn check(result: i32) -> Win32Result<()> {
    if result == FALSE {
        Err(ErrorCode::last_error())
    } else {
        Ok(())
    }
}

/// Safe wrapper for OpenProcessToken
pub fn open_process_token(process: HANDLE, desired_access: u32) -> Win32Result<HANDLE> {
    let mut token = ptr::null_mut();
    check(unsafe { OpenProcessToken(process, desired_access, &mut token) })?;
    Ok(token)
}

/// Duplicates `token` into a new primary or impersonation token
pub fn duplicate_token(
    token: HANDLE,
    desired_access: u32,
    token_type: TOKEN_TYPE,
) -> Win32Result<HANDLE> {
    let mut duplicate = ptr::null_mut();
    check(unsafe {
        DuplicateTokenEx(
            token,
            desired_access,
            ptr::null_mut(),
            SecurityImpersonation,
            token_type,
            &mut duplicate,
        )
    })?;
    Ok(duplicate)
}

/// Reads a token information class into an 8-byte aligned buffer
pub fn token_information(token: HANDLE, class: TOKEN_INFORMATION_CLASS) -> Win32Result<Vec<u64>> {
    let mut size: DWORD = 0;
    unsafe { GetTokenInformation(token, class, ptr::null_mut(), 0, &mut size) };
    if size == 0 {
        return Err(ErrorCode::last_error());
    }

    let mut buffer = vec![0u64; (size as usize + 7) / 8];
    check(unsafe {
        GetTokenInformation(
            token,
            class,
            buffer.as_mut_ptr() as LPVOID,
            (buffer.len() * 8) as DWORD,
            &mut size,
        )
    })?;
    Ok(buffer)
}

/// Applies a `TOKEN_PRIVILEGES` structure laid out as 32-bit words.
///
/// Fails with [`ErrorCode::NotAllAssigned`] when the token lacks one of the
/// requested privileges.
pub fn adjust_token_privileges(token: HANDLE, words: &mut [u32]) -> Win32Result<()> {
    check(unsafe {
        AdjustTokenPrivileges(
            token,
            FALSE,
            words.as_mut_ptr() as PTOKEN_PRIVILEGES,
            0,
            ptr::null_mut(),
            ptr::null_mut(),
        )
    })?;
    // Success may still report a partial assignment
    match unsafe { GetLastError() } {
        ERROR_NOT_ALL_ASSIGNED => Err(ErrorCode::NotAllAssigned),
        _ => Ok(()),
    }
}

/// Overwrites the session id of `token`; needs SeTcbPrivilege
pub fn set_token_session_id(token: HANDLE, session_id: u32) -> Win32Result<()> {
    let mut value: DWORD = session_id;
    check(unsafe {
        SetTokenInformation(
            token,
            TokenSessionId,
            &mut value as *mut DWORD as LPVOID,
            mem::size_of::<DWORD>() as DWORD,
        )
    })
}

/// Whether the token's user is the LocalSystem account
pub fn is_local_system_token(token: HANDLE) -> Win32Result<bool> {
    let buffer = token_information(token, TokenUser)?;
    let user = unsafe { &*(buffer.as_ptr() as *const TOKEN_USER) };
    Ok(unsafe { IsWellKnownSid(user.User.Sid, WinLocalSystemSid) } != FALSE)
}

/// Safe wrapper for LookupPrivilegeValueW on the local system
pub fn lookup_privilege_value(name: &str) -> Win32Result<Luid> {
    let wide = string_to_wide(name);
    let mut luid: LUID = unsafe { mem::zeroed() };
    check(unsafe { LookupPrivilegeValueW(ptr::null(), wide.as_ptr(), &mut luid) })?;
    Ok(Luid::new(luid.LowPart, luid.HighPart))
}

/// Programmatic name of a privilege, e.g. `SeDebugPrivilege`
pub fn lookup_privilege_name(luid: Luid) -> Win32Result<String> {
    let mut raw = LUID {
        LowPart: luid.low,
        HighPart: luid.high,
    };
    let mut buffer = vec![0u16; 64];
    loop {
        let mut len = buffer.len() as DWORD;
        let ok = unsafe {
            LookupPrivilegeNameW(ptr::null(), &mut raw, buffer.as_mut_ptr(), &mut len)
        };
        if ok != FALSE {
            return Ok(wide_to_string(&buffer[..len as usize]));
        }
        let err = unsafe { GetLastError() };
        if err != ERROR_INSUFFICIENT_BUFFER || len as usize <= buffer.len() {
            return Err(ErrorCode::from(err));
        }
        buffer.resize(len as usize + 1, 0);
    }
}

/// Sets (or with a null token, clears) the calling thread's token
pub fn set_thread_token(token: HANDLE) -> Win32Result<()> {
    check(unsafe { SetThreadToken(ptr::null_mut(), token) })
}

/// Ends impersonation on the calling thread
pub fn revert_to_self() -> Win32Result<()> {
    check(unsafe { RevertToSelf() })
}

/// Safe wrapper for CreateProcessAsUserW.
///
/// A null `token` creates the process under the caller's own token.
///
/// # Safety
/// `startup.lpAttributeList` must be null or a valid initialized list, and
/// every handle it references must stay open for the duration of the call.
pub unsafe fn create_process_as_user(
    token: HANDLE,
    command_line: &mut [u16],
    creation_flags: u32,
    startup: &mut STARTUPINFOEXW,
) -> Win32Result<PROCESS_INFORMATION> {
    let mut info: PROCESS_INFORMATION = mem::zeroed();
    check(CreateProcessAsUserW(
        token,
        ptr::null(),
        command_line.as_mut_ptr(),
        ptr::null_mut(),
        ptr::null_mut(),
        FALSE,
        creation_flags,
        ptr::null_mut(),
        ptr::null(),
        &mut startup.StartupInfo,
        &mut info,
    ))?;
    Ok(info)
}

/// Connects to the local service control manager
pub fn open_sc_manager(desired_access: u32) -> Win32Result<SC_HANDLE> {
    let handle = unsafe { OpenSCManagerW(ptr::null(), ptr::null(), desired_access) };
    if handle.is_null() {
        Err(ErrorCode::last_error())
    } else {
        Ok(handle)
    }
}

/// Opens a service by name
pub fn open_service(manager: SC_HANDLE, name: &str, desired_access: u32) -> Win32Result<SC_HANDLE> {
    let wide = string_to_wide(name);
    let handle = unsafe { OpenServiceW(manager, wide.as_ptr(), desired_access) };
    if handle.is_null() {
        Err(ErrorCode::last_error())
    } else {
        Ok(handle)
    }
}

/// Current status and hosting process of a service
pub fn query_service_status(service: SC_HANDLE) -> Win32Result<SERVICE_STATUS_PROCESS> {
    let mut status: SERVICE_STATUS_PROCESS = unsafe { mem::zeroed() };
    let mut needed: DWORD = 0;
    check(unsafe {
        QueryServiceStatusEx(
            service,
            SC_STATUS_PROCESS_INFO,
            &mut status as *mut SERVICE_STATUS_PROCESS as *mut u8,
            mem::size_of::<SERVICE_STATUS_PROCESS>() as DWORD,
            &mut needed,
        )
    })?;
    Ok(status)
}

/// Requests a service start without arguments
pub fn start_service(service: SC_HANDLE) -> Win32Result<()> {
    check(unsafe { StartServiceW(service, 0, ptr::null_mut()) })
}

/// Safe wrapper for CloseServiceHandle
///
/// # Safety
/// The handle must be a valid service or manager handle
pub unsafe fn close_service_handle(handle: SC_HANDLE) -> Win32Result<()> {
    check(CloseServiceHandle(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::bindings::kernel32;
    use winapi::um::winnt::{TokenPrivileges, TOKEN_QUERY};

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_debug_privilege_name_round_trip() {
        let luid = lookup_privilege_value("SeDebugPrivilege").unwrap();
        assert_eq!(lookup_privilege_name(luid).unwrap(), "SeDebugPrivilege");
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_unknown_privilege_name() {
        assert!(lookup_privilege_value("SeNonexistentPrivilege").is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_read_own_token_privileges() {
        let token = open_process_token(kernel32::current_process(), TOKEN_QUERY).unwrap();
        let buffer = token_information(token, TokenPrivileges).unwrap();
        assert!(!buffer.is_empty());
        unsafe {
            kernel32::close_handle(token).unwrap();
        }
    }
}
