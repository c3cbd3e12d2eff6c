//! Access tokens of the privileged service and of launched children

use crate::core::types::{ElevationError, ElevationResult, Luid, PrivilegeSet};
use crate::process::handle::ProcessHandle;
use crate::process::privileges::TokenPrivileges;
use crate::windows::bindings::advapi32;
use crate::windows::types::Handle;
use crate::windows::utils::ErrorCode;
use std::slice;
use winapi::um::winnt::{
    TokenImpersonation, TokenPrimary, TokenPrivileges as TokenPrivilegesClass, HANDLE,
    TOKEN_ADJUST_PRIVILEGES, TOKEN_ALL_ACCESS, TOKEN_DUPLICATE, TOKEN_QUERY,
};

/// Owned access token handle
pub struct AccessToken {
    handle: Handle,
}

impl AccessToken {
    pub fn from_raw(handle: HANDLE) -> Self {
        AccessToken {
            handle: Handle::new(handle),
        }
    }

    /// Opens the token of `process` with `access`
    pub fn open(process: HANDLE, access: u32, operation: &'static str) -> ElevationResult<Self> {
        advapi32::open_process_token(process, access)
            .map(Self::from_raw)
            .map_err(|e| token_error(operation, e))
    }

    pub fn raw(&self) -> HANDLE {
        self.handle.raw()
    }

    /// Moves the token to display session `session_id`
    pub fn set_session_id(&self, session_id: u32) -> ElevationResult<()> {
        advapi32::set_token_session_id(self.raw(), session_id)
            .map_err(|e| token_error("set token session", e))
    }

    /// Whether the token belongs to the LocalSystem account
    pub fn is_local_system(&self) -> ElevationResult<bool> {
        advapi32::is_local_system_token(self.raw()).map_err(|e| token_error("query token user", e))
    }

    /// Duplicates into a new impersonation token usable with SetThreadToken
    pub fn duplicate_for_impersonation(&self) -> ElevationResult<Self> {
        advapi32::duplicate_token(self.raw(), TOKEN_ALL_ACCESS, TokenImpersonation)
            .map(Self::from_raw)
            .map_err(|e| token_error("duplicate impersonation token", e))
    }
}

impl TokenPrivileges for AccessToken {
    fn privileges(&self) -> ElevationResult<PrivilegeSet> {
        let buffer = advapi32::token_information(self.raw(), TokenPrivilegesClass)
            .map_err(|e| token_error("query token privileges", e))?;
        let words =
            unsafe { slice::from_raw_parts(buffer.as_ptr() as *const u32, buffer.len() * 2) };
        PrivilegeSet::from_words(words)
            .ok_or_else(|| token_error("query token privileges", ErrorCode::InsufficientBuffer))
    }

    fn adjust(&self, set: &PrivilegeSet) -> ElevationResult<()> {
        let mut words = set.to_words();
        advapi32::adjust_token_privileges(self.raw(), &mut words)
            .map_err(|e| token_error("adjust token privileges", e))
    }

    fn privilege_name(&self, luid: Luid) -> Option<String> {
        advapi32::lookup_privilege_name(luid).ok()
    }
}

/// Duplicates the primary token of the service process into a new primary
/// token with full access, ready to be assigned to a new process.
pub fn get_primary_token(process: &ProcessHandle) -> ElevationResult<AccessToken> {
    let source = AccessToken::open(
        process.raw(),
        TOKEN_DUPLICATE | TOKEN_QUERY,
        "open service token",
    )?;
    advapi32::duplicate_token(source.raw(), TOKEN_ALL_ACCESS, TokenPrimary)
        .map(AccessToken::from_raw)
        .map_err(|e| token_error("duplicate service token", e))
}

/// Opens the token of an already-created child for privilege adjustment
pub fn derive_child_token(process: &ProcessHandle) -> ElevationResult<AccessToken> {
    AccessToken::open(
        process.raw(),
        TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
        "open child token",
    )
}

fn token_error(operation: &'static str, code: ErrorCode) -> ElevationError {
    ElevationError::token(operation, code.code())
}
