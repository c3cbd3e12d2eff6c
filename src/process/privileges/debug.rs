//! SeDebugPrivilege handling for opening processes the caller does not own

use crate::core::types::{
    ElevationError, ElevationResult, PlatformCode, Privilege, PrivilegeSet, SE_PRIVILEGE_ENABLED,
};
use crate::process::privileges::TokenPrivileges;
use crate::process::token::AccessToken;
use crate::windows::bindings::{advapi32, kernel32};
use crate::windows::utils::ErrorCode;
use tracing::debug;
use winapi::um::winnt::{TOKEN_ADJUST_PRIVILEGES, TOKEN_QUERY};

const SE_DEBUG_NAME: &str = "SeDebugPrivilege";

/// Enables SeDebugPrivilege on the caller's own token.
///
/// Fails with `PrivilegeUnavailable` when the token does not hold the
/// privilege at all, which is the case for non-elevated callers.
pub fn acquire_se_debug_privilege() -> ElevationResult<()> {
    let token = advapi32::open_process_token(
        kernel32::current_process(),
        TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
    )
    .map(AccessToken::from_raw)
    .map_err(unavailable)?;

    let luid = advapi32::lookup_privilege_value(SE_DEBUG_NAME).map_err(unavailable)?;
    let request = PrivilegeSet::new(vec![Privilege::new(luid, SE_PRIVILEGE_ENABLED)]);

    // NotAllAssigned means the token lacks the privilege
    token.adjust(&request).map_err(|e| ElevationError::PrivilegeUnavailable {
        code: PlatformCode(e.platform_code().unwrap_or(ErrorCode::NotAllAssigned.code())),
    })?;

    debug!("{} enabled", SE_DEBUG_NAME);
    Ok(())
}

fn unavailable(code: ErrorCode) -> ElevationError {
    ElevationError::PrivilegeUnavailable {
        code: PlatformCode(code.code()),
    }
}
