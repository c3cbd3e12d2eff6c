//! Core type definitions
//!
//! Launch requests and strategies, the token privilege model, process
//! snapshot entries, errors and the exit-code mapping.

mod error;
mod exit;
mod launch;
mod privilege;
mod process_info;

pub use error::{
    ElevationError, ElevationResult, ErrorKind, PlatformCode, SERVICE_REQUEST_TIMEOUT,
};
pub use exit::{ExitCoordinator, Outcome, EXIT_CODE_BASE};
pub use launch::{LaunchOptions, LaunchReport, LaunchRequest, LaunchStrategy};
pub use privilege::{
    Luid, Privilege, PrivilegeSet, PrivilegeState, SE_PRIVILEGE_ENABLED,
    SE_PRIVILEGE_ENABLED_BY_DEFAULT, SE_PRIVILEGE_REMOVED,
};
pub use process_info::ProcessEntry;

pub type ProcessId = u32;
