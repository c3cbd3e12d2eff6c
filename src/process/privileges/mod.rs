//! Windows privilege management

pub mod adjust;
#[cfg(windows)]
pub mod debug;

pub use adjust::{set_all_privileges, TokenPrivileges};
#[cfg(windows)]
pub use debug::acquire_se_debug_privilege;
