//! Enabling every privilege a token holds

use crate::core::types::{ElevationResult, Luid, PrivilegeSet};
use tracing::debug;

/// Read/adjust access to a token's privilege list
pub trait TokenPrivileges {
    /// Current privilege entries of the token
    fn privileges(&self) -> ElevationResult<PrivilegeSet>;

    /// Applies `set` to the token in a single adjustment
    fn adjust(&self, set: &PrivilegeSet) -> ElevationResult<()>;

    /// Display name of a privilege, when it can be resolved
    fn privilege_name(&self, _luid: Luid) -> Option<String> {
        None
    }
}

/// Enables every privilege present in `token`, including the ones disabled by
/// default, and returns the resulting set.
///
/// Privileges the token does not hold are never added. A token that is already
/// fully enabled is left untouched. With `verbose`, one line per privilege is
/// logged.
pub fn set_all_privileges<T>(token: &T, verbose: bool) -> ElevationResult<PrivilegeSet>
where
    T: TokenPrivileges + ?Sized,
{
    let mut set = token.privileges()?;
    if set.enable_all() > 0 {
        token.adjust(&set)?;
    }

    if verbose {
        for privilege in &set {
            let name = token
                .privilege_name(privilege.luid)
                .unwrap_or_else(|| privilege.luid.to_string());
            debug!("Privilege {}: {}", name, privilege.state());
        }
    }

    Ok(set)
}
