//! Borrowing the LocalSystem identity for the calling thread

use crate::core::types::ProcessEntry;

#[cfg(windows)]
use crate::config::ContextConfig;
#[cfg(windows)]
use crate::core::types::{ElevationError, ElevationResult};
#[cfg(windows)]
use crate::process::enumerator::enumerate_processes;
#[cfg(windows)]
use crate::process::handle::{ProcessAccess, ProcessHandle};
#[cfg(windows)]
use crate::process::privileges::set_all_privileges;
#[cfg(windows)]
use crate::process::token::AccessToken;
#[cfg(windows)]
use crate::windows::bindings::advapi32;
#[cfg(windows)]
use crate::windows::utils::ErrorCode;
#[cfg(windows)]
use tracing::{debug, warn};
#[cfg(windows)]
use winapi::um::winnt::{TOKEN_DUPLICATE, TOKEN_QUERY};

/// Orders the processes whose image matches one of `names` by the position
/// of that name, keeping snapshot order among equal names. Kernel
/// pseudo-processes are never candidates.
pub fn select_reference_processes<'a>(
    entries: &'a [ProcessEntry],
    names: &[String],
) -> Vec<&'a ProcessEntry> {
    names
        .iter()
        .flat_map(|name| {
            entries
                .iter()
                .filter(move |e| !e.is_system_process() && e.has_image_name(name))
        })
        .collect()
}

/// Impersonation of a LocalSystem token on the calling thread.
///
/// Dropping the guard reverts the thread to its own token and closes the
/// borrowed one.
#[cfg(windows)]
pub struct SystemContext {
    _token: AccessToken,
}

#[cfg(windows)]
impl Drop for SystemContext {
    fn drop(&mut self) {
        if let Err(e) = advapi32::revert_to_self() {
            warn!("Failed to revert thread impersonation: {}", e);
        }
    }
}

/// Impersonates the first configured reference process that runs as
/// LocalSystem, with every privilege of the borrowed token enabled.
#[cfg(windows)]
pub fn create_system_context(
    config: &ContextConfig,
    verbose: bool,
) -> ElevationResult<SystemContext> {
    let processes = enumerate_processes()
        .map_err(|e| ElevationError::system_context("process snapshot failed", e.code()))?;

    let candidates = select_reference_processes(&processes, &config.reference_processes);
    let mut last_code = ErrorCode::FileNotFound.code();
    for entry in candidates {
        match borrow_identity(entry, verbose) {
            Ok(context) => {
                debug!("Impersonating {} ({})", entry.name, entry.pid);
                return Ok(context);
            }
            Err(e) => {
                debug!("Skipping {} ({}): {}", entry.name, entry.pid, e);
                last_code = e.platform_code().unwrap_or(last_code);
            }
        }
    }

    Err(ElevationError::system_context(
        format!(
            "no usable LocalSystem process among {}",
            config.reference_processes.join(", ")
        ),
        last_code,
    ))
}

#[cfg(windows)]
fn borrow_identity(entry: &ProcessEntry, verbose: bool) -> ElevationResult<SystemContext> {
    let process = ProcessHandle::open(entry.pid, ProcessAccess::QUERY_LIMITED_INFORMATION)
        .map_err(|e| {
            ElevationError::system_context(format!("cannot open {}", entry.name), e.code())
        })?;
    let source = AccessToken::open(
        process.raw(),
        TOKEN_DUPLICATE | TOKEN_QUERY,
        "open reference process token",
    )?;

    if !source.is_local_system()? {
        return Err(ElevationError::system_context(
            format!("{} does not run as LocalSystem", entry.name),
            ErrorCode::AccessDenied.code(),
        ));
    }

    let token = source.duplicate_for_impersonation()?;
    // Creating a process with another token needs the borrowed privileges
    set_all_privileges(&token, verbose)?;
    advapi32::set_thread_token(token.raw())
        .map_err(|e| ElevationError::system_context("cannot impersonate", e.code()))?;

    Ok(SystemContext { _token: token })
}
