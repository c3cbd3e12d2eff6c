//! Elevation core
//!
//! Debug privilege acquisition, the borrowed system context, the privileged
//! service locator, token provisioning and the elevated process launcher.
//! The sequencing logic is platform independent; the pieces that talk to
//! Windows are only compiled there.

pub mod context;
pub mod handle;
pub mod launcher;
pub mod privileges;
pub mod service;

#[cfg(windows)]
pub mod creation;
#[cfg(windows)]
pub mod enumerator;
#[cfg(windows)]
pub mod token;

pub use context::select_reference_processes;
pub use handle::ProcessAccess;
pub use launcher::{ElevatedProcessLauncher, ElevationPlatform};
pub use privileges::{set_all_privileges, TokenPrivileges};
pub use service::{
    service_process_access, wait_until_running, PollPolicy, ServiceControl, ServiceState,
    ServiceStatus,
};

#[cfg(windows)]
pub use context::{create_system_context, SystemContext};
#[cfg(windows)]
pub use enumerator::{enumerate_processes, ProcessEnumerator};
#[cfg(windows)]
pub use handle::{ChildProcess, ProcessHandle, ThreadHandle};
#[cfg(windows)]
pub use privileges::acquire_se_debug_privilege;
#[cfg(windows)]
pub use service::{get_privileged_service_process, ScmService};
#[cfg(windows)]
pub use token::{derive_child_token, get_primary_token, AccessToken};
