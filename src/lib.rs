//! superuser library: launch a process as the TrustedInstaller service's
//! identity with every privilege of its token enabled

pub mod cli;
pub mod config;
pub mod core;
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{
    ElevationError, ElevationResult, ErrorKind, ExitCoordinator, LaunchOptions, LaunchReport,
    LaunchRequest, LaunchStrategy, Outcome, ProcessId,
};
pub use process::{ElevatedProcessLauncher, ElevationPlatform};

// Re-export core directly for full access
pub use crate::core::*;
