//! Core module containing the fundamental types shared by the CLI layer,
//! the elevation core and the Windows bindings.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ElevationError, ElevationResult, ErrorKind, ExitCoordinator, LaunchOptions, LaunchReport,
    LaunchRequest, LaunchStrategy, Outcome, PrivilegeSet,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
