//! Error types for the elevation core

use std::fmt;
use thiserror::Error;

/// Win32 error code attached to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCode(pub u32);

impl fmt::Display for PlatformCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {} (0x{:08X})", self.0, self.0)
    }
}

/// ERROR_SERVICE_REQUEST_TIMEOUT, reported when the start poll is exhausted
pub const SERVICE_REQUEST_TIMEOUT: PlatformCode = PlatformCode(1053);

/// Main error type for elevation operations
#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("{0}")]
    InconsistentOptions(String),

    #[error("Failed to acquire SeDebugPrivilege, is the caller an administrator? ({code})")]
    PrivilegeUnavailable { code: PlatformCode },

    #[error("Failed to establish system security context: {reason} ({code})")]
    SystemContextUnavailable { reason: String, code: PlatformCode },

    #[error("Service {service} could not be opened ({code})")]
    ServiceNotFound { service: String, code: PlatformCode },

    #[error("Service {service} failed to start ({code})")]
    ServiceStartFailed { service: String, code: PlatformCode },

    #[error("Service {service} did not reach the running state after {attempts} polls ({code})")]
    ServiceStartTimeout {
        service: String,
        attempts: u32,
        code: PlatformCode,
    },

    #[error("Failed to open process {pid} hosting service {service} ({code})")]
    ServiceProcessUnavailable {
        service: String,
        pid: u32,
        code: PlatformCode,
    },

    #[error("Token provisioning failed during {operation} ({code})")]
    TokenProvisioningFailed {
        operation: &'static str,
        code: PlatformCode,
    },

    #[error("Process creation failed for \"{command}\" ({code})")]
    ProcessCreationFailed { command: String, code: PlatformCode },

    #[error("Unsupported platform: {0}")]
    Unsupported(String),
}

/// Result type alias for elevation operations
pub type ElevationResult<T> = Result<T, ElevationError>;

/// Discriminant of [`ElevationError`], used for exit-code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidOption,
    InconsistentOptions,
    PrivilegeUnavailable,
    SystemContextUnavailable,
    ServiceNotFound,
    ServiceStartFailed,
    ServiceStartTimeout,
    ServiceProcessUnavailable,
    TokenProvisioningFailed,
    ProcessCreationFailed,
    Unsupported,
}

impl ErrorKind {
    /// Exit code reported when the child exit code is not propagated
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::InvalidOption | ErrorKind::InconsistentOptions => 1,
            ErrorKind::PrivilegeUnavailable => 2,
            ErrorKind::SystemContextUnavailable
            | ErrorKind::ServiceNotFound
            | ErrorKind::ServiceStartFailed
            | ErrorKind::ServiceStartTimeout
            | ErrorKind::ServiceProcessUnavailable => 3,
            ErrorKind::ProcessCreationFailed => 4,
            ErrorKind::TokenProvisioningFailed | ErrorKind::Unsupported => 5,
        }
    }
}

impl ElevationError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ElevationError::InvalidOption(_) => ErrorKind::InvalidOption,
            ElevationError::InconsistentOptions(_) => ErrorKind::InconsistentOptions,
            ElevationError::PrivilegeUnavailable { .. } => ErrorKind::PrivilegeUnavailable,
            ElevationError::SystemContextUnavailable { .. } => {
                ErrorKind::SystemContextUnavailable
            }
            ElevationError::ServiceNotFound { .. } => ErrorKind::ServiceNotFound,
            ElevationError::ServiceStartFailed { .. } => ErrorKind::ServiceStartFailed,
            ElevationError::ServiceStartTimeout { .. } => ErrorKind::ServiceStartTimeout,
            ElevationError::ServiceProcessUnavailable { .. } => {
                ErrorKind::ServiceProcessUnavailable
            }
            ElevationError::TokenProvisioningFailed { .. } => ErrorKind::TokenProvisioningFailed,
            ElevationError::ProcessCreationFailed { .. } => ErrorKind::ProcessCreationFailed,
            ElevationError::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    /// Underlying Win32 error code, when the failure came from the platform
    pub fn platform_code(&self) -> Option<u32> {
        match self {
            ElevationError::PrivilegeUnavailable { code }
            | ElevationError::SystemContextUnavailable { code, .. }
            | ElevationError::ServiceNotFound { code, .. }
            | ElevationError::ServiceStartFailed { code, .. }
            | ElevationError::ServiceStartTimeout { code, .. }
            | ElevationError::ServiceProcessUnavailable { code, .. }
            | ElevationError::TokenProvisioningFailed { code, .. }
            | ElevationError::ProcessCreationFailed { code, .. } => Some(code.0),
            _ => None,
        }
    }

    /// Creates a token provisioning error
    pub fn token(operation: &'static str, code: u32) -> Self {
        ElevationError::TokenProvisioningFailed {
            operation,
            code: PlatformCode(code),
        }
    }

    /// Creates a system context error
    pub fn system_context(reason: impl Into<String>, code: u32) -> Self {
        ElevationError::SystemContextUnavailable {
            reason: reason.into(),
            code: PlatformCode(code),
        }
    }

    /// Creates the error for a service that never reached the running state
    pub fn service_timeout(service: impl Into<String>, attempts: u32) -> Self {
        ElevationError::ServiceStartTimeout {
            service: service.into(),
            attempts,
            code: SERVICE_REQUEST_TIMEOUT,
        }
    }

    /// Creates a process creation error
    pub fn process_creation(command: impl Into<String>, code: u32) -> Self {
        ElevationError::ProcessCreationFailed {
            command: command.into(),
            code: PlatformCode(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ElevationError::ProcessCreationFailed {
            command: "missing.exe".to_string(),
            code: PlatformCode(2),
        };
        assert_eq!(
            err.to_string(),
            "Process creation failed for \"missing.exe\" (error 2 (0x00000002))"
        );

        let err = ElevationError::service_timeout("TrustedInstaller", 5);
        assert_eq!(
            err.to_string(),
            "Service TrustedInstaller did not reach the running state after 5 polls \
             (error 1053 (0x0000041D))"
        );
    }

    #[test]
    fn test_privilege_unavailable_mentions_administrator() {
        let err = ElevationError::PrivilegeUnavailable {
            code: PlatformCode(1300),
        };
        let msg = err.to_string();
        assert!(msg.contains("SeDebugPrivilege"));
        assert!(msg.contains("administrator"));
        assert!(msg.contains("1300"));
    }

    #[test]
    fn test_kind_exit_codes() {
        let cases = [
            (ErrorKind::InvalidOption, 1),
            (ErrorKind::InconsistentOptions, 1),
            (ErrorKind::PrivilegeUnavailable, 2),
            (ErrorKind::SystemContextUnavailable, 3),
            (ErrorKind::ServiceNotFound, 3),
            (ErrorKind::ServiceStartFailed, 3),
            (ErrorKind::ServiceStartTimeout, 3),
            (ErrorKind::ServiceProcessUnavailable, 3),
            (ErrorKind::ProcessCreationFailed, 4),
            (ErrorKind::TokenProvisioningFailed, 5),
            (ErrorKind::Unsupported, 5),
        ];
        for (kind, code) in cases {
            assert_eq!(kind.exit_code(), code, "{:?}", kind);
        }
    }

    #[test]
    fn test_platform_code() {
        assert_eq!(ElevationError::token("duplicate", 5).platform_code(), Some(5));
        assert_eq!(
            ElevationError::system_context("no candidate", 1168).platform_code(),
            Some(1168)
        );
        assert_eq!(
            ElevationError::InvalidOption("x".to_string()).platform_code(),
            None
        );
    }

    #[test]
    fn test_every_service_failure_carries_a_code() {
        let failures = [
            ElevationError::ServiceNotFound {
                service: "svc".to_string(),
                code: PlatformCode(1060),
            },
            ElevationError::ServiceStartFailed {
                service: "svc".to_string(),
                code: PlatformCode(1058),
            },
            ElevationError::service_timeout("svc", 1),
        ];
        for err in &failures {
            assert!(err.platform_code().is_some(), "{:?}", err.kind());
        }
        assert_eq!(failures[2].platform_code(), Some(1053));
    }

    #[test]
    fn test_helper_kinds() {
        assert_eq!(
            ElevationError::token("adjust", 0).kind(),
            ErrorKind::TokenProvisioningFailed
        );
        assert_eq!(
            ElevationError::process_creation("cmd.exe", 2).kind(),
            ErrorKind::ProcessCreationFailed
        );
        assert_eq!(
            ElevationError::system_context("x", 5).kind(),
            ErrorKind::SystemContextUnavailable
        );
    }
}
