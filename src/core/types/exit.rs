//! Mapping of invocation results to process exit codes

use super::{ErrorKind, LaunchReport};

/// Offset applied to failure codes when the child exit code is propagated
pub const EXIT_CODE_BASE: i32 = 1_000_000;

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Help,
    Launched(LaunchReport),
    Failed(ErrorKind),
}

/// Turns an [`Outcome`] into the exit code of the tool
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitCoordinator {
    /// Return the child's exit code on success and `-(EXIT_CODE_BASE + code)`
    /// on failure
    pub propagate_child_code: bool,
}

impl ExitCoordinator {
    pub fn new(propagate_child_code: bool) -> Self {
        ExitCoordinator {
            propagate_child_code,
        }
    }

    pub fn exit_code(&self, outcome: &Outcome) -> i32 {
        let code = match outcome {
            Outcome::Help | Outcome::Launched(_) => 0,
            Outcome::Failed(kind) => kind.exit_code(),
        };
        if !self.propagate_child_code {
            return code;
        }
        match outcome {
            Outcome::Failed(_) => -(EXIT_CODE_BASE + code),
            // DWORD exit codes keep their bit pattern
            Outcome::Launched(report) => report.exit_code.map(|c| c as i32).unwrap_or(0),
            Outcome::Help => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launched(exit_code: Option<u32>) -> Outcome {
        Outcome::Launched(LaunchReport { pid: 100, exit_code })
    }

    #[test]
    fn test_plain_codes() {
        let coordinator = ExitCoordinator::new(false);
        assert_eq!(coordinator.exit_code(&Outcome::Help), 0);
        assert_eq!(coordinator.exit_code(&launched(Some(7))), 0);
        assert_eq!(
            coordinator.exit_code(&Outcome::Failed(ErrorKind::PrivilegeUnavailable)),
            2
        );
        assert_eq!(
            coordinator.exit_code(&Outcome::Failed(ErrorKind::ProcessCreationFailed)),
            4
        );
    }

    #[test]
    fn test_propagated_codes() {
        let coordinator = ExitCoordinator::new(true);
        assert_eq!(coordinator.exit_code(&launched(Some(7))), 7);
        assert_eq!(coordinator.exit_code(&launched(None)), 0);
        assert_eq!(coordinator.exit_code(&Outcome::Help), 0);
        assert_eq!(
            coordinator.exit_code(&Outcome::Failed(ErrorKind::InvalidOption)),
            -1_000_001
        );
        assert_eq!(
            coordinator.exit_code(&Outcome::Failed(ErrorKind::ServiceStartTimeout)),
            -1_000_003
        );
    }

    #[test]
    fn test_large_child_code_keeps_bits() {
        let coordinator = ExitCoordinator::new(true);
        assert_eq!(coordinator.exit_code(&launched(Some(0xC000_0005))), 0xC000_0005u32 as i32);
    }
}
