//! Locating, starting and opening the privileged service process

use crate::config::ServiceConfig;
use crate::core::types::{ElevationError, ElevationResult, LaunchStrategy, ProcessId};
use crate::process::handle::ProcessAccess;
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

#[cfg(windows)]
use crate::core::types::PlatformCode;
#[cfg(windows)]
use crate::process::handle::ProcessHandle;
#[cfg(windows)]
use crate::windows::bindings::advapi32;
#[cfg(windows)]
use crate::windows::types::ServiceHandle;
#[cfg(windows)]
use crate::windows::utils::ErrorCode;

/// Service states as reported by the service control manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    Unknown(u32),
}

impl ServiceState {
    /// Maps a raw `SERVICE_*` state value
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => ServiceState::Stopped,
            2 => ServiceState::StartPending,
            3 => ServiceState::StopPending,
            4 => ServiceState::Running,
            5 => ServiceState::ContinuePending,
            6 => ServiceState::PausePending,
            7 => ServiceState::Paused,
            other => ServiceState::Unknown(other),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Stopped => write!(f, "stopped"),
            ServiceState::StartPending => write!(f, "start pending"),
            ServiceState::StopPending => write!(f, "stop pending"),
            ServiceState::Running => write!(f, "running"),
            ServiceState::ContinuePending => write!(f, "continue pending"),
            ServiceState::PausePending => write!(f, "pause pending"),
            ServiceState::Paused => write!(f, "paused"),
            ServiceState::Unknown(v) => write!(f, "unknown ({})", v),
        }
    }
}

/// Snapshot of a service's state and hosting process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub state: ServiceState,
    /// Zero unless the service is running
    pub pid: ProcessId,
}

impl ServiceStatus {
    pub fn new(state: ServiceState, pid: ProcessId) -> Self {
        ServiceStatus { state, pid }
    }
}

/// Control over a single service
pub trait ServiceControl {
    fn name(&self) -> &str;

    fn query(&self) -> ElevationResult<ServiceStatus>;

    /// Requests a start; a service that is already running is not an error
    fn start(&self) -> ElevationResult<()>;
}

/// Bound of the start poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        PollPolicy {
            interval,
            max_attempts,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.poll_interval(), config.max_poll_attempts)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 100)
    }
}

/// Polls `service` until it runs, starting it whenever it is seen stopped,
/// and returns the pid of its hosting process.
///
/// At most `policy.max_attempts` queries are made, one `policy.interval`
/// apart; exhausting them fails with `ServiceStartTimeout`.
pub fn wait_until_running<S>(service: &S, policy: &PollPolicy) -> ElevationResult<ProcessId>
where
    S: ServiceControl + ?Sized,
{
    for attempt in 1..=policy.max_attempts {
        let status = service.query()?;
        match status.state {
            ServiceState::Running if status.pid != 0 => {
                debug!("Service {} running in process {}", service.name(), status.pid);
                return Ok(status.pid);
            }
            ServiceState::Stopped => {
                debug!("Starting service {}", service.name());
                service.start()?;
            }
            state => debug!("Service {} is {}", service.name(), state),
        }

        if attempt < policy.max_attempts {
            thread::sleep(policy.interval);
        }
    }

    Err(ElevationError::service_timeout(service.name(), policy.max_attempts))
}

/// Rights requested on the service process for `strategy`
pub fn service_process_access(strategy: LaunchStrategy) -> ProcessAccess {
    match strategy {
        LaunchStrategy::Seamless => ProcessAccess::combine(&[
            ProcessAccess::QUERY_INFORMATION,
            ProcessAccess::DUP_HANDLE,
        ]),
        LaunchStrategy::ParentReassigned => ProcessAccess::combine(&[
            ProcessAccess::QUERY_INFORMATION,
            ProcessAccess::DUP_HANDLE,
            ProcessAccess::CREATE_PROCESS,
        ]),
    }
}

/// A service opened through the service control manager
#[cfg(windows)]
pub struct ScmService {
    name: String,
    service: ServiceHandle,
    // Kept open for the lifetime of the service handle
    _manager: ServiceHandle,
}

#[cfg(windows)]
impl ScmService {
    /// Opens `name` with query and start rights
    pub fn open(name: &str) -> ElevationResult<Self> {
        use winapi::um::winsvc::{SC_MANAGER_CONNECT, SERVICE_QUERY_STATUS, SERVICE_START};

        let not_found = |e: ErrorCode| ElevationError::ServiceNotFound {
            service: name.to_string(),
            code: PlatformCode(e.code()),
        };

        let manager =
            ServiceHandle::new(advapi32::open_sc_manager(SC_MANAGER_CONNECT).map_err(not_found)?);
        let service =
            advapi32::open_service(manager.raw(), name, SERVICE_QUERY_STATUS | SERVICE_START)
                .map_err(not_found)?;

        Ok(ScmService {
            name: name.to_string(),
            service: ServiceHandle::new(service),
            _manager: manager,
        })
    }

    fn start_failed(&self, code: ErrorCode) -> ElevationError {
        ElevationError::ServiceStartFailed {
            service: self.name.clone(),
            code: PlatformCode(code.code()),
        }
    }
}

#[cfg(windows)]
impl ServiceControl for ScmService {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self) -> ElevationResult<ServiceStatus> {
        let status =
            advapi32::query_service_status(self.service.raw()).map_err(|e| self.start_failed(e))?;
        Ok(ServiceStatus::new(
            ServiceState::from_raw(status.dwCurrentState),
            status.dwProcessId,
        ))
    }

    fn start(&self) -> ElevationResult<()> {
        match advapi32::start_service(self.service.raw()) {
            Ok(()) | Err(ErrorCode::ServiceAlreadyRunning) => Ok(()),
            Err(e) => Err(self.start_failed(e)),
        }
    }
}

/// Makes sure the configured privileged service runs and opens its hosting
/// process with the rights `strategy` needs.
#[cfg(windows)]
pub fn get_privileged_service_process(
    config: &ServiceConfig,
    strategy: LaunchStrategy,
) -> ElevationResult<ProcessHandle> {
    let service = ScmService::open(&config.name)?;
    let pid = wait_until_running(&service, &PollPolicy::from_config(config))?;

    ProcessHandle::open(pid, service_process_access(strategy)).map_err(|e| {
        ElevationError::ServiceProcessUnavailable {
            service: config.name.clone(),
            pid,
            code: PlatformCode(e.code()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ErrorKind;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    struct ScriptedService {
        script: RefCell<VecDeque<ServiceStatus>>,
        fallback: ServiceStatus,
        starts: Cell<u32>,
        queries: Cell<u32>,
    }

    impl ScriptedService {
        fn new(script: Vec<ServiceStatus>, fallback: ServiceStatus) -> Self {
            ScriptedService {
                script: RefCell::new(script.into()),
                fallback,
                starts: Cell::new(0),
                queries: Cell::new(0),
            }
        }
    }

    impl ServiceControl for ScriptedService {
        fn name(&self) -> &str {
            "TrustedInstaller"
        }

        fn query(&self) -> ElevationResult<ServiceStatus> {
            self.queries.set(self.queries.get() + 1);
            Ok(self.script.borrow_mut().pop_front().unwrap_or(self.fallback))
        }

        fn start(&self) -> ElevationResult<()> {
            self.starts.set(self.starts.get() + 1);
            Ok(())
        }
    }

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(Duration::ZERO, max_attempts)
    }

    #[test]
    fn test_already_running() {
        let service = ScriptedService::new(vec![], ServiceStatus::new(ServiceState::Running, 812));
        assert_eq!(wait_until_running(&service, &fast(5)).unwrap(), 812);
        assert_eq!(service.starts.get(), 0);
        assert_eq!(service.queries.get(), 1);
    }

    #[test]
    fn test_starts_stopped_service() {
        let service = ScriptedService::new(
            vec![
                ServiceStatus::new(ServiceState::Stopped, 0),
                ServiceStatus::new(ServiceState::StartPending, 0),
                ServiceStatus::new(ServiceState::StartPending, 944),
            ],
            ServiceStatus::new(ServiceState::Running, 944),
        );
        assert_eq!(wait_until_running(&service, &fast(10)).unwrap(), 944);
        assert_eq!(service.starts.get(), 1);
        assert_eq!(service.queries.get(), 4);
    }

    #[test]
    fn test_running_without_pid_keeps_polling() {
        let service = ScriptedService::new(
            vec![ServiceStatus::new(ServiceState::Running, 0)],
            ServiceStatus::new(ServiceState::Running, 77),
        );
        assert_eq!(wait_until_running(&service, &fast(3)).unwrap(), 77);
    }

    #[test]
    fn test_never_running_times_out() {
        let service =
            ScriptedService::new(vec![], ServiceStatus::new(ServiceState::StartPending, 0));
        let err = wait_until_running(&service, &fast(7)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceStartTimeout);
        assert_eq!(service.queries.get(), 7);
        assert!(err.to_string().contains("7 polls"));
    }

    #[test]
    fn test_zero_attempts_times_out_without_query() {
        let service = ScriptedService::new(vec![], ServiceStatus::new(ServiceState::Running, 5));
        let err = wait_until_running(&service, &fast(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceStartTimeout);
        assert_eq!(service.queries.get(), 0);
    }

    #[test]
    fn test_state_from_raw() {
        assert_eq!(ServiceState::from_raw(1), ServiceState::Stopped);
        assert_eq!(ServiceState::from_raw(4), ServiceState::Running);
        assert_eq!(ServiceState::from_raw(7), ServiceState::Paused);
        assert_eq!(ServiceState::from_raw(42), ServiceState::Unknown(42));
        assert_eq!(ServiceState::StartPending.to_string(), "start pending");
    }

    #[test]
    fn test_service_process_access() {
        let seamless = service_process_access(LaunchStrategy::Seamless);
        let reassigned = service_process_access(LaunchStrategy::ParentReassigned);
        assert!(!seamless.contains(ProcessAccess::CREATE_PROCESS));
        assert!(reassigned.contains(ProcessAccess::CREATE_PROCESS));
        assert!(reassigned.contains(seamless));
    }

    #[test]
    fn test_policy_from_config() {
        let config = ServiceConfig {
            name: "TrustedInstaller".to_string(),
            poll_interval_ms: 250,
            max_poll_attempts: 8,
        };
        let policy = PollPolicy::from_config(&config);
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 8);
    }
}
