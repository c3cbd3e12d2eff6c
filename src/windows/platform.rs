//! The real elevation platform backed by the Win32 API

use crate::config::Config;
use crate::core::types::{ElevationResult, LaunchRequest, LaunchStrategy, ProcessId};
use crate::process::context::{create_system_context, SystemContext};
use crate::process::creation::{create_suspended_with_parent, create_with_token};
use crate::process::handle::{ChildProcess, ProcessHandle};
use crate::process::launcher::ElevationPlatform;
use crate::process::privileges::acquire_se_debug_privilege;
use crate::process::service::get_privileged_service_process;
use crate::process::token::{derive_child_token, get_primary_token, AccessToken};
use crate::windows::bindings::kernel32;
use tracing::{debug, warn};

/// Win32 implementation of [`ElevationPlatform`]
pub struct WindowsPlatform {
    config: Config,
}

impl WindowsPlatform {
    pub fn new(config: Config) -> Self {
        WindowsPlatform { config }
    }
}

impl ElevationPlatform for WindowsPlatform {
    type Context = SystemContext;
    type ServiceProcess = ProcessHandle;
    type Token = AccessToken;
    type Child = ChildProcess;

    fn acquire_debug_privilege(&mut self) -> ElevationResult<()> {
        acquire_se_debug_privilege()
    }

    fn create_system_context(&mut self, verbose: bool) -> ElevationResult<SystemContext> {
        create_system_context(&self.config.context, verbose)
    }

    fn open_service_process(&mut self, strategy: LaunchStrategy) -> ElevationResult<ProcessHandle> {
        get_privileged_service_process(&self.config.service, strategy)
    }

    fn primary_token(&mut self, service: &ProcessHandle) -> ElevationResult<AccessToken> {
        get_primary_token(service)
    }

    fn bind_console_session(&mut self, token: &AccessToken) -> ElevationResult<()> {
        match kernel32::active_console_session_id() {
            Some(session_id) => {
                debug!("Binding token to console session {}", session_id);
                token.set_session_id(session_id)
            }
            None => {
                debug!("No active console session");
                Ok(())
            }
        }
    }

    fn create_with_token(
        &mut self,
        token: &AccessToken,
        request: &LaunchRequest,
    ) -> ElevationResult<ChildProcess> {
        create_with_token(token, request)
    }

    fn create_suspended(
        &mut self,
        parent: &ProcessHandle,
        request: &LaunchRequest,
    ) -> ElevationResult<ChildProcess> {
        create_suspended_with_parent(parent, request)
    }

    fn child_token(&mut self, child: &ChildProcess) -> ElevationResult<AccessToken> {
        derive_child_token(&child.process)
    }

    fn resume(&mut self, child: &ChildProcess) -> ElevationResult<()> {
        child.resume()
    }

    fn terminate(&mut self, child: &ChildProcess) {
        if let Err(e) = child.process.terminate(1) {
            warn!("Failed to terminate suspended process {}: {}", child.pid(), e);
        }
    }

    fn child_pid(&self, child: &ChildProcess) -> ProcessId {
        child.pid()
    }

    fn wait(&mut self, child: &ChildProcess) -> Option<u32> {
        match child.process.wait_for_exit() {
            Ok(code) => Some(code),
            Err(e) => {
                warn!("Failed to get exit code of process {}: {}", child.pid(), e);
                None
            }
        }
    }
}
