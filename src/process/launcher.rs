//! Elevated launch orchestration
//!
//! [`ElevatedProcessLauncher`] drives the whole sequence: debug privilege,
//! optional system context, service process, token provisioning, process
//! creation and the optional wait. Every platform operation goes through
//! [`ElevationPlatform`], implemented for real by
//! `crate::windows::WindowsPlatform`.

use crate::core::types::{
    ElevationResult, LaunchOptions, LaunchReport, LaunchRequest, LaunchStrategy, ProcessId,
};
use crate::process::privileges::{set_all_privileges, TokenPrivileges};
use tracing::{debug, warn};

/// Platform operations needed by the launcher.
///
/// Owned resources are associated types released by their own `Drop`, so an
/// early return anywhere in the sequence leaves nothing behind.
pub trait ElevationPlatform {
    /// Guard of the borrowed system identity; reverts on drop
    type Context;
    /// Handle to the privileged service's hosting process
    type ServiceProcess;
    type Token: TokenPrivileges;
    /// Created process and its primary thread
    type Child;

    fn acquire_debug_privilege(&mut self) -> ElevationResult<()>;

    fn create_system_context(&mut self, verbose: bool) -> ElevationResult<Self::Context>;

    fn open_service_process(
        &mut self,
        strategy: LaunchStrategy,
    ) -> ElevationResult<Self::ServiceProcess>;

    /// Duplicated primary token of the service process
    fn primary_token(&mut self, service: &Self::ServiceProcess) -> ElevationResult<Self::Token>;

    /// Moves `token` to the active console session
    fn bind_console_session(&mut self, token: &Self::Token) -> ElevationResult<()>;

    fn create_with_token(
        &mut self,
        token: &Self::Token,
        request: &LaunchRequest,
    ) -> ElevationResult<Self::Child>;

    fn create_suspended(
        &mut self,
        parent: &Self::ServiceProcess,
        request: &LaunchRequest,
    ) -> ElevationResult<Self::Child>;

    /// The child's own token, opened for privilege adjustment
    fn child_token(&mut self, child: &Self::Child) -> ElevationResult<Self::Token>;

    fn resume(&mut self, child: &Self::Child) -> ElevationResult<()>;

    fn terminate(&mut self, child: &Self::Child);

    fn child_pid(&self, child: &Self::Child) -> ProcessId;

    /// Blocks until the child exits; `None` when the exit code is unavailable
    fn wait(&mut self, child: &Self::Child) -> Option<u32>;
}

/// Runs one elevated launch on a platform
pub struct ElevatedProcessLauncher<P> {
    platform: P,
}

impl<P: ElevationPlatform> ElevatedProcessLauncher<P> {
    pub fn new(platform: P) -> Self {
        ElevatedProcessLauncher { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Launches `request` as described by `options` and, when asked to,
    /// waits for it to exit.
    pub fn run(
        &mut self,
        options: &LaunchOptions,
        request: &LaunchRequest,
    ) -> ElevationResult<LaunchReport> {
        debug!("Your command line is \"{}\"", request);

        self.platform.acquire_debug_privilege()?;

        let child = match options.strategy {
            LaunchStrategy::Seamless => self.launch_seamless(request, options.verbose)?,
            LaunchStrategy::ParentReassigned => {
                self.launch_parent_reassigned(request, options.verbose)?
            }
        };

        let pid = self.platform.child_pid(&child);
        debug!("Created process ID: {}", pid);

        let mut exit_code = None;
        if options.wait {
            debug!("Waiting for process to exit");
            exit_code = self.platform.wait(&child);
            debug!("Process exited");
            if let Some(code) = exit_code {
                debug!("Process exit code: {}", code as i32);
            }
        }

        Ok(LaunchReport { pid, exit_code })
    }

    /// Creates the child directly with a maximized copy of the service
    /// token, inside a borrowed system context that ends with this call.
    pub fn launch_seamless(
        &mut self,
        request: &LaunchRequest,
        verbose: bool,
    ) -> ElevationResult<P::Child> {
        let _context = self.platform.create_system_context(verbose)?;
        let service = self.platform.open_service_process(LaunchStrategy::Seamless)?;
        let token = self.platform.primary_token(&service)?;

        if let Err(e) = self.platform.bind_console_session(&token) {
            warn!("Child will not be bound to the console session: {}", e);
        }
        set_all_privileges(&token, verbose)?;

        debug!("Creating specified process");
        self.platform.create_with_token(&token, request)
    }

    /// Creates the child suspended under the service process, maximizes the
    /// child's own token and only then lets it run.
    pub fn launch_parent_reassigned(
        &mut self,
        request: &LaunchRequest,
        verbose: bool,
    ) -> ElevationResult<P::Child> {
        let service = self
            .platform
            .open_service_process(LaunchStrategy::ParentReassigned)?;

        debug!("Creating specified process");
        let child = self.platform.create_suspended(&service, request)?;
        drop(service);

        if let Err(e) = self.release_suspended(&child, verbose) {
            self.platform.terminate(&child);
            return Err(e);
        }
        Ok(child)
    }

    fn release_suspended(&mut self, child: &P::Child, verbose: bool) -> ElevationResult<()> {
        let token = self.platform.child_token(child)?;
        set_all_privileges(&token, verbose)?;
        drop(token);
        self.platform.resume(child)
    }
}
