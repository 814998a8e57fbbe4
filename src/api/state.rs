//! Application state for the HR administration API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::access::AccessControl;
use crate::attendance::AttendanceLog;
use crate::config::ConfigLoader;
use crate::directory::DirectoryService;
use crate::leave::LeaveWorkflow;
use crate::payroll::{PayrollEngine, PayslipService};
use crate::store::{
    AttendanceRepository, DirectoryRepository, IdentityRepository, LeaveRepository,
    PayslipRepository,
};

struct Services {
    config: ConfigLoader,
    access: AccessControl,
    directory: DirectoryService,
    attendance: AttendanceLog,
    leave: LeaveWorkflow,
    payslips: PayslipService,
    payroll: PayrollEngine,
}

/// Shared application state.
///
/// Holds the configuration and every service, wired to one store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Services>,
}

impl AppState {
    /// Wires every service to `store`.
    pub fn new<S>(store: Arc<S>, config: ConfigLoader) -> Self
    where
        S: DirectoryRepository
            + AttendanceRepository
            + LeaveRepository
            + IdentityRepository
            + PayslipRepository
            + 'static,
    {
        let directory: Arc<dyn DirectoryRepository> = store.clone();
        let attendance: Arc<dyn AttendanceRepository> = store.clone();
        let leave: Arc<dyn LeaveRepository> = store.clone();
        let identities: Arc<dyn IdentityRepository> = store.clone();
        let payslips: Arc<dyn PayslipRepository> = store;

        let services = Services {
            access: AccessControl::new(identities, directory.clone()),
            directory: DirectoryService::new(directory.clone()),
            attendance: AttendanceLog::new(attendance.clone()),
            leave: LeaveWorkflow::new(leave),
            payslips: PayslipService::new(payslips.clone()),
            payroll: PayrollEngine::new(directory, attendance, payslips, config.payroll().clone()),
            config,
        };
        Self {
            inner: Arc::new(services),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.inner.config
    }

    pub fn access(&self) -> &AccessControl {
        &self.inner.access
    }

    pub fn directory(&self) -> &DirectoryService {
        &self.inner.directory
    }

    pub fn attendance(&self) -> &AttendanceLog {
        &self.inner.attendance
    }

    pub fn leave(&self) -> &LeaveWorkflow {
        &self.inner.leave
    }

    pub fn payslips(&self) -> &PayslipService {
        &self.inner.payslips
    }

    pub fn payroll(&self) -> &PayrollEngine {
        &self.inner.payroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_payroll_uses_configured_amounts() {
        let state = AppState::new(Arc::new(MemoryStore::new()), ConfigLoader::default());
        assert_eq!(
            state.payroll().settings(),
            state.config().payroll()
        );
    }
}
