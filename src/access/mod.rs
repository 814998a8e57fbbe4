//! Role resolution and authorization.
//!
//! A caller is identified by a [`PrincipalId`]. [`AccessControl::resolve`]
//! turns it into a [`Caller`] with a role and (optionally) an employee
//! profile; [`authorize`] then decides each action from the capability table.

mod capability;

use std::sync::Arc;

use tracing::debug;

pub use capability::{
    Action, Caller, Capability, Resource, authorize, capabilities, ensure, has_capability,
};

use crate::error::HrResult;
use crate::models::{PrincipalId, Role};
use crate::store::{DirectoryRepository, IdentityRepository};

/// Resolves principals into callers.
#[derive(Clone)]
pub struct AccessControl {
    identities: Arc<dyn IdentityRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

impl AccessControl {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        directory: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            identities,
            directory,
        }
    }

    /// Returns the principal's bound role, or [`Role::Employee`] when the
    /// principal has no binding.
    pub fn resolve_role(&self, principal: PrincipalId) -> HrResult<Role> {
        Ok(self
            .identities
            .role_binding(principal)?
            .map(|binding| binding.role)
            .unwrap_or_default())
    }

    /// Resolves a principal into a caller.
    ///
    /// The employee profile is the employee owning the principal's
    /// credential, falling back to the employee named by the role binding.
    pub fn resolve(&self, principal: PrincipalId) -> HrResult<Caller> {
        let binding = self.identities.role_binding(principal)?;
        let role = binding.as_ref().map(|b| b.role).unwrap_or_default();
        let employee_id = match self.directory.employee_by_principal(principal)? {
            Some(employee) => Some(employee.id),
            None => binding.and_then(|b| b.employee_id),
        };

        debug!(
            principal_id = %principal,
            role = %role,
            has_profile = employee_id.is_some(),
            "Resolved caller"
        );

        Ok(Caller {
            principal_id: principal,
            role,
            employee_id,
        })
    }
}

impl std::fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, Employee, EmployeeId, EmployeeStatus, RoleBinding};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn control(store: &Arc<MemoryStore>) -> AccessControl {
        AccessControl::new(store.clone(), store.clone())
    }

    fn add_employee(store: &MemoryStore, principal_id: PrincipalId) -> EmployeeId {
        let employee = Employee {
            id: EmployeeId::new(),
            principal_id,
            employee_code: "NV100".to_string(),
            full_name: "Tran Thi B".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1992, 3, 4).unwrap(),
            hire_date: NaiveDate::from_ymd_opt(2021, 5, 6).unwrap(),
            status: EmployeeStatus::Active,
            department_id: None,
            position_id: None,
        };
        let credential = Credential {
            principal_id,
            username: "ttb".to_string(),
            password_hash: "x".to_string(),
        };
        store.insert_employee(employee, credential).unwrap().id
    }

    #[test]
    fn test_unbound_principal_defaults_to_employee() {
        let store = Arc::new(MemoryStore::new());
        let access = control(&store);
        let principal = PrincipalId::new();

        assert_eq!(access.resolve_role(principal).unwrap(), Role::Employee);
        let caller = access.resolve(principal).unwrap();
        assert_eq!(caller.role, Role::Employee);
        assert_eq!(caller.employee_id, None);
    }

    #[test]
    fn test_bound_role_is_used() {
        let store = Arc::new(MemoryStore::new());
        let principal = PrincipalId::new();
        store
            .put_role_binding(RoleBinding {
                principal_id: principal,
                role: Role::Hr,
                employee_id: None,
            })
            .unwrap();

        assert_eq!(control(&store).resolve_role(principal).unwrap(), Role::Hr);
    }

    #[test]
    fn test_profile_found_through_credential_owner() {
        let store = Arc::new(MemoryStore::new());
        let principal = PrincipalId::new();
        let employee_id = add_employee(&store, principal);

        let caller = control(&store).resolve(principal).unwrap();
        assert_eq!(caller.employee_id, Some(employee_id));
        assert_eq!(caller.role, Role::Employee);
    }

    #[test]
    fn test_profile_falls_back_to_binding() {
        let store = Arc::new(MemoryStore::new());
        let owner = PrincipalId::new();
        let employee_id = add_employee(&store, owner);

        let delegate = PrincipalId::new();
        store
            .put_role_binding(RoleBinding {
                principal_id: delegate,
                role: Role::Manager,
                employee_id: Some(employee_id),
            })
            .unwrap();

        let caller = control(&store).resolve(delegate).unwrap();
        assert_eq!(caller.role, Role::Manager);
        assert_eq!(caller.employee_id, Some(employee_id));
    }
}
