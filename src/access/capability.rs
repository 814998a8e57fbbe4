//! Capability table and the pure authorization function.
//!
//! Every permission decision in the engine goes through [`authorize`], which
//! consults [`capabilities`] instead of comparing roles ad hoc.

use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};
use crate::models::{EmployeeId, LeaveRequest, PrincipalId, Role};

/// Something a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Write departments, positions, employees, attendance and payslips.
    ManageRecords,
    /// Submit leave requests for oneself.
    SubmitLeave,
    /// Modify or delete one's own leave requests while they are pending.
    ManageOwnPendingLeave,
    /// Modify or delete any leave request in any state.
    ManageAnyLeave,
    /// Approve or reject leave requests.
    DecideLeave,
}

const PRIVILEGED: &[Capability] = &[
    Capability::ManageRecords,
    Capability::SubmitLeave,
    Capability::ManageOwnPendingLeave,
    Capability::ManageAnyLeave,
    Capability::DecideLeave,
];

const STAFF: &[Capability] = &[Capability::SubmitLeave, Capability::ManageOwnPendingLeave];

/// The capability table: what each role may do.
pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin | Role::Hr | Role::Manager => PRIVILEGED,
        Role::Employee => STAFF,
    }
}

/// Returns true if `role` carries `capability`.
pub fn has_capability(role: Role, capability: Capability) -> bool {
    capabilities(role).contains(&capability)
}

/// An operation a caller attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Approve,
    Reject,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Approve => "approve",
            Action::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// The target of an action.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Department,
    Position,
    Employee,
    Attendance,
    Payslip,
    /// The leave request collection (used for submission).
    LeaveRequests,
    /// One specific leave request, with its current owner and status.
    LeaveRequest(&'a LeaveRequest),
}

impl Resource<'_> {
    /// The resource name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Department => "department",
            Resource::Position => "position",
            Resource::Employee => "employee",
            Resource::Attendance => "attendance",
            Resource::Payslip => "payslip",
            Resource::LeaveRequests | Resource::LeaveRequest(_) => "leave_request",
        }
    }
}

/// An authenticated caller with its resolved role and employee link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub principal_id: PrincipalId,
    pub role: Role,
    pub employee_id: Option<EmployeeId>,
}

impl Caller {
    /// Returns true if this caller owns the given leave request.
    pub fn owns(&self, request: &LeaveRequest) -> bool {
        self.employee_id == Some(request.employee_id)
    }

    /// Returns true if the caller's role carries `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        has_capability(self.role, capability)
    }
}

/// Decides whether `caller` may perform `action` on `resource`.
///
/// # Example
///
/// ```
/// use hr_admin::access::{authorize, Action, Caller, Resource};
/// use hr_admin::models::{PrincipalId, Role};
///
/// let employee = Caller { principal_id: PrincipalId::new(), role: Role::Employee, employee_id: None };
/// assert!(authorize(&employee, Action::Read, Resource::Payslip));
/// assert!(!authorize(&employee, Action::Create, Resource::Department));
/// ```
pub fn authorize(caller: &Caller, action: Action, resource: Resource<'_>) -> bool {
    if action == Action::Read {
        return true;
    }

    match resource {
        Resource::Department
        | Resource::Position
        | Resource::Employee
        | Resource::Attendance
        | Resource::Payslip => caller.can(Capability::ManageRecords),
        Resource::LeaveRequests => match action {
            Action::Create => caller.can(Capability::SubmitLeave),
            Action::Approve | Action::Reject => caller.can(Capability::DecideLeave),
            _ => caller.can(Capability::ManageAnyLeave),
        },
        Resource::LeaveRequest(request) => match action {
            Action::Approve | Action::Reject => caller.can(Capability::DecideLeave),
            Action::Create => caller.can(Capability::SubmitLeave),
            Action::Update | Action::Delete => {
                caller.can(Capability::ManageAnyLeave)
                    || (caller.can(Capability::ManageOwnPendingLeave)
                        && caller.owns(request)
                        && request.status.is_pending())
            }
            Action::Read => true,
        },
    }
}

/// Like [`authorize`], but returns [`HrError::Forbidden`] on denial.
pub fn ensure(caller: &Caller, action: Action, resource: Resource<'_>) -> HrResult<()> {
    if authorize(caller, action, resource) {
        Ok(())
    } else {
        Err(HrError::forbidden(action, resource.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeaveRequestId, LeaveStatus};
    use chrono::NaiveDate;

    const ALL_ROLES: [Role; 4] = [Role::Admin, Role::Hr, Role::Manager, Role::Employee];
    const ALL_ACTIONS: [Action; 6] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Approve,
        Action::Reject,
    ];

    fn caller(role: Role, employee_id: Option<EmployeeId>) -> Caller {
        Caller {
            principal_id: PrincipalId::new(),
            role,
            employee_id,
        }
    }

    fn request(owner: EmployeeId, status: LeaveStatus) -> LeaveRequest {
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        LeaveRequest {
            id: LeaveRequestId::new(),
            employee_id: owner,
            start_date: day,
            end_date: day,
            reason: "Appointment".to_string(),
            status,
        }
    }

    #[test]
    fn test_reads_always_permitted() {
        let owner = EmployeeId::new();
        let req = request(owner, LeaveStatus::Approved);
        for role in ALL_ROLES {
            let c = caller(role, None);
            for resource in [
                Resource::Department,
                Resource::Position,
                Resource::Employee,
                Resource::Attendance,
                Resource::Payslip,
                Resource::LeaveRequests,
                Resource::LeaveRequest(&req),
            ] {
                assert!(authorize(&c, Action::Read, resource), "{role} read {}", resource.name());
            }
        }
    }

    #[test]
    fn test_record_writes_need_privileged_role() {
        for role in ALL_ROLES {
            let c = caller(role, None);
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert_eq!(
                    authorize(&c, action, Resource::Employee),
                    role.is_privileged(),
                    "{role} {action} employee"
                );
            }
        }
    }

    #[test]
    fn test_employee_never_decides_leave() {
        let me = EmployeeId::new();
        let c = caller(Role::Employee, Some(me));
        for status in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected] {
            for owner in [me, EmployeeId::new()] {
                let req = request(owner, status);
                assert!(!authorize(&c, Action::Approve, Resource::LeaveRequest(&req)));
                assert!(!authorize(&c, Action::Reject, Resource::LeaveRequest(&req)));
            }
        }
    }

    #[test]
    fn test_owner_edits_only_while_pending() {
        let me = EmployeeId::new();
        let c = caller(Role::Employee, Some(me));

        let pending = request(me, LeaveStatus::Pending);
        assert!(authorize(&c, Action::Update, Resource::LeaveRequest(&pending)));
        assert!(authorize(&c, Action::Delete, Resource::LeaveRequest(&pending)));

        let approved = request(me, LeaveStatus::Approved);
        assert!(!authorize(&c, Action::Update, Resource::LeaveRequest(&approved)));
        assert!(!authorize(&c, Action::Delete, Resource::LeaveRequest(&approved)));

        let someone_else = request(EmployeeId::new(), LeaveStatus::Pending);
        assert!(!authorize(&c, Action::Update, Resource::LeaveRequest(&someone_else)));
    }

    #[test]
    fn test_employee_without_profile_cannot_edit_anything() {
        let c = caller(Role::Employee, None);
        let req = request(EmployeeId::new(), LeaveStatus::Pending);
        assert!(!authorize(&c, Action::Update, Resource::LeaveRequest(&req)));
    }

    #[test]
    fn test_privileged_roles_manage_any_leave() {
        for role in [Role::Admin, Role::Hr, Role::Manager] {
            let c = caller(role, None);
            let req = request(EmployeeId::new(), LeaveStatus::Rejected);
            for action in ALL_ACTIONS {
                assert!(authorize(&c, action, Resource::LeaveRequest(&req)));
            }
        }
    }

    #[test]
    fn test_everyone_may_submit_leave() {
        for role in ALL_ROLES {
            assert!(authorize(&caller(role, None), Action::Create, Resource::LeaveRequests));
        }
    }

    #[test]
    fn test_capability_table() {
        assert_eq!(capabilities(Role::Employee), STAFF);
        assert!(has_capability(Role::Hr, Capability::DecideLeave));
        assert!(!has_capability(Role::Employee, Capability::ManageRecords));
    }

    #[test]
    fn test_ensure_reports_action_and_resource() {
        let c = caller(Role::Employee, None);
        let err = ensure(&c, Action::Delete, Resource::Position).unwrap_err();
        assert_eq!(err, HrError::forbidden("delete", "position"));
    }
}
