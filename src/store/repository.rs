//! Repository traits for data access.
//!
//! These traits define the interface the services persist through. Each
//! method is one transaction: it either applies completely or not at all.
//! Unique keys and references are enforced here, the way a relational
//! store's constraints would be, and violations surface as
//! [`HrError::Validation`](crate::error::HrError::Validation).

use crate::error::HrResult;
use crate::models::{
    AttendanceId, AttendanceRecord, Credential, Department, DepartmentId, Employee, EmployeeId,
    LeaveRequest, LeaveRequestId, Payslip, PayslipId, Position, PositionId, PrincipalId,
    RoleBinding,
};

/// Whether an upsert inserted a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Departments, positions, employees and their credentials.
pub trait DirectoryRepository: Send + Sync {
    /// Lists departments ordered by name.
    fn list_departments(&self) -> HrResult<Vec<Department>>;

    fn get_department(&self, id: DepartmentId) -> HrResult<Option<Department>>;

    /// Inserts a department; the name must be unique.
    fn insert_department(&self, department: Department) -> HrResult<Department>;

    fn update_department(&self, department: Department) -> HrResult<Department>;

    /// Deletes a department and clears it from every employee referencing it.
    fn delete_department(&self, id: DepartmentId) -> HrResult<()>;

    /// Lists positions ordered by name.
    fn list_positions(&self) -> HrResult<Vec<Position>>;

    fn get_position(&self, id: PositionId) -> HrResult<Option<Position>>;

    /// Inserts a position; the name must be unique.
    fn insert_position(&self, position: Position) -> HrResult<Position>;

    fn update_position(&self, position: Position) -> HrResult<Position>;

    /// Deletes a position and clears it from every employee referencing it.
    fn delete_position(&self, id: PositionId) -> HrResult<()>;

    /// Lists employees ordered by employee code.
    fn list_employees(&self) -> HrResult<Vec<Employee>>;

    fn get_employee(&self, id: EmployeeId) -> HrResult<Option<Employee>>;

    /// Finds the employee owning the given principal's credential.
    fn employee_by_principal(&self, principal: PrincipalId) -> HrResult<Option<Employee>>;

    /// Inserts an employee and its credential atomically.
    fn insert_employee(&self, employee: Employee, credential: Credential) -> HrResult<Employee>;

    /// Replaces an employee record. The employee code is never changed.
    fn update_employee(&self, employee: Employee) -> HrResult<Employee>;

    /// Deletes an employee with its attendance, leave requests, payslips and
    /// role binding. The credential is kept.
    fn delete_employee(&self, id: EmployeeId) -> HrResult<()>;
}

/// Daily check-in/check-out records.
pub trait AttendanceRepository: Send + Sync {
    /// Lists records by date, newest first.
    fn list_attendance(&self) -> HrResult<Vec<AttendanceRecord>>;

    fn get_attendance(&self, id: AttendanceId) -> HrResult<Option<AttendanceRecord>>;

    /// Inserts a record; the employee must exist.
    fn insert_attendance(&self, record: AttendanceRecord) -> HrResult<AttendanceRecord>;

    fn update_attendance(&self, record: AttendanceRecord) -> HrResult<AttendanceRecord>;

    fn delete_attendance(&self, id: AttendanceId) -> HrResult<()>;

    /// Counts an employee's records within a month.
    fn count_attendance(&self, employee: EmployeeId, month: u32, year: i32) -> HrResult<u32>;
}

/// Leave requests. Mutations run their checks inside the transaction so a
/// concurrent writer can never slip between check and write.
pub trait LeaveRepository: Send + Sync {
    /// Lists every request by start date, newest first.
    fn list_leave_requests(&self) -> HrResult<Vec<LeaveRequest>>;

    /// Lists one employee's requests by start date, newest first.
    fn leave_requests_for(&self, employee: EmployeeId) -> HrResult<Vec<LeaveRequest>>;

    fn get_leave_request(&self, id: LeaveRequestId) -> HrResult<Option<LeaveRequest>>;

    /// Inserts a request; the owning employee must exist.
    fn insert_leave_request(&self, request: LeaveRequest) -> HrResult<LeaveRequest>;

    /// Runs `change` against the latest stored request and commits the
    /// result only if it returns `Ok`.
    fn modify_leave_request(
        &self,
        id: LeaveRequestId,
        change: &mut dyn FnMut(&mut LeaveRequest) -> HrResult<()>,
    ) -> HrResult<LeaveRequest>;

    /// Deletes a request if `guard` accepts its latest stored state.
    fn remove_leave_request(
        &self,
        id: LeaveRequestId,
        guard: &dyn Fn(&LeaveRequest) -> HrResult<()>,
    ) -> HrResult<()>;
}

/// Role bindings and credentials of principals.
pub trait IdentityRepository: Send + Sync {
    fn role_binding(&self, principal: PrincipalId) -> HrResult<Option<RoleBinding>>;

    /// Creates or replaces the binding of a principal.
    fn put_role_binding(&self, binding: RoleBinding) -> HrResult<()>;

    fn credential(&self, principal: PrincipalId) -> HrResult<Option<Credential>>;

    /// Registers a credential that is not tied to an employee (e.g. an
    /// administrator account). Usernames must be unique.
    fn insert_credential(&self, credential: Credential) -> HrResult<()>;
}

/// Payslips, unique per (employee, month, year).
pub trait PayslipRepository: Send + Sync {
    /// Lists payslips by period, newest first.
    fn list_payslips(&self) -> HrResult<Vec<Payslip>>;

    fn get_payslip(&self, id: PayslipId) -> HrResult<Option<Payslip>>;

    fn find_payslip(&self, employee: EmployeeId, month: u32, year: i32)
    -> HrResult<Option<Payslip>>;

    /// Inserts a payslip; its period key must be free.
    fn insert_payslip(&self, payslip: Payslip) -> HrResult<Payslip>;

    fn update_payslip(&self, payslip: Payslip) -> HrResult<Payslip>;

    fn delete_payslip(&self, id: PayslipId) -> HrResult<()>;

    /// Inserts the payslip, or overwrites the one already stored for its
    /// period key (keeping the stored id).
    fn upsert_payslip(&self, payslip: Payslip) -> HrResult<(Payslip, UpsertOutcome)>;
}
