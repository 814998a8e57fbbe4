//! In-memory implementation of every repository trait.
//!
//! All tables live behind one `RwLock`; each repository method holds the
//! lock for its whole body, which makes every call a serializable
//! transaction.

use std::cmp::Reverse;
use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{HrError, HrResult};
use crate::models::{
    AttendanceId, AttendanceRecord, Credential, Department, DepartmentId, Employee, EmployeeId,
    LeaveRequest, LeaveRequestId, Payslip, PayslipId, Position, PositionId, PrincipalId,
    RoleBinding,
};

use super::repository::{
    AttendanceRepository, DirectoryRepository, IdentityRepository, LeaveRepository,
    PayslipRepository, UpsertOutcome,
};

#[derive(Debug, Default)]
struct Tables {
    departments: HashMap<DepartmentId, Department>,
    positions: HashMap<PositionId, Position>,
    employees: HashMap<EmployeeId, Employee>,
    credentials: HashMap<PrincipalId, Credential>,
    bindings: HashMap<PrincipalId, RoleBinding>,
    attendance: HashMap<AttendanceId, AttendanceRecord>,
    leave_requests: HashMap<LeaveRequestId, LeaveRequest>,
    payslips: HashMap<PayslipId, Payslip>,
}

impl Tables {
    fn require_employee(&self, id: EmployeeId) -> HrResult<()> {
        if self.employees.contains_key(&id) {
            Ok(())
        } else {
            Err(HrError::validation(
                "employee_id",
                format!("employee {} does not exist", id),
            ))
        }
    }

    fn username_taken(&self, username: &str) -> bool {
        self.credentials
            .values()
            .any(|c| c.username.eq_ignore_ascii_case(username))
    }

    fn check_employee_refs(&self, employee: &Employee) -> HrResult<()> {
        if let Some(department) = employee.department_id {
            if !self.departments.contains_key(&department) {
                return Err(HrError::validation(
                    "department_id",
                    format!("department {} does not exist", department),
                ));
            }
        }
        if let Some(position) = employee.position_id {
            if !self.positions.contains_key(&position) {
                return Err(HrError::validation(
                    "position_id",
                    format!("position {} does not exist", position),
                ));
            }
        }
        Ok(())
    }

    fn payslip_key_taken(&self, payslip: &Payslip) -> bool {
        self.payslips
            .values()
            .any(|p| p.id != payslip.id && p.period_key() == payslip.period_key())
    }
}

/// A transactional in-memory store.
///
/// # Example
///
/// ```
/// use hr_admin::models::{Department, DepartmentId};
/// use hr_admin::store::{DirectoryRepository, MemoryStore};
///
/// let store = MemoryStore::new();
/// store
///     .insert_department(Department { id: DepartmentId::new(), name: "Sales".into() })
///     .unwrap();
/// assert_eq!(store.list_departments().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by<T: Clone, K: Ord>(values: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = values.collect();
    items.sort_by_key(|item| key(item));
    items
}

fn duplicate(field: &str, value: &str) -> HrError {
    HrError::validation(field, format!("'{}' already exists", value))
}

impl DirectoryRepository for MemoryStore {
    fn list_departments(&self) -> HrResult<Vec<Department>> {
        let tables = self.tables.read();
        Ok(sorted_by(tables.departments.values().cloned(), |d| {
            d.name.clone()
        }))
    }

    fn get_department(&self, id: DepartmentId) -> HrResult<Option<Department>> {
        Ok(self.tables.read().departments.get(&id).cloned())
    }

    fn insert_department(&self, department: Department) -> HrResult<Department> {
        let mut tables = self.tables.write();
        if tables
            .departments
            .values()
            .any(|d| d.name.eq_ignore_ascii_case(&department.name))
        {
            return Err(duplicate("name", &department.name));
        }
        tables.departments.insert(department.id, department.clone());
        Ok(department)
    }

    fn update_department(&self, department: Department) -> HrResult<Department> {
        let mut tables = self.tables.write();
        if !tables.departments.contains_key(&department.id) {
            return Err(HrError::not_found("department", department.id));
        }
        if tables
            .departments
            .values()
            .any(|d| d.id != department.id && d.name.eq_ignore_ascii_case(&department.name))
        {
            return Err(duplicate("name", &department.name));
        }
        tables.departments.insert(department.id, department.clone());
        Ok(department)
    }

    fn delete_department(&self, id: DepartmentId) -> HrResult<()> {
        let mut tables = self.tables.write();
        if tables.departments.remove(&id).is_none() {
            return Err(HrError::not_found("department", id));
        }
        for employee in tables.employees.values_mut() {
            if employee.department_id == Some(id) {
                employee.department_id = None;
            }
        }
        Ok(())
    }

    fn list_positions(&self) -> HrResult<Vec<Position>> {
        let tables = self.tables.read();
        Ok(sorted_by(tables.positions.values().cloned(), |p| {
            p.name.clone()
        }))
    }

    fn get_position(&self, id: PositionId) -> HrResult<Option<Position>> {
        Ok(self.tables.read().positions.get(&id).cloned())
    }

    fn insert_position(&self, position: Position) -> HrResult<Position> {
        let mut tables = self.tables.write();
        if tables
            .positions
            .values()
            .any(|p| p.name.eq_ignore_ascii_case(&position.name))
        {
            return Err(duplicate("name", &position.name));
        }
        tables.positions.insert(position.id, position.clone());
        Ok(position)
    }

    fn update_position(&self, position: Position) -> HrResult<Position> {
        let mut tables = self.tables.write();
        if !tables.positions.contains_key(&position.id) {
            return Err(HrError::not_found("position", position.id));
        }
        if tables
            .positions
            .values()
            .any(|p| p.id != position.id && p.name.eq_ignore_ascii_case(&position.name))
        {
            return Err(duplicate("name", &position.name));
        }
        tables.positions.insert(position.id, position.clone());
        Ok(position)
    }

    fn delete_position(&self, id: PositionId) -> HrResult<()> {
        let mut tables = self.tables.write();
        if tables.positions.remove(&id).is_none() {
            return Err(HrError::not_found("position", id));
        }
        for employee in tables.employees.values_mut() {
            if employee.position_id == Some(id) {
                employee.position_id = None;
            }
        }
        Ok(())
    }

    fn list_employees(&self) -> HrResult<Vec<Employee>> {
        let tables = self.tables.read();
        Ok(sorted_by(tables.employees.values().cloned(), |e| {
            e.employee_code.clone()
        }))
    }

    fn get_employee(&self, id: EmployeeId) -> HrResult<Option<Employee>> {
        Ok(self.tables.read().employees.get(&id).cloned())
    }

    fn employee_by_principal(&self, principal: PrincipalId) -> HrResult<Option<Employee>> {
        Ok(self
            .tables
            .read()
            .employees
            .values()
            .find(|e| e.principal_id == principal)
            .cloned())
    }

    fn insert_employee(&self, employee: Employee, credential: Credential) -> HrResult<Employee> {
        let mut tables = self.tables.write();
        if tables
            .employees
            .values()
            .any(|e| e.employee_code == employee.employee_code)
        {
            return Err(duplicate("employee_code", &employee.employee_code));
        }
        if tables.username_taken(&credential.username) {
            return Err(duplicate("username", &credential.username));
        }
        if credential.principal_id != employee.principal_id
            || tables.credentials.contains_key(&credential.principal_id)
        {
            return Err(HrError::validation(
                "principal_id",
                "credential must belong to a new principal owned by the employee",
            ));
        }
        tables.check_employee_refs(&employee)?;

        tables.credentials.insert(credential.principal_id, credential);
        tables.employees.insert(employee.id, employee.clone());
        debug!(employee_id = %employee.id, "Inserted employee with credential");
        Ok(employee)
    }

    fn update_employee(&self, employee: Employee) -> HrResult<Employee> {
        let mut tables = self.tables.write();
        let stored = tables
            .employees
            .get(&employee.id)
            .ok_or_else(|| HrError::not_found("employee", employee.id))?;
        let updated = Employee {
            employee_code: stored.employee_code.clone(),
            principal_id: stored.principal_id,
            ..employee
        };
        tables.check_employee_refs(&updated)?;
        tables.employees.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn delete_employee(&self, id: EmployeeId) -> HrResult<()> {
        let mut tables = self.tables.write();
        if tables.employees.remove(&id).is_none() {
            return Err(HrError::not_found("employee", id));
        }
        tables.attendance.retain(|_, a| a.employee_id != id);
        tables.leave_requests.retain(|_, l| l.employee_id != id);
        tables.payslips.retain(|_, p| p.employee_id != id);
        tables.bindings.retain(|_, b| b.employee_id != Some(id));
        debug!(employee_id = %id, "Deleted employee and dependent records");
        Ok(())
    }
}

impl AttendanceRepository for MemoryStore {
    fn list_attendance(&self) -> HrResult<Vec<AttendanceRecord>> {
        let tables = self.tables.read();
        Ok(sorted_by(tables.attendance.values().cloned(), |a| {
            Reverse((a.date, a.check_in))
        }))
    }

    fn get_attendance(&self, id: AttendanceId) -> HrResult<Option<AttendanceRecord>> {
        Ok(self.tables.read().attendance.get(&id).cloned())
    }

    fn insert_attendance(&self, record: AttendanceRecord) -> HrResult<AttendanceRecord> {
        let mut tables = self.tables.write();
        tables.require_employee(record.employee_id)?;
        tables.attendance.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_attendance(&self, record: AttendanceRecord) -> HrResult<AttendanceRecord> {
        let mut tables = self.tables.write();
        if !tables.attendance.contains_key(&record.id) {
            return Err(HrError::not_found("attendance", record.id));
        }
        tables.require_employee(record.employee_id)?;
        tables.attendance.insert(record.id, record.clone());
        Ok(record)
    }

    fn delete_attendance(&self, id: AttendanceId) -> HrResult<()> {
        self.tables
            .write()
            .attendance
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| HrError::not_found("attendance", id))
    }

    fn count_attendance(&self, employee: EmployeeId, month: u32, year: i32) -> HrResult<u32> {
        let count = self
            .tables
            .read()
            .attendance
            .values()
            .filter(|a| a.employee_id == employee && a.is_in_month(month, year))
            .count();
        u32::try_from(count).map_err(|e| HrError::Persistence {
            message: e.to_string(),
        })
    }
}

impl LeaveRepository for MemoryStore {
    fn list_leave_requests(&self) -> HrResult<Vec<LeaveRequest>> {
        let tables = self.tables.read();
        Ok(sorted_by(tables.leave_requests.values().cloned(), |l| {
            Reverse(l.start_date)
        }))
    }

    fn leave_requests_for(&self, employee: EmployeeId) -> HrResult<Vec<LeaveRequest>> {
        let tables = self.tables.read();
        Ok(sorted_by(
            tables
                .leave_requests
                .values()
                .filter(|l| l.employee_id == employee)
                .cloned(),
            |l| Reverse(l.start_date),
        ))
    }

    fn get_leave_request(&self, id: LeaveRequestId) -> HrResult<Option<LeaveRequest>> {
        Ok(self.tables.read().leave_requests.get(&id).cloned())
    }

    fn insert_leave_request(&self, request: LeaveRequest) -> HrResult<LeaveRequest> {
        let mut tables = self.tables.write();
        tables.require_employee(request.employee_id)?;
        tables.leave_requests.insert(request.id, request.clone());
        Ok(request)
    }

    fn modify_leave_request(
        &self,
        id: LeaveRequestId,
        change: &mut dyn FnMut(&mut LeaveRequest) -> HrResult<()>,
    ) -> HrResult<LeaveRequest> {
        let mut tables = self.tables.write();
        let stored = tables
            .leave_requests
            .get_mut(&id)
            .ok_or_else(|| HrError::not_found("leave_request", id))?;
        let mut working = stored.clone();
        change(&mut working)?;
        *stored = working.clone();
        Ok(working)
    }

    fn remove_leave_request(
        &self,
        id: LeaveRequestId,
        guard: &dyn Fn(&LeaveRequest) -> HrResult<()>,
    ) -> HrResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .leave_requests
            .get(&id)
            .ok_or_else(|| HrError::not_found("leave_request", id))?;
        guard(stored)?;
        tables.leave_requests.remove(&id);
        Ok(())
    }
}

impl IdentityRepository for MemoryStore {
    fn role_binding(&self, principal: PrincipalId) -> HrResult<Option<RoleBinding>> {
        Ok(self.tables.read().bindings.get(&principal).cloned())
    }

    fn put_role_binding(&self, binding: RoleBinding) -> HrResult<()> {
        let mut tables = self.tables.write();
        if let Some(employee) = binding.employee_id {
            tables.require_employee(employee)?;
        }
        tables.bindings.insert(binding.principal_id, binding);
        Ok(())
    }

    fn credential(&self, principal: PrincipalId) -> HrResult<Option<Credential>> {
        Ok(self.tables.read().credentials.get(&principal).cloned())
    }

    fn insert_credential(&self, credential: Credential) -> HrResult<()> {
        let mut tables = self.tables.write();
        if tables.username_taken(&credential.username) {
            return Err(duplicate("username", &credential.username));
        }
        if tables.credentials.contains_key(&credential.principal_id) {
            return Err(HrError::validation(
                "principal_id",
                format!("principal {} already has a credential", credential.principal_id),
            ));
        }
        tables.credentials.insert(credential.principal_id, credential);
        Ok(())
    }
}

impl PayslipRepository for MemoryStore {
    fn list_payslips(&self) -> HrResult<Vec<Payslip>> {
        let tables = self.tables.read();
        Ok(sorted_by(tables.payslips.values().cloned(), |p| {
            Reverse((p.year, p.month))
        }))
    }

    fn get_payslip(&self, id: PayslipId) -> HrResult<Option<Payslip>> {
        Ok(self.tables.read().payslips.get(&id).cloned())
    }

    fn find_payslip(
        &self,
        employee: EmployeeId,
        month: u32,
        year: i32,
    ) -> HrResult<Option<Payslip>> {
        Ok(self
            .tables
            .read()
            .payslips
            .values()
            .find(|p| p.period_key() == (employee, month, year))
            .cloned())
    }

    fn insert_payslip(&self, payslip: Payslip) -> HrResult<Payslip> {
        let mut tables = self.tables.write();
        tables.require_employee(payslip.employee_id)?;
        if tables.payslip_key_taken(&payslip) {
            return Err(HrError::validation(
                "month",
                format!(
                    "a payslip for {}/{} already exists for this employee",
                    payslip.month, payslip.year
                ),
            ));
        }
        tables.payslips.insert(payslip.id, payslip.clone());
        Ok(payslip)
    }

    fn update_payslip(&self, payslip: Payslip) -> HrResult<Payslip> {
        let mut tables = self.tables.write();
        if !tables.payslips.contains_key(&payslip.id) {
            return Err(HrError::not_found("payslip", payslip.id));
        }
        if tables.payslip_key_taken(&payslip) {
            return Err(HrError::validation(
                "month",
                format!(
                    "a payslip for {}/{} already exists for this employee",
                    payslip.month, payslip.year
                ),
            ));
        }
        tables.payslips.insert(payslip.id, payslip.clone());
        Ok(payslip)
    }

    fn delete_payslip(&self, id: PayslipId) -> HrResult<()> {
        self.tables
            .write()
            .payslips
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| HrError::not_found("payslip", id))
    }

    fn upsert_payslip(&self, payslip: Payslip) -> HrResult<(Payslip, UpsertOutcome)> {
        let mut tables = self.tables.write();
        tables.require_employee(payslip.employee_id)?;
        let existing = tables
            .payslips
            .values()
            .find(|p| p.period_key() == payslip.period_key())
            .map(|p| p.id);

        match existing {
            Some(id) => {
                let stored = Payslip { id, ..payslip };
                tables.payslips.insert(id, stored.clone());
                Ok((stored, UpsertOutcome::Updated))
            }
            None => {
                tables.payslips.insert(payslip.id, payslip.clone());
                Ok((payslip, UpsertOutcome::Created))
            }
        }
    }
}
