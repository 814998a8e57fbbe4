//! Department, position and employee maintenance behind access checks.

use std::sync::Arc;

use tracing::info;

use crate::access::{Action, Caller, Resource, ensure};
use crate::error::{HrError, HrResult};
use crate::models::{
    Credential, Department, DepartmentCreate, DepartmentId, DepartmentUpdate, Employee,
    EmployeeCreate, EmployeeId, EmployeeUpdate, Position, PositionCreate, PositionId,
    PositionUpdate, PrincipalId,
};
use crate::store::DirectoryRepository;

use super::password::hash_password;

fn require_text(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

fn require_salary(value: rust_decimal::Decimal) -> HrResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(HrError::validation("base_salary", "must not be negative"));
    }
    Ok(())
}

/// Departments, positions and employees.
#[derive(Clone)]
pub struct DirectoryService {
    repo: Arc<dyn DirectoryRepository>,
}

impl DirectoryService {
    pub fn new(repo: Arc<dyn DirectoryRepository>) -> Self {
        Self { repo }
    }

    // Departments

    pub fn list_departments(&self, caller: &Caller) -> HrResult<Vec<Department>> {
        ensure(caller, Action::Read, Resource::Department)?;
        self.repo.list_departments()
    }

    pub fn get_department(&self, caller: &Caller, id: DepartmentId) -> HrResult<Department> {
        ensure(caller, Action::Read, Resource::Department)?;
        self.repo
            .get_department(id)?
            .ok_or_else(|| HrError::not_found("department", id))
    }

    pub fn create_department(&self, caller: &Caller, input: DepartmentCreate) -> HrResult<Department> {
        ensure(caller, Action::Create, Resource::Department)?;
        let department = self.repo.insert_department(Department {
            id: DepartmentId::new(),
            name: require_text("name", &input.name)?,
        })?;
        info!(department_id = %department.id, name = %department.name, "Department created");
        Ok(department)
    }

    pub fn update_department(
        &self,
        caller: &Caller,
        id: DepartmentId,
        input: DepartmentUpdate,
    ) -> HrResult<Department> {
        ensure(caller, Action::Update, Resource::Department)?;
        let mut department = self.get_department(caller, id)?;
        if let Some(name) = input.name {
            department.name = require_text("name", &name)?;
        }
        self.repo.update_department(department)
    }

    pub fn delete_department(&self, caller: &Caller, id: DepartmentId) -> HrResult<()> {
        ensure(caller, Action::Delete, Resource::Department)?;
        self.repo.delete_department(id)?;
        info!(department_id = %id, "Department deleted");
        Ok(())
    }

    // Positions

    pub fn list_positions(&self, caller: &Caller) -> HrResult<Vec<Position>> {
        ensure(caller, Action::Read, Resource::Position)?;
        self.repo.list_positions()
    }

    pub fn get_position(&self, caller: &Caller, id: PositionId) -> HrResult<Position> {
        ensure(caller, Action::Read, Resource::Position)?;
        self.repo
            .get_position(id)?
            .ok_or_else(|| HrError::not_found("position", id))
    }

    pub fn create_position(&self, caller: &Caller, input: PositionCreate) -> HrResult<Position> {
        ensure(caller, Action::Create, Resource::Position)?;
        require_salary(input.base_salary)?;
        let position = self.repo.insert_position(Position {
            id: PositionId::new(),
            name: require_text("name", &input.name)?,
            base_salary: input.base_salary,
        })?;
        info!(position_id = %position.id, name = %position.name, "Position created");
        Ok(position)
    }

    pub fn update_position(
        &self,
        caller: &Caller,
        id: PositionId,
        input: PositionUpdate,
    ) -> HrResult<Position> {
        ensure(caller, Action::Update, Resource::Position)?;
        let mut position = self.get_position(caller, id)?;
        if let Some(name) = input.name {
            position.name = require_text("name", &name)?;
        }
        if let Some(base_salary) = input.base_salary {
            require_salary(base_salary)?;
            position.base_salary = base_salary;
        }
        self.repo.update_position(position)
    }

    pub fn delete_position(&self, caller: &Caller, id: PositionId) -> HrResult<()> {
        ensure(caller, Action::Delete, Resource::Position)?;
        self.repo.delete_position(id)?;
        info!(position_id = %id, "Position deleted");
        Ok(())
    }

    // Employees

    pub fn list_employees(&self, caller: &Caller) -> HrResult<Vec<Employee>> {
        ensure(caller, Action::Read, Resource::Employee)?;
        self.repo.list_employees()
    }

    pub fn get_employee(&self, caller: &Caller, id: EmployeeId) -> HrResult<Employee> {
        ensure(caller, Action::Read, Resource::Employee)?;
        self.repo
            .get_employee(id)?
            .ok_or_else(|| HrError::not_found("employee", id))
    }

    /// Creates an employee together with its login credential. Either both
    /// are stored or neither is.
    pub fn create_employee(&self, caller: &Caller, input: EmployeeCreate) -> HrResult<Employee> {
        ensure(caller, Action::Create, Resource::Employee)?;

        let username = require_text("username", input.username.as_deref().unwrap_or_default())?;
        let password = input
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| HrError::validation("password", "is required"))?;

        let principal_id = PrincipalId::new();
        let employee = Employee {
            id: EmployeeId::new(),
            principal_id,
            employee_code: require_text("employee_code", &input.employee_code)?,
            full_name: require_text("full_name", &input.full_name)?,
            birth_date: input.birth_date,
            hire_date: input.hire_date,
            status: input.status,
            department_id: input.department_id,
            position_id: input.position_id,
        };
        let credential = Credential {
            principal_id,
            username,
            password_hash: hash_password(password)?,
        };

        let employee = self.repo.insert_employee(employee, credential)?;
        info!(
            employee_id = %employee.id,
            employee_code = %employee.employee_code,
            "Employee created"
        );
        Ok(employee)
    }

    /// Updates an employee. The employee code cannot be changed.
    pub fn update_employee(
        &self,
        caller: &Caller,
        id: EmployeeId,
        input: EmployeeUpdate,
    ) -> HrResult<Employee> {
        ensure(caller, Action::Update, Resource::Employee)?;
        let mut employee = self.get_employee(caller, id)?;
        if let Some(full_name) = input.full_name {
            employee.full_name = require_text("full_name", &full_name)?;
        }
        if let Some(birth_date) = input.birth_date {
            employee.birth_date = birth_date;
        }
        if let Some(hire_date) = input.hire_date {
            employee.hire_date = hire_date;
        }
        if let Some(status) = input.status {
            employee.status = status;
        }
        if let Some(department_id) = input.department_id {
            employee.department_id = Some(department_id);
        }
        if let Some(position_id) = input.position_id {
            employee.position_id = Some(position_id);
        }
        self.repo.update_employee(employee)
    }

    /// Deletes an employee and everything it owns.
    pub fn delete_employee(&self, caller: &Caller, id: EmployeeId) -> HrResult<()> {
        ensure(caller, Action::Delete, Resource::Employee)?;
        self.repo.delete_employee(id)?;
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }
}
