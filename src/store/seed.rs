//! YAML seed data for bootstrapping a store.
//!
//! A seed lists standalone accounts, departments, positions, employees (with
//! their credentials and roles) and attendance. References between records
//! are by name or employee code so seed files stay readable.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::directory::hash_password;
use crate::error::{HrError, HrResult};
use crate::models::{
    AttendanceId, AttendanceRecord, Credential, Department, DepartmentId, Employee, EmployeeId,
    EmployeeStatus, Position, PositionId, PrincipalId, Role, RoleBinding,
};

use super::memory::MemoryStore;
use super::repository::{AttendanceRepository, DirectoryRepository, IdentityRepository};

/// An account with no employee record, e.g. a system administrator.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub principal_id: Option<PrincipalId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDepartment {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPosition {
    pub name: String,
    pub base_salary: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEmployee {
    pub employee_code: String,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Position name.
    #[serde(default)]
    pub position: Option<String>,
    pub username: String,
    pub password: String,
    /// Role to bind; no binding is created when absent.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub principal_id: Option<PrincipalId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAttendance {
    pub employee_code: String,
    pub date: NaiveDate,
    pub check_in: NaiveTime,
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
}

/// The contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    #[serde(default)]
    pub departments: Vec<SeedDepartment>,
    #[serde(default)]
    pub positions: Vec<SeedPosition>,
    #[serde(default)]
    pub employees: Vec<SeedEmployee>,
    #[serde(default)]
    pub attendance: Vec<SeedAttendance>,
}

/// Counts of records written by [`Seed::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts: usize,
    pub departments: usize,
    pub positions: usize,
    pub employees: usize,
    pub attendance: usize,
}

impl Seed {
    /// Reads and parses a seed file.
    pub fn load<P: AsRef<Path>>(path: P) -> HrResult<Self> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|e| HrError::SeedError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| match e {
            HrError::SeedError { message, .. } => HrError::SeedError {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    /// Parses seed YAML from a string.
    pub fn parse(yaml: &str) -> HrResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| HrError::SeedError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Writes the seed into `store`. Bypasses access control: seeding is a
    /// bootstrap step performed by the operator.
    pub fn apply(&self, store: &MemoryStore) -> HrResult<SeedSummary> {
        let mut summary = SeedSummary::default();

        for account in &self.accounts {
            let principal_id = account.principal_id.unwrap_or_default();
            store.insert_credential(Credential {
                principal_id,
                username: account.username.clone(),
                password_hash: hash_password(&account.password)?,
            })?;
            store.put_role_binding(RoleBinding {
                principal_id,
                role: account.role,
                employee_id: None,
            })?;
            summary.accounts += 1;
        }

        let mut departments: HashMap<String, DepartmentId> = HashMap::new();
        for seed in &self.departments {
            let department = store.insert_department(Department {
                id: DepartmentId::new(),
                name: seed.name.clone(),
            })?;
            departments.insert(department.name, department.id);
            summary.departments += 1;
        }

        let mut positions: HashMap<String, PositionId> = HashMap::new();
        for seed in &self.positions {
            let position = store.insert_position(Position {
                id: PositionId::new(),
                name: seed.name.clone(),
                base_salary: seed.base_salary,
            })?;
            positions.insert(position.name, position.id);
            summary.positions += 1;
        }

        let mut employees: HashMap<String, EmployeeId> = HashMap::new();
        for seed in &self.employees {
            let department_id = lookup(&departments, seed.department.as_deref(), "department")?;
            let position_id = lookup(&positions, seed.position.as_deref(), "position")?;
            let principal_id = seed.principal_id.unwrap_or_default();
            let employee = store.insert_employee(
                Employee {
                    id: EmployeeId::new(),
                    principal_id,
                    employee_code: seed.employee_code.clone(),
                    full_name: seed.full_name.clone(),
                    birth_date: seed.birth_date,
                    hire_date: seed.hire_date,
                    status: seed.status,
                    department_id,
                    position_id,
                },
                Credential {
                    principal_id,
                    username: seed.username.clone(),
                    password_hash: hash_password(&seed.password)?,
                },
            )?;
            if let Some(role) = seed.role {
                store.put_role_binding(RoleBinding {
                    principal_id,
                    role,
                    employee_id: Some(employee.id),
                })?;
            }
            employees.insert(employee.employee_code, employee.id);
            summary.employees += 1;
        }

        for seed in &self.attendance {
            let employee_id = employees.get(&seed.employee_code).copied().ok_or_else(|| {
                HrError::validation(
                    "employee_code",
                    format!("unknown employee '{}' in attendance", seed.employee_code),
                )
            })?;
            store.insert_attendance(AttendanceRecord {
                id: AttendanceId::new(),
                employee_id,
                date: seed.date,
                check_in: seed.check_in,
                check_out: seed.check_out,
            })?;
            summary.attendance += 1;
        }

        info!(
            accounts = summary.accounts,
            departments = summary.departments,
            positions = summary.positions,
            employees = summary.employees,
            attendance = summary.attendance,
            "Seed applied"
        );
        Ok(summary)
    }
}

fn lookup<T: Copy>(
    table: &HashMap<String, T>,
    name: Option<&str>,
    field: &str,
) -> HrResult<Option<T>> {
    match name {
        None => Ok(None),
        Some(name) => table
            .get(name)
            .copied()
            .map(Some)
            .ok_or_else(|| HrError::validation(field, format!("unknown {} '{}'", field, name))),
    }
}
