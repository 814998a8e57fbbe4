//! Employee model and related types.
//!
//! This module defines the Employee struct and EmployeeStatus enum
//! for representing staff in the directory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DepartmentId, EmployeeId, PositionId, PrincipalId};

/// Whether an employee is currently on staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed; included in payroll runs.
    #[default]
    Active,
    /// No longer employed; excluded from payroll runs.
    Inactive,
}

/// Represents an employee record in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// The principal whose credential this employee owns.
    pub principal_id: PrincipalId,
    /// Human-facing employee code (unique, fixed at creation).
    pub employee_code: String,
    /// The employee's full name.
    pub full_name: String,
    /// The employee's date of birth.
    pub birth_date: NaiveDate,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Department the employee belongs to, if any.
    pub department_id: Option<DepartmentId>,
    /// Position the employee holds, if any.
    pub position_id: Option<PositionId>,
}

impl Employee {
    /// Returns true if the employee is active.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_admin::models::{Employee, EmployeeId, EmployeeStatus, PrincipalId};
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: EmployeeId::new(),
    ///     principal_id: PrincipalId::new(),
    ///     employee_code: "NV001".to_string(),
    ///     full_name: "Tran Thi B".to_string(),
    ///     birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
    ///     hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    ///     status: EmployeeStatus::Active,
    ///     department_id: None,
    ///     position_id: None,
    /// };
    /// assert!(employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// Payload for creating an employee together with its login credential.
///
/// `username` and `password` are optional at the wire level so that a
/// missing value surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_code: String,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub position_id: Option<PositionId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Payload for updating an employee. The employee code cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
    pub department_id: Option<DepartmentId>,
    pub position_id: Option<PositionId>,
}
