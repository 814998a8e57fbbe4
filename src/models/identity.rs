//! Identity models: roles, role bindings and login credentials.

use serde::{Deserialize, Serialize};

use super::{EmployeeId, PrincipalId};

/// The closed set of roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Human-resources staff.
    #[serde(rename = "HR")]
    Hr,
    /// Line manager.
    Manager,
    /// Regular employee; the fallback when no binding exists.
    #[default]
    Employee,
}

impl Role {
    /// Returns true for the roles that manage records and decide leave.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Hr => write!(f, "HR"),
            Role::Manager => write!(f, "Manager"),
            Role::Employee => write!(f, "Employee"),
        }
    }
}

/// Binds a principal to a role and, optionally, to an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub principal_id: PrincipalId,
    pub role: Role,
    pub employee_id: Option<EmployeeId>,
}

/// A login credential owned by one employee.
///
/// Only the argon2 hash of the password is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub principal_id: PrincipalId,
    pub username: String,
    pub password_hash: String,
}
