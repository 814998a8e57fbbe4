//! Department model.

use serde::{Deserialize, Serialize};

use super::DepartmentId;

/// An organizational unit employees may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier for the department.
    pub id: DepartmentId,
    /// The department name (unique).
    pub name: String,
}

/// Payload for creating a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCreate {
    pub name: String,
}

/// Payload for updating a department.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
}
