//! Strongly-typed identifiers for every entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifies a department.
    DepartmentId
);
entity_id!(
    /// Identifies a position.
    PositionId
);
entity_id!(
    /// Identifies an employee record.
    EmployeeId
);
entity_id!(
    /// Identifies an authenticated principal (the login account).
    PrincipalId
);
entity_id!(
    /// Identifies an attendance record.
    AttendanceId
);
entity_id!(
    /// Identifies a leave request.
    LeaveRequestId
);
entity_id!(
    /// Identifies a payslip.
    PayslipId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_uuid() {
        let id = EmployeeId(Uuid::nil());
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"00000000-0000-0000-0000-000000000000\""
        );
    }

    #[test]
    fn test_id_parses_from_str() {
        let raw = "6f9619ff-8b86-d011-b42d-00c04fc964ff";
        let id: PrincipalId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(LeaveRequestId::new(), LeaveRequestId::new());
    }
}
