//! Position model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PositionId;

/// A job position carrying the monthly base salary used by payroll.
///
/// # Example
///
/// ```
/// use hr_admin::models::{Position, PositionId};
/// use rust_decimal::Decimal;
///
/// let position = Position {
///     id: PositionId::new(),
///     name: "Engineer".to_string(),
///     base_salary: Decimal::new(6_000_000, 0),
/// };
/// assert_eq!(position.base_salary.to_string(), "6000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier for the position.
    pub id: PositionId,
    /// The position name (unique).
    pub name: String,
    /// Monthly base salary for anyone holding this position.
    pub base_salary: Decimal,
}

/// Payload for creating a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionCreate {
    pub name: String,
    pub base_salary: Decimal,
}

/// Payload for updating a position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub name: Option<String>,
    pub base_salary: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_salary_deserializes_from_string() {
        let json = r#"{"name": "Analyst", "base_salary": "7500000.50"}"#;
        let create: PositionCreate = serde_json::from_str(json).unwrap();
        assert_eq!(create.base_salary, Decimal::new(750_000_050, 2));
    }
}
