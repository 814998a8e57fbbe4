//! Attendance record model.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{AttendanceId, EmployeeId};

/// One check-in event for an employee on a given day.
///
/// The check-out time may be filled in later. Payroll counts every record
/// as one attended day regardless of hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub check_in: NaiveTime,
    pub check_out: Option<NaiveTime>,
}

impl AttendanceRecord {
    /// Returns true if the record falls within the given month and year.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_admin::models::{AttendanceId, AttendanceRecord, EmployeeId};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let record = AttendanceRecord {
    ///     id: AttendanceId::new(),
    ///     employee_id: EmployeeId::new(),
    ///     date: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
    ///     check_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ///     check_out: None,
    /// };
    /// assert!(record.is_in_month(4, 2024));
    /// assert!(!record.is_in_month(5, 2024));
    /// ```
    pub fn is_in_month(&self, month: u32, year: i32) -> bool {
        self.date.month() == month && self.date.year() == year
    }
}

/// Payload for recording a check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceCreate {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub check_in: NaiveTime,
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
}

/// Payload for amending an attendance record, typically adding the check-out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub date: Option<NaiveDate>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}
