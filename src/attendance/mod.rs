//! Daily attendance records.
//!
//! Each record is one check-in (and optionally a check-out) of one employee
//! on one date. The payroll counts records per month as attended days.

use std::sync::Arc;

use chrono::NaiveTime;
use tracing::info;

use crate::access::{Action, Caller, Resource, ensure};
use crate::error::{HrError, HrResult};
use crate::models::{AttendanceCreate, AttendanceId, AttendanceRecord, AttendanceUpdate};
use crate::store::AttendanceRepository;

fn check_times(check_in: NaiveTime, check_out: Option<NaiveTime>) -> HrResult<()> {
    match check_out {
        Some(out) if out < check_in => Err(HrError::validation(
            "check_out",
            format!("check-out {} precedes check-in {}", out, check_in),
        )),
        _ => Ok(()),
    }
}

/// CRUD over attendance records. Writes need the `ManageRecords` capability.
#[derive(Clone)]
pub struct AttendanceLog {
    repo: Arc<dyn AttendanceRepository>,
}

impl AttendanceLog {
    pub fn new(repo: Arc<dyn AttendanceRepository>) -> Self {
        Self { repo }
    }

    /// Lists every record, newest date first.
    pub fn list(&self, caller: &Caller) -> HrResult<Vec<AttendanceRecord>> {
        ensure(caller, Action::Read, Resource::Attendance)?;
        self.repo.list_attendance()
    }

    pub fn get(&self, caller: &Caller, id: AttendanceId) -> HrResult<AttendanceRecord> {
        ensure(caller, Action::Read, Resource::Attendance)?;
        self.repo
            .get_attendance(id)?
            .ok_or_else(|| HrError::not_found("attendance", id))
    }

    pub fn create(&self, caller: &Caller, input: AttendanceCreate) -> HrResult<AttendanceRecord> {
        ensure(caller, Action::Create, Resource::Attendance)?;
        check_times(input.check_in, input.check_out)?;
        let record = self.repo.insert_attendance(AttendanceRecord {
            id: AttendanceId::new(),
            employee_id: input.employee_id,
            date: input.date,
            check_in: input.check_in,
            check_out: input.check_out,
        })?;
        info!(
            attendance_id = %record.id,
            employee_id = %record.employee_id,
            date = %record.date,
            "Attendance recorded"
        );
        Ok(record)
    }

    pub fn update(
        &self,
        caller: &Caller,
        id: AttendanceId,
        input: AttendanceUpdate,
    ) -> HrResult<AttendanceRecord> {
        ensure(caller, Action::Update, Resource::Attendance)?;
        let mut record = self.get(caller, id)?;
        if let Some(date) = input.date {
            record.date = date;
        }
        if let Some(check_in) = input.check_in {
            record.check_in = check_in;
        }
        if input.check_out.is_some() {
            record.check_out = input.check_out;
        }
        check_times(record.check_in, record.check_out)?;
        self.repo.update_attendance(record)
    }

    pub fn delete(&self, caller: &Caller, id: AttendanceId) -> HrResult<()> {
        ensure(caller, Action::Delete, Resource::Attendance)?;
        self.repo.delete_attendance(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, Employee, EmployeeId, EmployeeStatus, PrincipalId, Role};
    use crate::store::{DirectoryRepository, MemoryStore};
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn caller(role: Role) -> Caller {
        Caller {
            principal_id: PrincipalId::new(),
            role,
            employee_id: None,
        }
    }

    fn setup() -> (AttendanceLog, EmployeeId) {
        let store = Arc::new(MemoryStore::new());
        let principal_id = PrincipalId::new();
        let employee = store
            .insert_employee(
                Employee {
                    id: EmployeeId::new(),
                    principal_id,
                    employee_code: "NV020".to_string(),
                    full_name: "Pham Thi D".to_string(),
                    birth_date: NaiveDate::from_ymd_opt(1988, 8, 8).unwrap(),
                    hire_date: NaiveDate::from_ymd_opt(2019, 9, 9).unwrap(),
                    status: EmployeeStatus::Active,
                    department_id: None,
                    position_id: None,
                },
                Credential {
                    principal_id,
                    username: "ptd".to_string(),
                    password_hash: "x".to_string(),
                },
            )
            .unwrap();
        (AttendanceLog::new(store), employee.id)
    }

    fn check_in(employee_id: EmployeeId, day: u32) -> AttendanceCreate {
        AttendanceCreate {
            employee_id,
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            check_in: time(8, 0),
            check_out: None,
        }
    }

    #[test]
    fn test_check_in_then_check_out() {
        let (log, employee_id) = setup();
        let manager = caller(Role::Manager);
        let record = log.create(&manager, check_in(employee_id, 1)).unwrap();

        let updated = log
            .update(
                &manager,
                record.id,
                AttendanceUpdate {
                    check_out: Some(time(17, 30)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.check_out, Some(time(17, 30)));
        assert_eq!(updated.check_in, time(8, 0));
    }

    #[test]
    fn test_check_out_before_check_in_rejected() {
        let (log, employee_id) = setup();
        let mut input = check_in(employee_id, 2);
        input.check_out = Some(time(7, 0));
        assert!(matches!(
            log.create(&caller(Role::Hr), input),
            Err(HrError::Validation { ref field, .. }) if field == "check_out"
        ));
    }

    #[test]
    fn test_unknown_employee_rejected() {
        let (log, _) = setup();
        assert!(matches!(
            log.create(&caller(Role::Hr), check_in(EmployeeId::new(), 3)),
            Err(HrError::Validation { .. })
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let (log, employee_id) = setup();
        let hr = caller(Role::Hr);
        for day in [3, 10, 5] {
            log.create(&hr, check_in(employee_id, day)).unwrap();
        }
        let days: Vec<u32> = log
            .list(&caller(Role::Employee))
            .unwrap()
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(days, vec![10, 5, 3]);
    }

    #[test]
    fn test_employee_cannot_record_attendance() {
        let (log, employee_id) = setup();
        assert!(matches!(
            log.create(&caller(Role::Employee), check_in(employee_id, 4)),
            Err(HrError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (log, _) = setup();
        assert!(matches!(
            log.delete(&caller(Role::Admin), AttendanceId::new()),
            Err(HrError::NotFound { .. })
        ));
    }
}
