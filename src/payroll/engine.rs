//! The monthly payroll batch.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::access::{Action, Caller, Resource, ensure};
use crate::config::PayrollSettings;
use crate::error::{HrError, HrResult};
use crate::models::{
    Employee, EmployeeOutcome, OutcomeStatus, PayBreakdown, PayrollRunReport, PayrollSummary,
    Payslip, PayslipDraft, PayslipId,
};
use crate::store::{AttendanceRepository, DirectoryRepository, PayslipRepository, UpsertOutcome};

use super::net_pay::{MONEY_SCALE, compute_net_pay, prorate, round_money};
use super::working_days::standard_working_days;

/// Computes the pay figures for one employee.
///
/// The base is prorated by attendance:
/// `position_salary / standard_days * attended_days`. Net pay is derived from
/// the exact prorated base and rounded once; the reported `prorated_base` is
/// a 2 dp copy. Overtime, bonus and tax are zero for now.
///
/// # Errors
///
/// [`HrError::Validation`] if any intermediate amount overflows.
pub fn compute_breakdown(
    position_salary: Decimal,
    standard_days: u32,
    attended_days: u32,
    settings: &PayrollSettings,
) -> HrResult<PayBreakdown> {
    let exact_base = prorate(position_salary, standard_days, attended_days)?;
    let overtime = Decimal::ZERO;
    let bonus = Decimal::ZERO;
    let tax = Decimal::ZERO;
    let net_pay = compute_net_pay(
        exact_base,
        settings.allowance,
        settings.deduction,
        overtime,
        bonus,
        tax,
    )?;

    let mut prorated_base = round_money(exact_base);
    prorated_base.rescale(MONEY_SCALE);

    Ok(PayBreakdown {
        position_salary,
        standard_days,
        attended_days,
        prorated_base,
        allowance: settings.allowance,
        deduction: settings.deduction,
        overtime,
        bonus,
        tax,
        net_pay,
    })
}

/// Runs the monthly payroll over every active employee.
#[derive(Clone)]
pub struct PayrollEngine {
    directory: Arc<dyn DirectoryRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    payslips: Arc<dyn PayslipRepository>,
    settings: PayrollSettings,
}

impl PayrollEngine {
    pub fn new(
        directory: Arc<dyn DirectoryRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        payslips: Arc<dyn PayslipRepository>,
        settings: PayrollSettings,
    ) -> Self {
        Self {
            directory,
            attendance,
            payslips,
            settings,
        }
    }

    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Runs the batch on behalf of `caller`, who must be allowed to write
    /// payslips.
    pub fn run_as(&self, caller: &Caller, month: u32, year: i32) -> HrResult<PayrollRunReport> {
        ensure(caller, Action::Create, Resource::Payslip)?;
        self.run_monthly_payroll(month, year)
    }

    /// Produces or refreshes the payslip of every active employee for the
    /// given month.
    ///
    /// Employees without a position are skipped. A failure to persist one
    /// employee's payslip is logged and reported without aborting the run.
    ///
    /// # Errors
    ///
    /// - [`HrError::Validation`] if `month` is outside 1-12.
    /// - [`HrError::NoWorkingDays`] if the month has no working day.
    /// - Any error listing the employees.
    pub fn run_monthly_payroll(&self, month: u32, year: i32) -> HrResult<PayrollRunReport> {
        let started = Instant::now();
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();

        let standard_days = standard_working_days(month, year)?;
        if standard_days == 0 {
            error!(run_id = %run_id, month, year, "No working days in month");
            return Err(HrError::NoWorkingDays { month, year });
        }

        info!(
            run_id = %run_id,
            month,
            year,
            standard_days,
            "Starting payroll run"
        );

        let employees = self.directory.list_employees()?;
        let mut outcomes = Vec::new();
        let mut summary = PayrollSummary::default();

        for employee in employees.iter().filter(|e| e.is_active()) {
            let outcome = self.process_employee(run_id, employee, month, year, standard_days);
            summary.record(&outcome);
            outcomes.push(outcome);
        }

        let duration_us = started.elapsed().as_micros() as u64;
        info!(
            run_id = %run_id,
            month,
            year,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            total_net_pay = %summary.total_net_pay,
            duration_us,
            "Payroll run complete"
        );

        Ok(PayrollRunReport {
            run_id,
            started_at,
            month,
            year,
            standard_working_days: standard_days,
            outcomes,
            summary,
            duration_us,
        })
    }

    fn process_employee(
        &self,
        run_id: Uuid,
        employee: &Employee,
        month: u32,
        year: i32,
        standard_days: u32,
    ) -> EmployeeOutcome {
        let mut outcome = EmployeeOutcome {
            employee_id: employee.id,
            employee_code: employee.employee_code.clone(),
            full_name: employee.full_name.clone(),
            status: OutcomeStatus::Skipped,
            payslip_id: None,
            breakdown: None,
            reason: None,
        };

        let position = match employee.position_id {
            None => None,
            Some(id) => match self.directory.get_position(id) {
                Ok(position) => position,
                Err(e) => return Self::failed(run_id, outcome, e),
            },
        };
        let Some(position) = position else {
            warn!(
                run_id = %run_id,
                employee_code = %employee.employee_code,
                "Skipping employee without a position"
            );
            outcome.reason = Some("employee has no position".to_string());
            return outcome;
        };

        let attended_days = match self.attendance.count_attendance(employee.id, month, year) {
            Ok(days) => days,
            Err(e) => return Self::failed(run_id, outcome, e),
        };

        let breakdown = match compute_breakdown(
            position.base_salary,
            standard_days,
            attended_days,
            &self.settings,
        ) {
            Ok(breakdown) => breakdown,
            Err(e) => return Self::failed(run_id, outcome, e),
        };
        outcome.breakdown = Some(breakdown.clone());

        match self.persist(employee, month, year, &breakdown) {
            Ok((payslip, upsert)) => {
                outcome.payslip_id = Some(payslip.id);
                outcome.status = match upsert {
                    UpsertOutcome::Created => OutcomeStatus::Created,
                    UpsertOutcome::Updated => OutcomeStatus::Updated,
                };
                outcome
            }
            Err(e) => Self::failed(run_id, outcome, e),
        }
    }

    fn persist(
        &self,
        employee: &Employee,
        month: u32,
        year: i32,
        breakdown: &PayBreakdown,
    ) -> HrResult<(Payslip, UpsertOutcome)> {
        // The stored base stays exact so that re-deriving net pay on later
        // edits reproduces the figure in the breakdown.
        let base_salary = prorate(
            breakdown.position_salary,
            breakdown.standard_days,
            breakdown.attended_days,
        )?;
        let payslip = Payslip::from_draft(
            PayslipId::new(),
            PayslipDraft {
                employee_id: employee.id,
                month,
                year,
                base_salary,
                allowance: breakdown.allowance,
                deduction: breakdown.deduction,
                overtime: breakdown.overtime,
                bonus: breakdown.bonus,
                tax: breakdown.tax,
                standard_days: Some(breakdown.standard_days),
                attended_days: Some(breakdown.attended_days),
            },
        )?;
        self.payslips.upsert_payslip(payslip)
    }

    fn failed(run_id: Uuid, mut outcome: EmployeeOutcome, err: HrError) -> EmployeeOutcome {
        error!(
            run_id = %run_id,
            employee_code = %outcome.employee_code,
            error = %err,
            "Failed to process payslip"
        );
        outcome.status = OutcomeStatus::Failed;
        outcome.payslip_id = None;
        outcome.reason = Some(err.to_string());
        outcome
    }
}

impl std::fmt::Debug for PayrollEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AttendanceId, AttendanceRecord, Credential, EmployeeId, EmployeeStatus, Position,
        PositionId, PrincipalId, Role,
    };
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        position: PositionId,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let position = store
                .insert_position(Position {
                    id: PositionId::new(),
                    name: "Engineer".to_string(),
                    base_salary: dec("6000000"),
                })
                .unwrap()
                .id;
            Self { store, position }
        }

        fn hire(&self, code: &str, status: EmployeeStatus, with_position: bool) -> EmployeeId {
            let principal_id = PrincipalId::new();
            let employee = Employee {
                id: EmployeeId::new(),
                principal_id,
                employee_code: code.to_string(),
                full_name: format!("Employee {}", code),
                birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                status,
                department_id: None,
                position_id: with_position.then_some(self.position),
            };
            let credential = Credential {
                principal_id,
                username: code.to_lowercase(),
                password_hash: "x".to_string(),
            };
            self.store.insert_employee(employee, credential).unwrap().id
        }

        fn attend(&self, employee_id: EmployeeId, month: u32, days: u32) {
            for day in 1..=days {
                self.store
                    .insert_attendance(AttendanceRecord {
                        id: AttendanceId::new(),
                        employee_id,
                        date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
                        check_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                        check_out: Some(NaiveTime::from_hms_opt(17, 0, 0).unwrap()),
                    })
                    .unwrap();
            }
        }

        fn attend_extra(&self, employee_id: EmployeeId) {
            self.store
                .insert_attendance(AttendanceRecord {
                    id: AttendanceId::new(),
                    employee_id,
                    date: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
                    check_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    check_out: None,
                })
                .unwrap();
        }

        fn engine(&self) -> PayrollEngine {
            PayrollEngine::new(
                self.store.clone(),
                self.store.clone(),
                self.store.clone(),
                PayrollSettings::default(),
            )
        }
    }

    #[test]
    fn test_reference_employee_net_pay() {
        let fx = Fixture::new();
        let id = fx.hire("NV001", EmployeeStatus::Active, true);
        fx.attend(id, 4, 20);

        let report = fx.engine().run_monthly_payroll(4, 2024).unwrap();

        assert_eq!(report.standard_working_days, 25);
        let outcome = report.outcome_for(id).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Created);
        let breakdown = outcome.breakdown.as_ref().unwrap();
        assert_eq!(breakdown.prorated_base, dec("4800000"));
        assert_eq!(breakdown.net_pay, dec("4750000.00"));

        let payslip = fx.store.find_payslip(id, 4, 2024).unwrap().unwrap();
        assert_eq!(payslip.net_pay, dec("4750000.00"));
        assert_eq!(payslip.base_salary, dec("4800000"));
        assert_eq!(payslip.attended_days, Some(20));
        assert_eq!(payslip.standard_days, Some(25));
    }

    #[test]
    fn test_inactive_employees_are_excluded() {
        let fx = Fixture::new();
        let inactive = fx.hire("NV002", EmployeeStatus::Inactive, true);
        fx.attend(inactive, 4, 10);

        let report = fx.engine().run_monthly_payroll(4, 2024).unwrap();

        assert!(report.outcome_for(inactive).is_none());
        assert!(fx.store.find_payslip(inactive, 4, 2024).unwrap().is_none());
    }

    #[test]
    fn test_employee_without_position_is_skipped() {
        let fx = Fixture::new();
        let id = fx.hire("NV003", EmployeeStatus::Active, false);

        let report = fx.engine().run_monthly_payroll(4, 2024).unwrap();

        let outcome = report.outcome_for(id).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Skipped);
        assert!(outcome.reason.is_some());
        assert_eq!(report.summary.skipped, 1);
        assert!(fx.store.find_payslip(id, 4, 2024).unwrap().is_none());
    }

    #[test]
    fn test_zero_attendance_still_gets_payslip() {
        let fx = Fixture::new();
        let id = fx.hire("NV004", EmployeeStatus::Active, true);

        let report = fx.engine().run_monthly_payroll(4, 2024).unwrap();

        let outcome = report.outcome_for(id).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Created);
        assert_eq!(outcome.breakdown.as_ref().unwrap().net_pay, dec("-50000.00"));
    }

    #[test]
    fn test_rerun_updates_instead_of_duplicating() {
        let fx = Fixture::new();
        let id = fx.hire("NV005", EmployeeStatus::Active, true);
        fx.attend(id, 4, 10);
        let engine = fx.engine();

        let first = engine.run_monthly_payroll(4, 2024).unwrap();
        fx.attend_extra(id);
        let second = engine.run_monthly_payroll(4, 2024).unwrap();

        assert_eq!(first.outcome_for(id).unwrap().status, OutcomeStatus::Created);
        let outcome = second.outcome_for(id).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Updated);
        assert_eq!(outcome.payslip_id, first.outcome_for(id).unwrap().payslip_id);
        assert_eq!(fx.store.list_payslips().unwrap().len(), 1);
        assert_eq!(
            fx.store.find_payslip(id, 4, 2024).unwrap().unwrap().attended_days,
            Some(11)
        );
    }

    #[test]
    fn test_attendance_outside_month_is_ignored() {
        let fx = Fixture::new();
        let id = fx.hire("NV006", EmployeeStatus::Active, true);
        fx.attend(id, 3, 5);
        fx.attend(id, 4, 2);

        let report = fx.engine().run_monthly_payroll(4, 2024).unwrap();

        assert_eq!(report.outcome_for(id).unwrap().breakdown.as_ref().unwrap().attended_days, 2);
    }

    #[test]
    fn test_invalid_month_aborts_run() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.engine().run_monthly_payroll(13, 2024),
            Err(HrError::Validation { .. })
        ));
    }

    /// Delegates to a [`MemoryStore`] but refuses to upsert one employee's
    /// payslip.
    struct FailingPayslips {
        inner: Arc<MemoryStore>,
        poisoned: EmployeeId,
    }

    impl PayslipRepository for FailingPayslips {
        fn list_payslips(&self) -> HrResult<Vec<Payslip>> {
            self.inner.list_payslips()
        }

        fn get_payslip(&self, id: PayslipId) -> HrResult<Option<Payslip>> {
            self.inner.get_payslip(id)
        }

        fn find_payslip(
            &self,
            employee: EmployeeId,
            month: u32,
            year: i32,
        ) -> HrResult<Option<Payslip>> {
            self.inner.find_payslip(employee, month, year)
        }

        fn insert_payslip(&self, payslip: Payslip) -> HrResult<Payslip> {
            self.inner.insert_payslip(payslip)
        }

        fn update_payslip(&self, payslip: Payslip) -> HrResult<Payslip> {
            self.inner.update_payslip(payslip)
        }

        fn delete_payslip(&self, id: PayslipId) -> HrResult<()> {
            self.inner.delete_payslip(id)
        }

        fn upsert_payslip(&self, payslip: Payslip) -> HrResult<(Payslip, UpsertOutcome)> {
            if payslip.employee_id == self.poisoned {
                return Err(HrError::Persistence {
                    message: "disk full".to_string(),
                });
            }
            self.inner.upsert_payslip(payslip)
        }
    }

    #[test]
    fn test_persistence_failure_does_not_abort_batch() {
        let fx = Fixture::new();
        let bad = fx.hire("NV007", EmployeeStatus::Active, true);
        let good = fx.hire("NV008", EmployeeStatus::Active, true);

        let engine = PayrollEngine::new(
            fx.store.clone(),
            fx.store.clone(),
            Arc::new(FailingPayslips {
                inner: fx.store.clone(),
                poisoned: bad,
            }),
            PayrollSettings::default(),
        );
        let report = engine.run_monthly_payroll(4, 2024).unwrap();

        let failed = report.outcome_for(bad).unwrap();
        assert_eq!(failed.status, OutcomeStatus::Failed);
        assert!(failed.reason.as_deref().unwrap().contains("disk full"));
        assert!(fx.store.find_payslip(bad, 4, 2024).unwrap().is_none());

        assert_eq!(report.outcome_for(good).unwrap().status, OutcomeStatus::Created);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.created, 1);
    }

    #[test]
    fn test_run_as_requires_manage_records() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let employee = Caller {
            principal_id: PrincipalId::new(),
            role: Role::Employee,
            employee_id: None,
        };
        assert!(matches!(
            engine.run_as(&employee, 4, 2024),
            Err(HrError::Forbidden { .. })
        ));

        let hr = Caller {
            role: Role::Hr,
            ..employee
        };
        assert!(engine.run_as(&hr, 4, 2024).is_ok());
    }

    #[test]
    fn test_custom_settings_flow_into_breakdown() {
        let settings = PayrollSettings {
            allowance: dec("0"),
            deduction: dec("100.005"),
        };
        let breakdown = compute_breakdown(dec("1000"), 3, 1, &settings).unwrap();
        assert_eq!(breakdown.prorated_base, dec("333.33"));
        // 333.3333... - 100.005 rounds once, to 233.33.
        assert_eq!(breakdown.net_pay, dec("233.33"));
    }

    #[test]
    fn test_stored_payslip_matches_breakdown_net_pay() {
        let fx = Fixture::new();
        let id = fx.hire("NV009", EmployeeStatus::Active, true);
        fx.attend(id, 4, 7);
        let engine = PayrollEngine::new(
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
            PayrollSettings {
                allowance: dec("0"),
                deduction: dec("0.005"),
            },
        );

        let report = engine.run_monthly_payroll(4, 2024).unwrap();

        // 6,000,000 / 25 * 7 = 1,680,000; minus 0.005 ties to even.
        let net = report.outcome_for(id).unwrap().breakdown.as_ref().unwrap().net_pay;
        assert_eq!(net, dec("1680000.00"));
        let payslip = fx.store.find_payslip(id, 4, 2024).unwrap().unwrap();
        assert_eq!(payslip.net_pay, net);
    }

    #[test]
    fn test_overflowing_salary_fails_only_that_employee() {
        let fx = Fixture::new();
        let huge = fx
            .store
            .insert_position(Position {
                id: PositionId::new(),
                name: "Oligarch".to_string(),
                base_salary: Decimal::MAX,
            })
            .unwrap()
            .id;
        let rich = fx.hire("NV010", EmployeeStatus::Active, true);
        let mut employee = fx.store.get_employee(rich).unwrap().unwrap();
        employee.position_id = Some(huge);
        fx.store.update_employee(employee).unwrap();
        fx.attend(rich, 4, 26);
        let normal = fx.hire("NV011", EmployeeStatus::Active, true);

        let report = fx.engine().run_monthly_payroll(4, 2024).unwrap();

        let failed = report.outcome_for(rich).unwrap();
        assert_eq!(failed.status, OutcomeStatus::Failed);
        assert!(failed.breakdown.is_none());
        assert!(fx.store.find_payslip(rich, 4, 2024).unwrap().is_none());
        assert_eq!(report.outcome_for(normal).unwrap().status, OutcomeStatus::Created);
        assert_eq!(report.summary.failed, 1);
    }

    #[test]
    fn test_overflowing_breakdown_is_an_error() {
        assert!(matches!(
            compute_breakdown(Decimal::MAX, 25, 26, &PayrollSettings::default()),
            Err(HrError::Validation { .. })
        ));
    }
}
