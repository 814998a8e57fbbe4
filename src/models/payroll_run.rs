//! Payroll run report models.
//!
//! This module contains the [`PayrollRunReport`] returned by a monthly run,
//! with one [`EmployeeOutcome`] per active employee and an aggregate
//! [`PayrollSummary`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmployeeId, PayslipId};

/// What happened to one employee during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// A new payslip was written.
    Created,
    /// An existing payslip for the period was overwritten.
    Updated,
    /// The employee was excluded from the run (no position).
    Skipped,
    /// Persisting the payslip failed; nothing was written.
    Failed,
}

/// The figures behind one employee's net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Monthly salary of the employee's position.
    pub position_salary: Decimal,
    pub standard_days: u32,
    pub attended_days: u32,
    /// position_salary / standard_days * attended_days, 2 dp.
    pub prorated_base: Decimal,
    pub allowance: Decimal,
    pub deduction: Decimal,
    pub overtime: Decimal,
    pub bonus: Decimal,
    pub tax: Decimal,
    pub net_pay: Decimal,
}

/// The result of processing one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeOutcome {
    pub employee_id: EmployeeId,
    pub employee_code: String,
    pub full_name: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payslip_id: Option<PayslipId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PayBreakdown>,
    /// Why the employee was skipped or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Sum of net pay over created and updated payslips.
    pub total_net_pay: Decimal,
}

impl PayrollSummary {
    /// Folds one outcome into the summary.
    pub fn record(&mut self, outcome: &EmployeeOutcome) {
        match outcome.status {
            OutcomeStatus::Created => self.created += 1,
            OutcomeStatus::Updated => self.updated += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::Failed => self.failed += 1,
        }
        if matches!(outcome.status, OutcomeStatus::Created | OutcomeStatus::Updated) {
            if let Some(breakdown) = &outcome.breakdown {
                self.total_net_pay += breakdown.net_pay;
            }
        }
    }

    /// Number of employees that received a payslip.
    pub fn paid(&self) -> u32 {
        self.created + self.updated
    }
}

/// The full report of a monthly payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub month: u32,
    pub year: i32,
    pub standard_working_days: u32,
    pub outcomes: Vec<EmployeeOutcome>,
    pub summary: PayrollSummary,
    /// Wall-clock duration of the run in microseconds.
    pub duration_us: u64,
}

impl PayrollRunReport {
    /// Looks up the outcome recorded for an employee.
    pub fn outcome_for(&self, employee_id: EmployeeId) -> Option<&EmployeeOutcome> {
        self.outcomes.iter().find(|o| o.employee_id == employee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: OutcomeStatus, net_pay: Option<Decimal>) -> EmployeeOutcome {
        EmployeeOutcome {
            employee_id: EmployeeId::new(),
            employee_code: "NV001".to_string(),
            full_name: "Nguyen Van A".to_string(),
            status,
            payslip_id: None,
            breakdown: net_pay.map(|net_pay| PayBreakdown {
                position_salary: Decimal::ZERO,
                standard_days: 25,
                attended_days: 0,
                prorated_base: Decimal::ZERO,
                allowance: Decimal::ZERO,
                deduction: Decimal::ZERO,
                overtime: Decimal::ZERO,
                bonus: Decimal::ZERO,
                tax: Decimal::ZERO,
                net_pay,
            }),
            reason: None,
        }
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let mut summary = PayrollSummary::default();
        summary.record(&outcome(OutcomeStatus::Created, Some(Decimal::new(100, 0))));
        summary.record(&outcome(OutcomeStatus::Updated, Some(Decimal::new(50, 0))));
        summary.record(&outcome(OutcomeStatus::Skipped, None));
        summary.record(&outcome(OutcomeStatus::Failed, Some(Decimal::new(70, 0))));

        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.paid(), 2);
        assert_eq!(summary.total_net_pay, Decimal::new(150, 0));
    }

    #[test]
    fn test_skipped_outcome_omits_empty_fields() {
        let json = serde_json::to_value(outcome(OutcomeStatus::Skipped, None)).unwrap();
        assert_eq!(json["status"], "skipped");
        assert!(json.get("breakdown").is_none());
        assert!(json.get("payslip_id").is_none());
    }
}
