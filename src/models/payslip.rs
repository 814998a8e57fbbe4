//! Payslip model.
//!
//! A payslip's net pay is derived, never supplied: every constructor and
//! mutator runs [`compute_net_pay`] over the stored components before the
//! record is handed to a repository.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};
use crate::payroll::compute_net_pay;

use super::{EmployeeId, PayslipId};

/// The monthly pay record of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: PayslipId,
    pub employee_id: EmployeeId,
    /// Month (1-12).
    pub month: u32,
    pub year: i32,
    /// Base pay for the month (prorated by attendance when produced by a run).
    pub base_salary: Decimal,
    pub allowance: Decimal,
    pub deduction: Decimal,
    pub overtime: Decimal,
    pub bonus: Decimal,
    pub tax: Decimal,
    /// Derived: base + allowance - deduction + overtime + bonus - tax, 2 dp.
    pub net_pay: Decimal,
    /// Standard working days used by the payroll run, if any.
    pub standard_days: Option<u32>,
    /// Attended days counted by the payroll run, if any.
    pub attended_days: Option<u32>,
}

impl Payslip {
    /// Builds a payslip from its components, deriving the net pay.
    pub fn from_draft(id: PayslipId, draft: PayslipDraft) -> HrResult<Self> {
        draft.validate()?;
        let mut payslip = Payslip {
            id,
            employee_id: draft.employee_id,
            month: draft.month,
            year: draft.year,
            base_salary: draft.base_salary,
            allowance: draft.allowance,
            deduction: draft.deduction,
            overtime: draft.overtime,
            bonus: draft.bonus,
            tax: draft.tax,
            net_pay: Decimal::ZERO,
            standard_days: draft.standard_days,
            attended_days: draft.attended_days,
        };
        payslip.recompute()?;
        Ok(payslip)
    }

    /// Re-derives the net pay from the current components.
    ///
    /// Leaves the payslip untouched if the components overflow.
    pub fn recompute(&mut self) -> HrResult<()> {
        self.net_pay = compute_net_pay(
            self.base_salary,
            self.allowance,
            self.deduction,
            self.overtime,
            self.bonus,
            self.tax,
        )?;
        Ok(())
    }

    /// Applies an administrative edit and re-derives the net pay.
    pub fn apply_update(&mut self, update: &PayslipUpdate) -> HrResult<()> {
        let mut draft = PayslipDraft::from(&*self);
        if let Some(month) = update.month {
            draft.month = month;
        }
        if let Some(year) = update.year {
            draft.year = year;
        }
        let amounts = [
            (&mut draft.base_salary, update.base_salary),
            (&mut draft.allowance, update.allowance),
            (&mut draft.deduction, update.deduction),
            (&mut draft.overtime, update.overtime),
            (&mut draft.bonus, update.bonus),
            (&mut draft.tax, update.tax),
        ];
        for (slot, value) in amounts {
            if let Some(value) = value {
                *slot = value;
            }
        }
        *self = Payslip::from_draft(self.id, draft)?;
        Ok(())
    }

    /// The (employee, month, year) key payslips are unique on.
    pub fn period_key(&self) -> (EmployeeId, u32, i32) {
        (self.employee_id, self.month, self.year)
    }
}

/// Every input component of a payslip; the net pay is absent on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipDraft {
    pub employee_id: EmployeeId,
    pub month: u32,
    pub year: i32,
    pub base_salary: Decimal,
    #[serde(default)]
    pub allowance: Decimal,
    #[serde(default)]
    pub deduction: Decimal,
    #[serde(default)]
    pub overtime: Decimal,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub standard_days: Option<u32>,
    #[serde(default)]
    pub attended_days: Option<u32>,
}

impl PayslipDraft {
    /// Validates the month and that no component is negative.
    pub fn validate(&self) -> HrResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(HrError::validation(
                "month",
                format!("{} is not between 1 and 12", self.month),
            ));
        }
        let components = [
            ("base_salary", self.base_salary),
            ("allowance", self.allowance),
            ("deduction", self.deduction),
            ("overtime", self.overtime),
            ("bonus", self.bonus),
            ("tax", self.tax),
        ];
        for (field, value) in components {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(HrError::validation(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

impl From<&Payslip> for PayslipDraft {
    fn from(payslip: &Payslip) -> Self {
        PayslipDraft {
            employee_id: payslip.employee_id,
            month: payslip.month,
            year: payslip.year,
            base_salary: payslip.base_salary,
            allowance: payslip.allowance,
            deduction: payslip.deduction,
            overtime: payslip.overtime,
            bonus: payslip.bonus,
            tax: payslip.tax,
            standard_days: payslip.standard_days,
            attended_days: payslip.attended_days,
        }
    }
}

/// Administrative edit of a payslip. There is deliberately no `net_pay`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayslipUpdate {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub base_salary: Option<Decimal>,
    pub allowance: Option<Decimal>,
    pub deduction: Option<Decimal>,
    pub overtime: Option<Decimal>,
    pub bonus: Option<Decimal>,
    pub tax: Option<Decimal>,
}
