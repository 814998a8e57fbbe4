//! Payroll: net pay derivation, the monthly batch and payslip maintenance.
//!
//! The batch ([`PayrollEngine::run_monthly_payroll`]) prorates each active
//! employee's position salary by attendance, adds the configured allowance,
//! subtracts the configured deduction and upserts one payslip per
//! (employee, month, year).

mod engine;
mod net_pay;
mod payslips;
mod working_days;

pub use engine::{PayrollEngine, compute_breakdown};
pub use net_pay::{MONEY_SCALE, compute_net_pay, prorate, round_money};
pub use payslips::PayslipService;
pub use working_days::{days_in_month, previous_month, standard_working_days};
