//! Core data models for the HR administration engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod department;
mod employee;
mod identity;
mod ids;
mod leave_request;
mod payroll_run;
mod payslip;
mod position;

pub use attendance::{AttendanceCreate, AttendanceRecord, AttendanceUpdate};
pub use department::{Department, DepartmentCreate, DepartmentUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate};
pub use identity::{Credential, Role, RoleBinding};
pub use ids::{
    AttendanceId, DepartmentId, EmployeeId, LeaveRequestId, PayslipId, PositionId, PrincipalId,
};
pub use leave_request::{
    LeaveDecision, LeaveRequest, LeaveRequestCreate, LeaveRequestUpdate, LeaveStatus,
};
pub use payroll_run::{
    EmployeeOutcome, OutcomeStatus, PayBreakdown, PayrollRunReport, PayrollSummary,
};
pub use payslip::{Payslip, PayslipDraft, PayslipUpdate};
pub use position::{Position, PositionCreate, PositionUpdate};
