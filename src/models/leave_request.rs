//! Leave request model and its status state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

use super::{EmployeeId, LeaveRequestId};

/// Lifecycle status of a leave request.
///
/// `Pending` is the only non-terminal state; `Approved` and `Rejected`
/// have no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Approved by an authorized role.
    Approved,
    /// Rejected by an authorized role.
    Rejected,
}

/// A decision an authorized role can take on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    Approve,
    Reject,
}

impl LeaveStatus {
    /// Returns true while the request can still change.
    pub fn is_pending(self) -> bool {
        self == LeaveStatus::Pending
    }

    /// Applies a decision, returning the resulting status.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_admin::models::{LeaveDecision, LeaveStatus};
    ///
    /// assert_eq!(
    ///     LeaveStatus::Pending.apply(LeaveDecision::Approve),
    ///     Some(LeaveStatus::Approved)
    /// );
    /// assert_eq!(LeaveStatus::Rejected.apply(LeaveDecision::Approve), None);
    /// ```
    pub fn apply(self, decision: LeaveDecision) -> Option<LeaveStatus> {
        match (self, decision) {
            (LeaveStatus::Pending, LeaveDecision::Approve) => Some(LeaveStatus::Approved),
            (LeaveStatus::Pending, LeaveDecision::Reject) => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A request for leave submitted by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    /// The owning employee; always the submitter.
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Moves the request to the status implied by `decision`.
    ///
    /// Fails with [`HrError::InvalidState`] if the request is no longer pending;
    /// the request is left untouched in that case.
    pub fn decide(&mut self, decision: LeaveDecision) -> HrResult<()> {
        let next = self.status.apply(decision).ok_or_else(|| HrError::InvalidState {
            id: self.id.to_string(),
            status: self.status.to_string(),
        })?;
        self.status = next;
        Ok(())
    }

    /// Applies modifiable fields, validating the resulting date range.
    pub fn apply_update(&mut self, update: &LeaveRequestUpdate) -> HrResult<()> {
        let start = update.start_date.unwrap_or(self.start_date);
        let end = update.end_date.unwrap_or(self.end_date);
        validate_range(start, end)?;
        if let Some(reason) = &update.reason {
            validate_reason(reason)?;
            self.reason = reason.trim().to_string();
        }
        self.start_date = start;
        self.end_date = end;
        Ok(())
    }
}

/// Fields an employee supplies when submitting a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestCreate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveRequestCreate {
    /// Validates the submission.
    pub fn validate(&self) -> HrResult<()> {
        validate_range(self.start_date, self.end_date)?;
        validate_reason(&self.reason)
    }
}

/// Modifiable fields of a leave request. Status is changed only by
/// approve/reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveRequestUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> HrResult<()> {
    if start > end {
        return Err(HrError::validation(
            "end_date",
            format!("end date {} is before start date {}", end, start),
        ));
    }
    Ok(())
}

fn validate_reason(reason: &str) -> HrResult<()> {
    if reason.trim().is_empty() {
        return Err(HrError::validation("reason", "must not be blank"));
    }
    Ok(())
}
