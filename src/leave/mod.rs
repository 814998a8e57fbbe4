//! The leave request workflow.
//!
//! Requests start `pending` and move once to `approved` or `rejected`.
//! Every mutation runs its permission and state checks inside the
//! repository transaction, so two concurrent deciders cannot both succeed.

use std::sync::Arc;

use tracing::{info, warn};

use crate::access::{Action, Caller, Capability, Resource, authorize, ensure};
use crate::error::{HrError, HrResult};
use crate::models::{
    LeaveDecision, LeaveRequest, LeaveRequestCreate, LeaveRequestId, LeaveRequestUpdate,
    LeaveStatus,
};
use crate::store::LeaveRepository;

/// Submission, review and maintenance of leave requests.
#[derive(Clone)]
pub struct LeaveWorkflow {
    repo: Arc<dyn LeaveRepository>,
}

impl LeaveWorkflow {
    pub fn new(repo: Arc<dyn LeaveRepository>) -> Self {
        Self { repo }
    }

    /// Submits a pending request owned by the caller's own employee record.
    ///
    /// # Errors
    ///
    /// - [`HrError::NoEmployeeProfile`] if the caller has no employee record.
    /// - [`HrError::Validation`] if start > end or the reason is blank.
    pub fn submit(&self, caller: &Caller, input: LeaveRequestCreate) -> HrResult<LeaveRequest> {
        ensure(caller, Action::Create, Resource::LeaveRequests)?;
        let employee_id = caller.employee_id.ok_or(HrError::NoEmployeeProfile)?;
        input.validate()?;

        let request = self.repo.insert_leave_request(LeaveRequest {
            id: LeaveRequestId::new(),
            employee_id,
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason.trim().to_string(),
            status: LeaveStatus::Pending,
        })?;
        info!(
            leave_request_id = %request.id,
            employee_id = %employee_id,
            start_date = %request.start_date,
            end_date = %request.end_date,
            "Leave request submitted"
        );
        Ok(request)
    }

    /// Lists the requests visible to the caller, newest start date first.
    ///
    /// Reviewers see every request; anyone else sees only their own.
    pub fn list(&self, caller: &Caller) -> HrResult<Vec<LeaveRequest>> {
        if caller.can(Capability::ManageAnyLeave) {
            return self.repo.list_leave_requests();
        }
        match caller.employee_id {
            Some(employee_id) => self.repo.leave_requests_for(employee_id),
            None => Ok(Vec::new()),
        }
    }

    /// Fetches one request. A request the caller cannot see is reported as
    /// not found.
    pub fn get(&self, caller: &Caller, id: LeaveRequestId) -> HrResult<LeaveRequest> {
        self.repo
            .get_leave_request(id)?
            .filter(|request| caller.can(Capability::ManageAnyLeave) || caller.owns(request))
            .ok_or_else(|| HrError::not_found("leave_request", id))
    }

    /// Approves a pending request.
    pub fn approve(&self, caller: &Caller, id: LeaveRequestId) -> HrResult<LeaveRequest> {
        self.decide(caller, id, LeaveDecision::Approve)
    }

    /// Rejects a pending request.
    pub fn reject(&self, caller: &Caller, id: LeaveRequestId) -> HrResult<LeaveRequest> {
        self.decide(caller, id, LeaveDecision::Reject)
    }

    fn decide(
        &self,
        caller: &Caller,
        id: LeaveRequestId,
        decision: LeaveDecision,
    ) -> HrResult<LeaveRequest> {
        let action = match decision {
            LeaveDecision::Approve => Action::Approve,
            LeaveDecision::Reject => Action::Reject,
        };
        // Role first, so an unauthorized caller gets Forbidden even for unknown ids.
        if !authorize(caller, action, Resource::LeaveRequests) {
            warn!(
                principal_id = %caller.principal_id,
                leave_request_id = %id,
                action = %action,
                "Leave decision denied"
            );
            return Err(HrError::forbidden(action, "leave_request"));
        }

        let request = self
            .repo
            .modify_leave_request(id, &mut |request: &mut LeaveRequest| request.decide(decision))?;
        info!(
            leave_request_id = %id,
            principal_id = %caller.principal_id,
            status = %request.status,
            "Leave request decided"
        );
        Ok(request)
    }

    /// Changes the dates or reason of a request.
    ///
    /// Reviewers may modify any request. The owner may modify it only while
    /// it is pending.
    pub fn modify(
        &self,
        caller: &Caller,
        id: LeaveRequestId,
        update: LeaveRequestUpdate,
    ) -> HrResult<LeaveRequest> {
        let request = self
            .repo
            .modify_leave_request(id, &mut |request: &mut LeaveRequest| {
                ensure(caller, Action::Update, Resource::LeaveRequest(request))?;
                request.apply_update(&update)
            })?;
        info!(leave_request_id = %id, principal_id = %caller.principal_id, "Leave request modified");
        Ok(request)
    }

    /// Deletes a request, under the same rules as [`LeaveWorkflow::modify`].
    pub fn delete(&self, caller: &Caller, id: LeaveRequestId) -> HrResult<()> {
        self.repo.remove_leave_request(id, &|request: &LeaveRequest| {
            ensure(caller, Action::Delete, Resource::LeaveRequest(request))
        })?;
        info!(leave_request_id = %id, principal_id = %caller.principal_id, "Leave request deleted");
        Ok(())
    }
}
