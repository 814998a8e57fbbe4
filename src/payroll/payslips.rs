//! Administrative payslip maintenance.

use std::sync::Arc;

use tracing::info;

use crate::access::{Action, Caller, Resource, ensure};
use crate::error::{HrError, HrResult};
use crate::models::{Payslip, PayslipDraft, PayslipId, PayslipUpdate};
use crate::store::PayslipRepository;

/// CRUD over payslips. Writes need the `ManageRecords` capability and always
/// re-derive the net pay.
#[derive(Clone)]
pub struct PayslipService {
    payslips: Arc<dyn PayslipRepository>,
}

impl PayslipService {
    pub fn new(payslips: Arc<dyn PayslipRepository>) -> Self {
        Self { payslips }
    }

    pub fn list(&self, caller: &Caller) -> HrResult<Vec<Payslip>> {
        ensure(caller, Action::Read, Resource::Payslip)?;
        self.payslips.list_payslips()
    }

    pub fn get(&self, caller: &Caller, id: PayslipId) -> HrResult<Payslip> {
        ensure(caller, Action::Read, Resource::Payslip)?;
        self.payslips
            .get_payslip(id)?
            .ok_or_else(|| HrError::not_found("payslip", id))
    }

    /// Creates a payslip by hand. Fails if one already exists for the period.
    pub fn create(&self, caller: &Caller, draft: PayslipDraft) -> HrResult<Payslip> {
        ensure(caller, Action::Create, Resource::Payslip)?;
        let payslip = self
            .payslips
            .insert_payslip(Payslip::from_draft(PayslipId::new(), draft)?)?;
        info!(
            payslip_id = %payslip.id,
            employee_id = %payslip.employee_id,
            month = payslip.month,
            year = payslip.year,
            "Payslip created"
        );
        Ok(payslip)
    }

    pub fn update(&self, caller: &Caller, id: PayslipId, update: PayslipUpdate) -> HrResult<Payslip> {
        ensure(caller, Action::Update, Resource::Payslip)?;
        let mut payslip = self.get(caller, id)?;
        payslip.apply_update(&update)?;
        self.payslips.update_payslip(payslip)
    }

    pub fn delete(&self, caller: &Caller, id: PayslipId) -> HrResult<()> {
        ensure(caller, Action::Delete, Resource::Payslip)?;
        self.payslips.delete_payslip(id)?;
        info!(payslip_id = %id, "Payslip deleted");
        Ok(())
    }
}
