//! Request types for the HR administration API.
//!
//! Resource payloads reuse the `*Create`/`*Update` models directly; only
//! the endpoints without a model counterpart are defined here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payroll::previous_month;

/// Header carrying the authenticated principal.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// Body of `POST /payroll/run`. Omitted fields default to the previous
/// calendar month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl PayrollRunRequest {
    /// Resolves the target period relative to `today`.
    pub fn period(&self, today: NaiveDate) -> (u32, i32) {
        let (default_month, default_year) = previous_month(today);
        (
            self.month.unwrap_or(default_month),
            self.year.unwrap_or(default_year),
        )
    }
}
