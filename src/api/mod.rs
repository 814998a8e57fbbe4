//! HTTP API for the HR administration engine.
//!
//! This module provides the REST endpoints for the directory, attendance,
//! leave requests, payslips and the payroll trigger.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PRINCIPAL_HEADER, PayrollRunRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
