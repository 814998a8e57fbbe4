//! HTTP request handlers for the HR administration API.
//!
//! Every handler identifies the caller from the `X-Principal-Id` header,
//! delegates to a service and maps [`crate::error::HrError`] into an
//! [`ApiErrorResponse`].

use std::str::FromStr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::access::Caller;
use crate::error::HrResult;
use crate::models::{
    AttendanceCreate, AttendanceId, AttendanceRecord, AttendanceUpdate, Department,
    DepartmentCreate, DepartmentId, DepartmentUpdate, Employee, EmployeeCreate, EmployeeId,
    EmployeeUpdate, LeaveRequest, LeaveRequestCreate, LeaveRequestId, LeaveRequestUpdate,
    PayrollRunReport, Payslip, PayslipDraft, PayslipId, PayslipUpdate, Position, PositionCreate,
    PositionId, PositionUpdate, PrincipalId,
};

use super::request::{PRINCIPAL_HEADER, PayrollRunRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdPath<T> = Result<Path<T>, PathRejection>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/:id",
            get(get_department)
                .put(update_department)
                .patch(update_department)
                .delete(delete_department),
        )
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/:id",
            get(get_position)
                .put(update_position)
                .patch(update_position)
                .delete(delete_position),
        )
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee)
                .put(update_employee)
                .patch(update_employee)
                .delete(delete_employee),
        )
        .route("/attendance", get(list_attendance).post(create_attendance))
        .route(
            "/attendance/:id",
            get(get_attendance)
                .put(update_attendance)
                .patch(update_attendance)
                .delete(delete_attendance),
        )
        .route("/leave-requests", get(list_leave).post(submit_leave))
        .route(
            "/leave-requests/:id",
            get(get_leave)
                .put(modify_leave)
                .patch(modify_leave)
                .delete(delete_leave),
        )
        .route("/leave-requests/:id/approve", post(approve_leave))
        .route("/leave-requests/:id/reject", post(reject_leave))
        .route("/payslips", get(list_payslips).post(create_payslip))
        .route(
            "/payslips/:id",
            get(get_payslip)
                .put(update_payslip)
                .patch(update_payslip)
                .delete(delete_payslip),
        )
        .route("/payroll/run", post(run_payroll))
        .with_state(state)
}

/// Per-request bookkeeping: correlation id, operation name and caller.
struct RequestContext {
    correlation_id: Uuid,
    operation: &'static str,
    caller: Caller,
}

impl RequestContext {
    /// Starts a request: logs it and resolves the caller from the headers.
    fn begin(state: &AppState, headers: &HeaderMap, operation: &'static str) -> ApiResult<Self> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, operation, "Processing request");

        let Some(raw) = headers.get(PRINCIPAL_HEADER) else {
            warn!(correlation_id = %correlation_id, operation, "Missing principal header");
            return Err(ApiErrorResponse::unauthenticated(
                "Missing X-Principal-Id header",
            ));
        };
        let principal = raw
            .to_str()
            .ok()
            .and_then(|value| PrincipalId::from_str(value.trim()).ok())
            .ok_or_else(|| {
                warn!(correlation_id = %correlation_id, operation, "Malformed principal header");
                ApiErrorResponse::unauthenticated("X-Principal-Id must be a UUID")
            })?;

        let caller = state.access().resolve(principal).map_err(|err| {
            error!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Failed to resolve caller"
            );
            ApiErrorResponse::from(err)
        })?;

        Ok(Self {
            correlation_id,
            operation,
            caller,
        })
    }

    /// Unwraps a JSON body, mapping rejections the same way for every route.
    fn body<T>(&self, payload: JsonBody<T>) -> ApiResult<T> {
        payload.map(|Json(value)| value).map_err(|rejection| {
            warn!(
                correlation_id = %self.correlation_id,
                operation = self.operation,
                error = %rejection.body_text(),
                "Rejected request body"
            );
            rejection.into()
        })
    }

    fn path<T>(&self, path: IdPath<T>) -> ApiResult<T> {
        path.map(|Path(value)| value).map_err(|rejection| {
            warn!(
                correlation_id = %self.correlation_id,
                operation = self.operation,
                error = %rejection.body_text(),
                "Rejected path parameter"
            );
            rejection.into()
        })
    }

    /// Logs the outcome of a service call and converts its error.
    fn finish<T>(&self, result: HrResult<T>) -> ApiResult<T> {
        match result {
            Ok(value) => {
                info!(
                    correlation_id = %self.correlation_id,
                    operation = self.operation,
                    principal_id = %self.caller.principal_id,
                    role = %self.caller.role,
                    "Request completed"
                );
                Ok(value)
            }
            Err(err) => {
                let response = ApiErrorResponse::from(err.clone());
                if response.status.is_server_error() {
                    error!(
                        correlation_id = %self.correlation_id,
                        operation = self.operation,
                        error = %err,
                        "Request failed"
                    );
                } else {
                    warn!(
                        correlation_id = %self.correlation_id,
                        operation = self.operation,
                        error = %err,
                        "Request rejected"
                    );
                }
                Err(response)
            }
        }
    }
}

// Departments

async fn list_departments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Department>>> {
    let ctx = RequestContext::begin(&state, &headers, "list_departments")?;
    ctx.finish(state.directory().list_departments(&ctx.caller)).map(Json)
}

async fn get_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<DepartmentId>,
) -> ApiResult<Json<Department>> {
    let ctx = RequestContext::begin(&state, &headers, "get_department")?;
    let id = ctx.path(id)?;
    ctx.finish(state.directory().get_department(&ctx.caller, id)).map(Json)
}

async fn create_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonBody<DepartmentCreate>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    let ctx = RequestContext::begin(&state, &headers, "create_department")?;
    let input = ctx.body(payload)?;
    let department = ctx.finish(state.directory().create_department(&ctx.caller, input))?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn update_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<DepartmentId>,
    payload: JsonBody<DepartmentUpdate>,
) -> ApiResult<Json<Department>> {
    let ctx = RequestContext::begin(&state, &headers, "update_department")?;
    let id = ctx.path(id)?;
    let input = ctx.body(payload)?;
    ctx.finish(state.directory().update_department(&ctx.caller, id, input))
        .map(Json)
}

async fn delete_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<DepartmentId>,
) -> ApiResult<StatusCode> {
    let ctx = RequestContext::begin(&state, &headers, "delete_department")?;
    let id = ctx.path(id)?;
    ctx.finish(state.directory().delete_department(&ctx.caller, id))?;
    Ok(StatusCode::NO_CONTENT)
}

// Positions

async fn list_positions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Position>>> {
    let ctx = RequestContext::begin(&state, &headers, "list_positions")?;
    ctx.finish(state.directory().list_positions(&ctx.caller)).map(Json)
}

async fn get_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<PositionId>,
) -> ApiResult<Json<Position>> {
    let ctx = RequestContext::begin(&state, &headers, "get_position")?;
    let id = ctx.path(id)?;
    ctx.finish(state.directory().get_position(&ctx.caller, id)).map(Json)
}

async fn create_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonBody<PositionCreate>,
) -> ApiResult<(StatusCode, Json<Position>)> {
    let ctx = RequestContext::begin(&state, &headers, "create_position")?;
    let input = ctx.body(payload)?;
    let position = ctx.finish(state.directory().create_position(&ctx.caller, input))?;
    Ok((StatusCode::CREATED, Json(position)))
}

async fn update_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<PositionId>,
    payload: JsonBody<PositionUpdate>,
) -> ApiResult<Json<Position>> {
    let ctx = RequestContext::begin(&state, &headers, "update_position")?;
    let id = ctx.path(id)?;
    let input = ctx.body(payload)?;
    ctx.finish(state.directory().update_position(&ctx.caller, id, input))
        .map(Json)
}

async fn delete_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<PositionId>,
) -> ApiResult<StatusCode> {
    let ctx = RequestContext::begin(&state, &headers, "delete_position")?;
    let id = ctx.path(id)?;
    ctx.finish(state.directory().delete_position(&ctx.caller, id))?;
    Ok(StatusCode::NO_CONTENT)
}

// Employees

async fn list_employees(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Employee>>> {
    let ctx = RequestContext::begin(&state, &headers, "list_employees")?;
    ctx.finish(state.directory().list_employees(&ctx.caller)).map(Json)
}

async fn get_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<EmployeeId>,
) -> ApiResult<Json<Employee>> {
    let ctx = RequestContext::begin(&state, &headers, "get_employee")?;
    let id = ctx.path(id)?;
    ctx.finish(state.directory().get_employee(&ctx.caller, id)).map(Json)
}

async fn create_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonBody<EmployeeCreate>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let ctx = RequestContext::begin(&state, &headers, "create_employee")?;
    let input = ctx.body(payload)?;
    let employee = ctx.finish(state.directory().create_employee(&ctx.caller, input))?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<EmployeeId>,
    payload: JsonBody<EmployeeUpdate>,
) -> ApiResult<Json<Employee>> {
    let ctx = RequestContext::begin(&state, &headers, "update_employee")?;
    let id = ctx.path(id)?;
    let input = ctx.body(payload)?;
    ctx.finish(state.directory().update_employee(&ctx.caller, id, input))
        .map(Json)
}

async fn delete_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<EmployeeId>,
) -> ApiResult<StatusCode> {
    let ctx = RequestContext::begin(&state, &headers, "delete_employee")?;
    let id = ctx.path(id)?;
    ctx.finish(state.directory().delete_employee(&ctx.caller, id))?;
    Ok(StatusCode::NO_CONTENT)
}

// Attendance

async fn list_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let ctx = RequestContext::begin(&state, &headers, "list_attendance")?;
    ctx.finish(state.attendance().list(&ctx.caller)).map(Json)
}

async fn get_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<AttendanceId>,
) -> ApiResult<Json<AttendanceRecord>> {
    let ctx = RequestContext::begin(&state, &headers, "get_attendance")?;
    let id = ctx.path(id)?;
    ctx.finish(state.attendance().get(&ctx.caller, id)).map(Json)
}

async fn create_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonBody<AttendanceCreate>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let ctx = RequestContext::begin(&state, &headers, "create_attendance")?;
    let input = ctx.body(payload)?;
    let record = ctx.finish(state.attendance().create(&ctx.caller, input))?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<AttendanceId>,
    payload: JsonBody<AttendanceUpdate>,
) -> ApiResult<Json<AttendanceRecord>> {
    let ctx = RequestContext::begin(&state, &headers, "update_attendance")?;
    let id = ctx.path(id)?;
    let input = ctx.body(payload)?;
    ctx.finish(state.attendance().update(&ctx.caller, id, input))
        .map(Json)
}

async fn delete_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<AttendanceId>,
) -> ApiResult<StatusCode> {
    let ctx = RequestContext::begin(&state, &headers, "delete_attendance")?;
    let id = ctx.path(id)?;
    ctx.finish(state.attendance().delete(&ctx.caller, id))?;
    Ok(StatusCode::NO_CONTENT)
}

// Leave requests

async fn list_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<LeaveRequest>>> {
    let ctx = RequestContext::begin(&state, &headers, "list_leave_requests")?;
    ctx.finish(state.leave().list(&ctx.caller)).map(Json)
}

async fn get_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<LeaveRequestId>,
) -> ApiResult<Json<LeaveRequest>> {
    let ctx = RequestContext::begin(&state, &headers, "get_leave_request")?;
    let id = ctx.path(id)?;
    ctx.finish(state.leave().get(&ctx.caller, id)).map(Json)
}

async fn submit_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonBody<LeaveRequestCreate>,
) -> ApiResult<(StatusCode, Json<LeaveRequest>)> {
    let ctx = RequestContext::begin(&state, &headers, "submit_leave_request")?;
    let input = ctx.body(payload)?;
    let request = ctx.finish(state.leave().submit(&ctx.caller, input))?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn modify_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<LeaveRequestId>,
    payload: JsonBody<LeaveRequestUpdate>,
) -> ApiResult<Json<LeaveRequest>> {
    let ctx = RequestContext::begin(&state, &headers, "modify_leave_request")?;
    let id = ctx.path(id)?;
    let input = ctx.body(payload)?;
    ctx.finish(state.leave().modify(&ctx.caller, id, input)).map(Json)
}

async fn delete_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<LeaveRequestId>,
) -> ApiResult<StatusCode> {
    let ctx = RequestContext::begin(&state, &headers, "delete_leave_request")?;
    let id = ctx.path(id)?;
    ctx.finish(state.leave().delete(&ctx.caller, id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<LeaveRequestId>,
) -> ApiResult<Json<LeaveRequest>> {
    let ctx = RequestContext::begin(&state, &headers, "approve_leave_request")?;
    let id = ctx.path(id)?;
    ctx.finish(state.leave().approve(&ctx.caller, id)).map(Json)
}

async fn reject_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<LeaveRequestId>,
) -> ApiResult<Json<LeaveRequest>> {
    let ctx = RequestContext::begin(&state, &headers, "reject_leave_request")?;
    let id = ctx.path(id)?;
    ctx.finish(state.leave().reject(&ctx.caller, id)).map(Json)
}

// Payslips

async fn list_payslips(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Payslip>>> {
    let ctx = RequestContext::begin(&state, &headers, "list_payslips")?;
    ctx.finish(state.payslips().list(&ctx.caller)).map(Json)
}

async fn get_payslip(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<PayslipId>,
) -> ApiResult<Json<Payslip>> {
    let ctx = RequestContext::begin(&state, &headers, "get_payslip")?;
    let id = ctx.path(id)?;
    ctx.finish(state.payslips().get(&ctx.caller, id)).map(Json)
}

async fn create_payslip(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: JsonBody<PayslipDraft>,
) -> ApiResult<(StatusCode, Json<Payslip>)> {
    let ctx = RequestContext::begin(&state, &headers, "create_payslip")?;
    let input = ctx.body(payload)?;
    let payslip = ctx.finish(state.payslips().create(&ctx.caller, input))?;
    Ok((StatusCode::CREATED, Json(payslip)))
}

async fn update_payslip(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<PayslipId>,
    payload: JsonBody<PayslipUpdate>,
) -> ApiResult<Json<Payslip>> {
    let ctx = RequestContext::begin(&state, &headers, "update_payslip")?;
    let id = ctx.path(id)?;
    let input = ctx.body(payload)?;
    ctx.finish(state.payslips().update(&ctx.caller, id, input))
        .map(Json)
}

async fn delete_payslip(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdPath<PayslipId>,
) -> ApiResult<StatusCode> {
    let ctx = RequestContext::begin(&state, &headers, "delete_payslip")?;
    let id = ctx.path(id)?;
    ctx.finish(state.payslips().delete(&ctx.caller, id))?;
    Ok(StatusCode::NO_CONTENT)
}

// Payroll

/// Handler for POST /payroll/run.
///
/// The body is optional; an empty body runs the previous calendar month.
async fn run_payroll(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<PayrollRunReport>> {
    let ctx = RequestContext::begin(&state, &headers, "run_payroll")?;

    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PayrollRunRequest::default()
    } else {
        serde_json::from_slice::<PayrollRunRequest>(&body).map_err(|err| {
            warn!(
                correlation_id = %ctx.correlation_id,
                error = %err,
                "Rejected payroll run body"
            );
            ApiErrorResponse::bad_request(ApiError::malformed_json(err.to_string()))
        })?
    };
    let (month, year) = request.period(Utc::now().date_naive());

    let report = ctx.finish(state.payroll().run_as(&ctx.caller, month, year))?;
    info!(
        correlation_id = %ctx.correlation_id,
        run_id = %report.run_id,
        month,
        year,
        paid = report.summary.paid(),
        failed = report.summary.failed,
        duration_us = report.duration_us,
        "Payroll run served"
    );
    Ok(Json(report))
}
