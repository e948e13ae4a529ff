//! HTTP handlers.

use crate::error::ApiError;
use crate::AppState;
use api_shared::auth::{role_from_header, USER_ROLE_HEADER};
use api_shared::{
    CommitScheduleRes, DepartmentDto, ErrorRes, GenerateScheduleReq, GenerateScheduleRes,
    HealthRes, HealthService, ListDepartmentsRes, ListRequirementsRes, ListSlotsRes,
    ScheduleSlotDto,
};
use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, Query, State},
    http::HeaderMap,
    response::Json,
};
use rotation_core::{Cohort, GenerationRequest, Role, SlotFilter};
use serde::Deserialize;
use utoipa::IntoParams;

fn caller_role(headers: &HeaderMap) -> Result<Role, ApiError> {
    let value = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok());
    Ok(role_from_header(value)?)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint. Never requires an API key.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/schedules/preview",
    request_body = GenerateScheduleReq,
    params(("x-user-role" = String, Header, description = "Caller role, e.g. hospital_admin")),
    responses(
        (status = 200, description = "Proposed slots, or an empty outcome", body = GenerateScheduleRes),
        (status = 400, description = "Invalid body, cohort or dates", body = ErrorRes),
        (status = 401, description = "Missing API key or role", body = ErrorRes),
        (status = 403, description = "Role may not generate schedules", body = ErrorRes),
        (status = 502, description = "Requirements unavailable", body = ErrorRes)
    )
)]
/// Generate a schedule without storing it.
///
/// "No requirements" and "no eligible days" are successful responses with an empty slot list;
/// the `outcome` field tells them apart.
#[axum::debug_handler]
pub async fn preview_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateScheduleReq>, JsonRejection>,
) -> Result<Json<GenerateScheduleRes>, ApiError> {
    let role = caller_role(&headers)?;
    let Json(req) = body?;
    let request = GenerationRequest::parse(&req.cohort, &req.start_date, &req.end_date)?;
    let outcome = state.service.preview(role, &request)?;
    Ok(Json(GenerateScheduleRes::from(&outcome)))
}

#[utoipa::path(
    post,
    path = "/schedules/commit",
    request_body = GenerateScheduleReq,
    params(("x-user-role" = String, Header, description = "Caller role, e.g. hospital_admin")),
    responses(
        (status = 200, description = "Committed batch, or an empty outcome", body = CommitScheduleRes),
        (status = 400, description = "Invalid body, cohort or dates", body = ErrorRes),
        (status = 401, description = "Missing API key or role", body = ErrorRes),
        (status = 403, description = "Role may not generate schedules", body = ErrorRes),
        (status = 502, description = "Requirements unavailable", body = ErrorRes),
        (status = 500, description = "Slots could not be stored", body = ErrorRes)
    )
)]
/// Generate a schedule and store it as one batch.
#[axum::debug_handler]
pub async fn commit_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateScheduleReq>, JsonRejection>,
) -> Result<Json<CommitScheduleRes>, ApiError> {
    let role = caller_role(&headers)?;
    let Json(req) = body?;
    let request = GenerationRequest::parse(&req.cohort, &req.start_date, &req.end_date)?;
    let outcome = state.service.commit(role, &request)?;
    Ok(Json(CommitScheduleRes::from(&outcome)))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSlotsQuery {
    /// Earliest date, inclusive (`YYYY-MM-DD`).
    pub from: Option<String>,
    /// Latest date, inclusive (`YYYY-MM-DD`).
    pub to: Option<String>,
    pub department_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/slots",
    params(ListSlotsQuery),
    responses(
        (status = 200, description = "Committed slots", body = ListSlotsRes),
        (status = 400, description = "Invalid date bounds", body = ErrorRes)
    )
)]
/// List committed slots ordered by date, start time and department.
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<ListSlotsRes>, ApiError> {
    let filter = SlotFilter::parse(
        query.from.as_deref(),
        query.to.as_deref(),
        query.department_id.as_deref(),
    )?;
    let slots = state.service.list_slots(&filter)?;
    Ok(Json(ListSlotsRes {
        slots: slots.iter().map(ScheduleSlotDto::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/requirements/{cohort}",
    params(("cohort" = String, Path, description = "first, second, third or fourth")),
    responses(
        (status = 200, description = "Department requirements for the cohort", body = ListRequirementsRes),
        (status = 400, description = "Unknown cohort", body = ErrorRes),
        (status = 502, description = "Requirements unavailable", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_requirements(
    State(state): State<AppState>,
    AxumPath(cohort): AxumPath<String>,
) -> Result<Json<ListRequirementsRes>, ApiError> {
    let cohort = Cohort::parse(&cohort)?;
    let requirements = state.service.requirements_for(cohort)?;
    Ok(Json(ListRequirementsRes::new(cohort, &requirements)))
}

#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Configured departments", body = ListDepartmentsRes),
        (status = 502, description = "Requirements unavailable", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<ListDepartmentsRes>, ApiError> {
    let departments = state.service.requirements_store().departments()?;
    Ok(Json(ListDepartmentsRes {
        departments: departments.iter().map(DepartmentDto::from).collect(),
    }))
}
