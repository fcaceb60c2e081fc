use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{parse_date, StaffId, StaffMember, StaffSubmission};
use super::repository::{RepositoryError, StaffRepository};
use super::service::{StaffDirectoryService, StaffListFilter, StaffServiceError};
use crate::performance::{
    ClockSource, DaySelector, MonthSelector, PerformanceReport, ReportClock, WindowError,
};
use crate::records::{RecordRepository, RecordService};

/// Shared state for the staff endpoints.
pub struct StaffRoutes<S, R> {
    pub staff: Arc<StaffDirectoryService<S>>,
    pub records: Arc<RecordService<R>>,
    pub clock: ClockSource,
}

impl<S, R> Clone for StaffRoutes<S, R> {
    fn clone(&self) -> Self {
        Self {
            staff: self.staff.clone(),
            records: self.records.clone(),
            clock: self.clock,
        }
    }
}

pub fn staff_router<S, R>(routes: StaffRoutes<S, R>) -> Router
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/staff",
            get(list_handler::<S, R>).post(create_handler::<S, R>),
        )
        .route(
            "/api/v1/staff/:staff_id",
            get(get_handler::<S, R>)
                .put(update_handler::<S, R>)
                .delete(remove_handler::<S, R>),
        )
        .route(
            "/api/v1/staff/:staff_id/deactivate",
            axum::routing::post(deactivate_handler::<S, R>),
        )
        .route(
            "/api/v1/staff/:staff_id/performance",
            get(performance_handler::<S, R>),
        )
        .with_state(routes)
}

pub(crate) async fn create_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    axum::Json(submission): axum::Json<StaffSubmission>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    match routes.staff.create(submission) {
        Ok(member) => (StatusCode::CREATED, axum::Json(member)).into_response(),
        Err(error) => staff_error_response(error),
    }
}

pub(crate) async fn list_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    Query(filter): Query<StaffListFilter>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    match routes.staff.list(filter) {
        Ok(members) => (StatusCode::OK, axum::Json(members)).into_response(),
        Err(error) => staff_error_response(error),
    }
}

pub(crate) async fn get_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    Path(staff_id): Path<String>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    match routes.staff.get(&StaffId(staff_id)) {
        Ok(member) => (StatusCode::OK, axum::Json(member)).into_response(),
        Err(error) => staff_error_response(error),
    }
}

pub(crate) async fn update_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    Path(staff_id): Path<String>,
    axum::Json(submission): axum::Json<StaffSubmission>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    match routes.staff.update(&StaffId(staff_id), submission) {
        Ok(member) => (StatusCode::OK, axum::Json(member)).into_response(),
        Err(error) => staff_error_response(error),
    }
}

pub(crate) async fn deactivate_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    Path(staff_id): Path<String>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    match routes.staff.deactivate(&StaffId(staff_id)) {
        Ok(member) => (StatusCode::OK, axum::Json(member)).into_response(),
        Err(error) => staff_error_response(error),
    }
}

pub(crate) async fn remove_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    Path(staff_id): Path<String>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    match routes.staff.remove(&StaffId(staff_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => staff_error_response(error),
    }
}

/// Period selection for the performance endpoint.
///
/// `day` picks today or yesterday. The month is `year` + `month`, a `month` in
/// the current year, or the month enclosing `date`; it defaults to the current
/// month.
#[derive(Debug, Default, Deserialize)]
pub struct PerformanceQuery {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PerformanceQueryError {
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("{0}")]
    InvalidDate(String),
    #[error("month is required when year is given")]
    YearWithoutMonth,
}

impl PerformanceQuery {
    pub fn day_selector(&self) -> Result<DaySelector, PerformanceQueryError> {
        match self.day.as_deref() {
            Some(raw) => Ok(raw.parse::<DaySelector>()?),
            None => Ok(DaySelector::Today),
        }
    }

    pub fn month_selector(
        &self,
        clock: &ReportClock,
    ) -> Result<MonthSelector, PerformanceQueryError> {
        match (self.year, self.month, self.date.as_deref()) {
            (Some(year), Some(month), _) => Ok(MonthSelector::YearMonth { year, month }),
            (Some(_), None, _) => Err(PerformanceQueryError::YearWithoutMonth),
            (None, Some(month), _) => Ok(MonthSelector::YearMonth {
                year: chrono::Datelike::year(&clock.today()),
                month,
            }),
            (None, None, Some(raw)) => parse_date(raw)
                .map(MonthSelector::Containing)
                .map_err(PerformanceQueryError::InvalidDate),
            (None, None, None) => Ok(MonthSelector::current(clock)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StaffPerformanceResponse {
    pub staff: StaffMember,
    pub report: PerformanceReport,
}

pub(crate) async fn performance_handler<S, R>(
    State(routes): State<StaffRoutes<S, R>>,
    Path(staff_id): Path<String>,
    Query(query): Query<PerformanceQuery>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    let member = match routes.staff.get(&StaffId(staff_id)) {
        Ok(member) => member,
        Err(error) => return staff_error_response(error),
    };

    let clock = routes.clock.read();
    let selectors = query
        .day_selector()
        .and_then(|day| Ok((day, query.month_selector(&clock)?)));
    let (day, month) = match selectors {
        Ok(selectors) => selectors,
        Err(error) => return bad_request(error.to_string()),
    };

    let agent = member.agent_name();
    let activity = match routes.records.activity_for_agent(&agent) {
        Ok(activity) => activity,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match PerformanceReport::build(
        &agent,
        &activity.calls,
        &activity.deposits,
        &clock,
        day,
        month,
    ) {
        Ok(report) => (
            StatusCode::OK,
            axum::Json(StaffPerformanceResponse {
                staff: member,
                report,
            }),
        )
            .into_response(),
        Err(error) => bad_request(error.to_string()),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn staff_error_response(error: StaffServiceError) -> Response {
    let status = match &error {
        StaffServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StaffServiceError::DuplicateEmail(_)
        | StaffServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        StaffServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        StaffServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
