use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CallId, DepositId};
use super::repository::{RecordError, RecordRepository};
use super::service::{RecordService, RecordServiceError};
use crate::performance::{CallRecord, DepositRecord, PartyName};

/// Optional `?agent=` narrowing for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AgentFilter {
    #[serde(default)]
    pub agent: Option<String>,
}

impl AgentFilter {
    fn party(&self) -> Option<PartyName> {
        self.agent
            .as_deref()
            .map(PartyName::new)
            .filter(|name| !name.is_blank())
    }
}

pub fn records_router<R>(service: Arc<RecordService<R>>) -> Router
where
    R: RecordRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/calls",
            post(log_call_handler::<R>).get(list_calls_handler::<R>),
        )
        .route("/api/v1/calls/:call_id", delete(delete_call_handler::<R>))
        .route(
            "/api/v1/deposits",
            post(log_deposit_handler::<R>).get(list_deposits_handler::<R>),
        )
        .route(
            "/api/v1/deposits/:deposit_id",
            delete(delete_deposit_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn log_call_handler<R>(
    State(service): State<Arc<RecordService<R>>>,
    axum::Json(record): axum::Json<CallRecord>,
) -> Response
where
    R: RecordRepository + 'static,
{
    match service.log_call(record) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_calls_handler<R>(
    State(service): State<Arc<RecordService<R>>>,
    Query(filter): Query<AgentFilter>,
) -> Response
where
    R: RecordRepository + 'static,
{
    match service.list_calls(filter.party().as_ref()) {
        Ok(calls) => (StatusCode::OK, axum::Json(calls)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_call_handler<R>(
    State(service): State<Arc<RecordService<R>>>,
    Path(call_id): Path<String>,
) -> Response
where
    R: RecordRepository + 'static,
{
    match service.delete_call(&CallId(call_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn log_deposit_handler<R>(
    State(service): State<Arc<RecordService<R>>>,
    axum::Json(record): axum::Json<DepositRecord>,
) -> Response
where
    R: RecordRepository + 'static,
{
    match service.log_deposit(record) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_deposits_handler<R>(
    State(service): State<Arc<RecordService<R>>>,
    Query(filter): Query<AgentFilter>,
) -> Response
where
    R: RecordRepository + 'static,
{
    match service.list_deposits(filter.party().as_ref()) {
        Ok(deposits) => (StatusCode::OK, axum::Json(deposits)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_deposit_handler<R>(
    State(service): State<Arc<RecordService<R>>>,
    Path(deposit_id): Path<String>,
) -> Response
where
    R: RecordRepository + 'static,
{
    match service.delete_deposit(&DepositId(deposit_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RecordServiceError) -> Response {
    let status = match &error {
        RecordServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RecordServiceError::Repository(RecordError::NotFound) => StatusCode::NOT_FOUND,
        RecordServiceError::Repository(RecordError::Conflict) => StatusCode::CONFLICT,
        RecordServiceError::Repository(RecordError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
