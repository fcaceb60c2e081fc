use crate::config::ConfigError;
use crate::dashboard::DashboardError;
use crate::performance::WindowError;
use crate::records::{RecordError, RecordServiceError};
use crate::staff::{PerformanceQueryError, RepositoryError, StaffServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Json(serde_json::Error),
    Window(WindowError),
    Query(PerformanceQueryError),
    Records(RecordServiceError),
    Staff(StaffServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Json(err) => write!(f, "malformed records: {}", err),
            AppError::Window(err) => write!(f, "invalid reporting period: {}", err),
            AppError::Query(err) => write!(f, "invalid reporting period: {}", err),
            AppError::Records(err) => write!(f, "records error: {}", err),
            AppError::Staff(err) => write!(f, "staff directory error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Window(err) => Some(err),
            AppError::Query(err) => Some(err),
            AppError::Records(err) => Some(err),
            AppError::Staff(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Json(_) | AppError::Window(_) | AppError::Query(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Records(RecordServiceError::Invalid(_))
            | AppError::Staff(StaffServiceError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Records(RecordServiceError::Repository(RecordError::NotFound))
            | AppError::Staff(StaffServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Records(RecordServiceError::Repository(RecordError::Conflict))
            | AppError::Staff(StaffServiceError::Repository(RepositoryError::Conflict))
            | AppError::Staff(StaffServiceError::DuplicateEmail(_)) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Records(RecordServiceError::Repository(RecordError::Unavailable(_)))
            | AppError::Staff(StaffServiceError::Repository(RepositoryError::Unavailable(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<WindowError> for AppError {
    fn from(value: WindowError) -> Self {
        Self::Window(value)
    }
}

impl From<PerformanceQueryError> for AppError {
    fn from(value: PerformanceQueryError) -> Self {
        Self::Query(value)
    }
}

impl From<DashboardError> for AppError {
    fn from(value: DashboardError) -> Self {
        match value {
            DashboardError::Window(err) => Self::Window(err),
            DashboardError::Staff(err) => Self::Staff(err),
            DashboardError::Records(err) => Self::Records(err),
        }
    }
}

impl From<RecordServiceError> for AppError {
    fn from(value: RecordServiceError) -> Self {
        Self::Records(value)
    }
}

impl From<StaffServiceError> for AppError {
    fn from(value: StaffServiceError) -> Self {
        Self::Staff(value)
    }
}
