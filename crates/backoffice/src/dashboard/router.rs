use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::period::DashboardPeriod;
use super::service::{DashboardError, DashboardService};
use crate::records::RecordRepository;
use crate::staff::StaffRepository;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub period: Option<String>,
}

pub fn dashboard_router<S, R>(service: Arc<DashboardService<S, R>>) -> Router
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    Router::new()
        .route("/api/v1/dashboard", get(dashboard_handler::<S, R>))
        .with_state(service)
}

pub(crate) async fn dashboard_handler<S, R>(
    State(service): State<Arc<DashboardService<S, R>>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RecordRepository + 'static,
{
    let period = match query.period.as_deref().map(str::parse::<DashboardPeriod>) {
        None => DashboardPeriod::AllTime,
        Some(Ok(period)) => period,
        Some(Err(error)) => return error_body(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.summary(period) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error @ DashboardError::Window(_)) => {
            error_body(StatusCode::BAD_REQUEST, error.to_string())
        }
        Err(error) => error_body(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::domain::parse_timestamp;
    use crate::performance::{CallRecord, ClockSource};
    use crate::records::{
        CallId, DepositId, LoggedCall, LoggedDeposit, RecordError, RecordService,
    };
    use crate::staff::{
        RepositoryError, StaffDirectoryService, StaffId, StaffMember, StaffRole, StaffSubmission,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct Staff(Mutex<Vec<StaffMember>>);

    impl StaffRepository for Staff {
        fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError> {
            self.0.lock().expect("staff mutex").push(member.clone());
            Ok(member)
        }

        fn update(&self, _member: StaffMember) -> Result<(), RepositoryError> {
            Err(RepositoryError::NotFound)
        }

        fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError> {
            let guard = self.0.lock().expect("staff mutex");
            Ok(guard.iter().find(|member| &member.id == id).cloned())
        }

        fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
            Ok(self.0.lock().expect("staff mutex").clone())
        }

        fn remove(&self, _id: &StaffId) -> Result<(), RepositoryError> {
            Err(RepositoryError::NotFound)
        }
    }

    #[derive(Default)]
    struct Records(Mutex<Vec<LoggedCall>>);

    impl RecordRepository for Records {
        fn insert_call(&self, call: LoggedCall) -> Result<LoggedCall, RecordError> {
            self.0.lock().expect("calls mutex").push(call.clone());
            Ok(call)
        }

        fn insert_deposit(&self, _deposit: LoggedDeposit) -> Result<LoggedDeposit, RecordError> {
            Err(RecordError::Unavailable("read only".to_string()))
        }

        fn calls(&self) -> Result<Vec<LoggedCall>, RecordError> {
            Ok(self.0.lock().expect("calls mutex").clone())
        }

        fn deposits(&self) -> Result<Vec<LoggedDeposit>, RecordError> {
            Ok(Vec::new())
        }

        fn remove_call(&self, _id: &CallId) -> Result<(), RecordError> {
            Err(RecordError::NotFound)
        }

        fn remove_deposit(&self, _id: &DepositId) -> Result<(), RecordError> {
            Err(RecordError::NotFound)
        }
    }

    fn router() -> Router {
        let staff = Arc::new(StaffDirectoryService::new(Arc::new(Staff::default())));
        let records = Arc::new(RecordService::new(Arc::new(Records::default())));
        staff
            .create(StaffSubmission {
                full_name: "Ava Stone".to_string(),
                email: "ava@example.com".to_string(),
                phone: None,
                role: StaffRole::Agent,
                joined_on: None,
                active: true,
            })
            .expect("created");
        for (status, when) in [
            ("Completed", "2025-03-15T09:00:00"),
            ("Missed", "2025-03-10T09:00:00"),
        ] {
            records
                .log_call(CallRecord {
                    agent_name: "AVA STONE".into(),
                    counterparty_name: "Lee Park".into(),
                    timestamp: parse_timestamp(when).expect("valid"),
                    status: status.to_string(),
                })
                .expect("logged");
        }
        let clock = ClockSource::Fixed(parse_timestamp("2025-03-15T14:30:00").expect("valid"));
        dashboard_router(Arc::new(DashboardService::new(staff, records, clock)))
    }

    async fn fetch(uri: &str) -> (StatusCode, Value) {
        let response = router()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn defaults_to_all_time() {
        let (status, body) = fetch("/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "all_time");
        assert_eq!(body["team"]["total_calls"], 2);
        assert_eq!(body["team"]["conversion_ratio_display"], "50.00%");
        assert_eq!(body["leaderboard"][0]["full_name"], "Ava Stone");
    }

    #[tokio::test]
    async fn today_narrows_activity() {
        let (status, body) = fetch("/api/v1/dashboard?period=today").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team"]["total_calls"], 1);
        assert_eq!(body["team"]["rating_label"], "Good");
        assert_eq!(body["headcount"]["active"], 1);
    }

    #[tokio::test]
    async fn unknown_period_is_bad_request() {
        let (status, body) = fetch("/api/v1/dashboard?period=fortnight").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("fortnight")));
    }
}
