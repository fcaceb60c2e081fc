use crate::infra::{deserialize_optional_instant, AppState, BackofficeServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use backoffice::dashboard::{dashboard_router, DashboardService};
use backoffice::error::AppError;
use backoffice::performance::{
    CallRecord, ClockSource, DepositRecord, PartyName, PerformanceReport, ReportClock,
};
use backoffice::records::{deposits_matching_calls, records_router};
use backoffice::staff::{staff_router, PerformanceQuery, StaffRoutes};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Ad-hoc report over records supplied in the request rather than the stores.
#[derive(Debug, Deserialize)]
pub(crate) struct PerformanceReportRequest {
    pub(crate) agent_name: PartyName,
    #[serde(default)]
    pub(crate) calls: Vec<CallRecord>,
    #[serde(default)]
    pub(crate) deposits: Vec<DepositRecord>,
    /// Reference instant; the server clock when absent.
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub(crate) now: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub(crate) period: PerformanceQuery,
}

pub(crate) fn with_backoffice_routes(services: &BackofficeServices) -> axum::Router {
    let dashboard = Arc::new(DashboardService::new(
        services.staff.clone(),
        services.records.clone(),
        services.clock,
    ));

    staff_router(StaffRoutes {
        staff: services.staff.clone(),
        records: services.records.clone(),
        clock: services.clock,
    })
    .merge(records_router(services.records.clone()))
    .merge(dashboard_router(dashboard))
    .route("/health", axum::routing::get(healthcheck))
    .route("/ready", axum::routing::get(readiness_endpoint))
    .route("/metrics", axum::routing::get(metrics_endpoint))
    .route(
        "/api/v1/performance/report",
        axum::routing::post(performance_report_endpoint),
    )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn performance_report_endpoint(
    Json(payload): Json<PerformanceReportRequest>,
) -> Result<Json<PerformanceReport>, AppError> {
    build_performance_report(payload, ClockSource::Local).map(Json)
}

/// Narrows the supplied records to the agent, then reports on them.
pub(crate) fn build_performance_report(
    request: PerformanceReportRequest,
    fallback: ClockSource,
) -> Result<PerformanceReport, AppError> {
    let PerformanceReportRequest {
        agent_name,
        calls,
        deposits,
        now,
        period,
    } = request;

    let clock = now.map(ReportClock::new).unwrap_or_else(|| fallback.read());
    let day = period.day_selector()?;
    let month = period.month_selector(&clock)?;

    let calls: Vec<CallRecord> = calls
        .into_iter()
        .filter(|call| call.agent_name == agent_name)
        .collect();
    let deposits = deposits_matching_calls(&calls, deposits);

    Ok(PerformanceReport::build(
        &agent_name,
        &calls,
        &deposits,
        &clock,
        day,
        month,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use backoffice::performance::domain::parse_timestamp;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let clock = ClockSource::Fixed(parse_timestamp("2025-03-15T14:30:00").expect("valid"));
        let services = BackofficeServices::in_memory(clock);
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_backoffice_routes(&services).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, bytes.to_vec())
    }

    fn request(body: Value) -> PerformanceReportRequest {
        serde_json::from_value(body).expect("request deserializes")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, _) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn health_and_dashboard_are_mounted() {
        let (status, _) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = get(app(true), "/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["headcount"]["total"], 0);
    }

    #[tokio::test]
    async fn report_endpoint_filters_to_the_agent() {
        let payload = request(json!({
            "agent_name": "Ava Stone",
            "now": "2025-03-15T14:30:00",
            "calls": [
                { "agent_name": "AVA STONE", "counterparty_name": "Lee Park", "timestamp": "2025-03-15T09:00:00", "status": "Completed" },
                { "agent_name": "Ava Stone", "counterparty_name": "Mia Chen", "timestamp": "2025-03-15T10:00:00", "status": "Missed" },
                { "agent_name": "Ben Ortiz", "counterparty_name": "Sam Reed", "timestamp": "2025-03-15T10:00:00", "status": "Completed" }
            ],
            "deposits": [
                { "depositor_name": "lee park", "timestamp": "2025-03-15T11:00:00", "is_first_time_deposit": true, "is_deposit": true, "ftd_bonus_units": 1, "deposit_bonus_units": 1, "total_calls_logged": 3, "successful_calls_logged": 2 },
                { "depositor_name": "Sam Reed", "timestamp": "2025-03-15T11:00:00", "is_deposit": true, "deposit_bonus_units": 4 }
            ]
        }));

        let Json(report) = performance_report_endpoint(Json(payload))
            .await
            .expect("report builds");

        assert_eq!(report.daily.metrics.total_calls, 5);
        assert_eq!(report.daily.metrics.successful_calls, 3);
        assert_eq!(report.daily.metrics.bonus_amount, 2.5);
        assert_eq!(report.daily.conversion_ratio_display, "60.00%");
        assert_eq!(report.monthly.period_label, "March 2025");
    }

    #[test]
    fn report_rejects_invalid_month() {
        let payload = request(json!({
            "agent_name": "Ava Stone",
            "now": "2025-03-15T14:30:00",
            "year": 2025,
            "month": 13
        }));
        let err = build_performance_report(payload, ClockSource::Local).expect_err("invalid month");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
