use crate::cli::ServeArgs;
use crate::demo::seed_demo_data;
use crate::infra::{AppState, BackofficeServices};
use crate::routes::with_backoffice_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use backoffice::config::AppConfig;
use backoffice::error::AppError;
use backoffice::performance::{ClockSource, ReportClock};
use backoffice::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.seed_demo {
        config.seed_demo = true;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = BackofficeServices::in_memory(ClockSource::Local);
    if config.seed_demo {
        let seeded = seed_demo_data(&services, &ReportClock::local())?;
        info!(staff = seeded, "demo data seeded");
    }

    let app = with_backoffice_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "staff back office ready");

    axum::serve(listener, app).await?;
    Ok(())
}
