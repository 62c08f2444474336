use crate::cli::ServeArgs;
use crate::error::AppError;
use crate::infra::{seed_demo_session, AppState, InMemoryReportStore, InMemorySessionStore};
use crate::routes::{scoring_router, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sim_scoring::config::AppConfig;
use sim_scoring::scoring::ScoringService;
use sim_scoring::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sessions = Arc::new(InMemorySessionStore::default());
    let demo_session = seed_demo_session(&sessions);
    let reports = Arc::new(InMemoryReportStore::default());
    let scoring_service = Arc::new(ScoringService::new(sessions, reports));

    let app = with_operational_routes(scoring_router(scoring_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, %demo_session, "simulation scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
