use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_audit_routes;
use applicant_audit::config::AppConfig;
use applicant_audit::downstream::HttpDownstreamGateway;
use applicant_audit::error::AppError;
use applicant_audit::profile::{AuditService, InMemoryProfileStore};
use applicant_audit::remote::EconClient;
use applicant_audit::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let store = Arc::new(InMemoryProfileStore::with_samples());
    let validator = Arc::new(EconClient::new(&config.econ));
    let audit_service = Arc::new(AuditService::new(store, validator));
    let gateway = Arc::new(HttpDownstreamGateway::new(&config.downstream)?);

    let app = with_audit_routes(audit_service, gateway)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, econ = %config.econ.endpoint, "applicant audit service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
