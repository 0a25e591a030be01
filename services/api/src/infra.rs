use loan_desk::client::{Credentials, LoanDeskClient};
use loan_desk::config::AppConfig;
use loan_desk::error::AppError;
use loan_desk::lending::LoanStatus;
use loan_desk::session::{AppRoute, Role, RouteAccess, RouteDecision, Session, SessionContext};
use loan_desk::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_role(raw: &str) -> Result<Role, String> {
    Role::normalize(raw).ok_or_else(|| format!("'{raw}' is not one of ADMIN, ANALYST, CUSTOMER"))
}

pub(crate) fn parse_status(raw: &str) -> Result<LoanStatus, String> {
    raw.parse()
}

/// Logged-in backend client plus the session it authenticated.
pub(crate) struct Connection {
    pub(crate) client: LoanDeskClient,
    pub(crate) session: Session,
}

/// Load configuration, log in, and refuse to continue unless the session's
/// role may open `route`. `None` means the role's own dashboard.
pub(crate) async fn connect(
    credentials: Credentials,
    route: Option<AppRoute>,
) -> Result<Connection, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let client = LoanDeskClient::new(&config.backend, SessionContext::new())?;
    let session = client.login(&credentials).await?;
    let route = route.unwrap_or(AppRoute::dashboard_for(session.role));
    authorize(&RouteAccess::standard(), &session, route)?;

    Ok(Connection { client, session })
}

pub(crate) fn authorize(
    access: &RouteAccess,
    session: &Session,
    route: AppRoute,
) -> Result<(), AppError> {
    match access.resolve(route, Some(session)) {
        RouteDecision::Render => Ok(()),
        RouteDecision::Redirect(_) => Err(AppError::Forbidden {
            role: session.role,
            route,
        }),
    }
}
