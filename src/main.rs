//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use rail_complaints::adapters::dashboard::FixtureDashboardSource;
use rail_complaints::adapters::persistence::{
    Latency, MemoryComplaintRepo, MemoryIdentityRepo, MemoryNotificationRepo, SessionJson,
};
use rail_complaints::adapters::ui::tui::TuiInputPort;
use rail_complaints::ports::{
    ComplaintRepoPort, DashboardSourcePort, IdentityRepoPort, InputPort, NotificationRepoPort,
    SessionStorePort,
};
use rail_complaints::shared::config::AppConfig;
use rail_complaints::usecases::{
    ComplaintService, DashboardService, DirectoryService, NotificationService, SessionService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "config unreadable, using defaults");
            AppConfig::default()
        }
    };

    rail_complaints::adapters::ui::init_ui(cfg.show_banner_or_default());

    let latency = Latency::from_millis(cfg.latency_ms_or_default());
    let session_path = cfg.session_path();
    info!(
        session = %session_path.display(),
        latency_ms = cfg.latency_ms_or_default(),
        max_attachment_bytes = cfg.max_attachment_bytes(),
        "configuration"
    );

    // --- Adapters ---
    let identities: Arc<dyn IdentityRepoPort> = Arc::new(MemoryIdentityRepo::seeded(latency));
    let complaints: Arc<dyn ComplaintRepoPort> = Arc::new(MemoryComplaintRepo::seeded(latency));
    let notifications: Arc<dyn NotificationRepoPort> =
        Arc::new(MemoryNotificationRepo::seeded(latency));
    let store: Arc<dyn SessionStorePort> = Arc::new(SessionJson::new(&session_path));
    let series: Arc<dyn DashboardSourcePort> = Arc::new(FixtureDashboardSource::new(latency));

    // --- Services ---
    let session = Arc::new(SessionService::new(
        Arc::clone(&identities),
        Arc::clone(&store),
    ));
    session
        .restore()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let complaint_service = Arc::new(ComplaintService::new(
        Arc::clone(&complaints),
        Arc::clone(&notifications),
        cfg.max_attachment_bytes(),
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::clone(&complaints),
        Arc::clone(&series),
    ));
    let notification_service = Arc::new(NotificationService::new(Arc::clone(&notifications)));
    let directory_service = Arc::new(DirectoryService::new(Arc::clone(&identities)));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        session,
        complaint_service,
        dashboard_service,
        notification_service,
        directory_service,
    ));

    // --- Run (sign in -> role menu -> views) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
