use std::sync::Arc;

use anyhow::Context;
use booklist_app::register_all;
use booklist_db::DatabaseModule;
use booklist_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use booklist_reviews::NytReviewClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = Settings::load().context("failed to load booklist settings")?;
    let port_arg = std::env::args().nth(1);
    let port_override = port_arg.as_deref().map(str::parse::<u16>);
    if let Some(Ok(port)) = port_override {
        settings.server.port = port;
    }

    booklist_telemetry::init(&settings.telemetry)?;

    if let (Some(raw), Some(Err(e))) = (port_arg.as_deref(), port_override) {
        tracing::warn!(arg = raw, error = %e, "ignoring invalid port argument");
    }

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint(),
        max_connections = settings.database.max_connections,
        "booklist-app bootstrap starting"
    );

    let database = Arc::new(DatabaseModule::new(booklist_db::build_pool(&settings.database)));
    let store = database.store();
    let gateway = Arc::new(
        NytReviewClient::new(&settings.reviews).context("failed to build review client")?,
    );

    let mut registry = ModuleRegistry::new();
    registry.register_core(database);
    register_all(&mut registry, store, gateway);

    let ctx = InitCtx {
        settings: &settings,
    };
    if let Err(e) = registry.boot(&ctx).await {
        tracing::error!(error = %format!("{:#}", e), "startup failed; not serving");
        return Err(e);
    }

    tracing::info!("booklist-app bootstrap complete");

    let served =
        booklist_http::start_server(&registry, &settings, booklist_http::shutdown_signal()).await;

    registry.shutdown().await?;
    served
}
