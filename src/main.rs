use payment_service::gateway::GatewayClient;
use payment_service::{AppState, config, create_app, db, startup};
use sqlx::migrate::Migrator;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database pool
    let pool = db::create_pool(&config).await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    // Gateway client, credentials and environment fixed for the process
    let gateway = GatewayClient::from_config(&config);
    tracing::info!(
        environment = config.gateway_environment.as_str(),
        endpoint = gateway.endpoint(),
        "Payment gateway client initialized"
    );

    if std::env::var("STARTUP_VALIDATION").map(|v| v == "true").unwrap_or(false) {
        let report = startup::validate_environment(&config, &pool).await?;
        report.print();
        if !report.is_valid() {
            anyhow::bail!("startup validation failed");
        }
    }

    let app_state = AppState {
        db: pool.clone(),
        gateway,
    };
    let app = create_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
