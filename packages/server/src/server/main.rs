// Main entry point for the login API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twilio::{TwilioOptions, TwilioService};

use server_core::common::Config;
use server_core::domains::auth::JwtService;
use server_core::kernel::{MailGateway, PgStore, ServerDeps, TwilioAdapter};
use server_core::server::build_app;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting multi-tenant login API");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire dependencies; clients are owned here and torn down with the process
    let twilio = TwilioService::new(TwilioOptions {
        account_sid: config.twilio_account_sid.clone(),
        auth_token: config.twilio_auth_token.clone(),
        service_id: config.twilio_service_id.clone(),
    });
    let mailer = MailGateway::new(
        config.mail_gateway_url.clone(),
        config.mail_gateway_token.clone(),
        config.mail_accepted_codes.clone(),
    );
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_issuer.clone());

    let deps = Arc::new(ServerDeps::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(TwilioAdapter::new(Arc::new(twilio))),
        Arc::new(mailer),
        Arc::new(jwt_service),
        Duration::from_millis(config.store_query_timeout_ms),
    ));

    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
