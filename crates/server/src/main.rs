//! intake-server binary
//!
//! Usage: `intake-server [--config <path.yaml>]`. Without `--config` the path
//! in `INTAKE_CONFIG` is used, if any. A `.env` file is loaded first.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use intake_agent::IntakeController;
use intake_config::Settings;
use intake_llm::OpenAiClient;
use intake_server::{create_router, telemetry, AppState};

/// Path given with `--config <path>` or `--config=<path>`
fn config_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = match config_arg() {
        Some(path) => Settings::load(Some(path.as_path())),
        None => Settings::from_env(),
    }
    .context("failed to load settings")?;
    telemetry::init_tracing(settings.server.log_json);

    let metrics = telemetry::install_metrics().context("failed to install metrics recorder")?;

    let client = Arc::new(OpenAiClient::from_config(&settings.llm)?);
    tracing::info!(
        model = %settings.llm.model,
        moderation_model = %settings.llm.moderation_model,
        base_url = %settings.llm.base_url,
        "model client ready"
    );

    let controller = IntakeController::new(
        &settings.intake,
        &settings.llm.budgets,
        client.clone(),
        client,
    );
    let state = AppState::new(controller, settings.server.staff_token.clone()).with_metrics(metrics);
    if state.staff_token.is_none() {
        tracing::info!("no staff token configured, internal case data route disabled");
    }

    state.sessions.spawn_sweeper(
        Duration::from_secs(settings.server.session_idle_secs),
        Duration::from_secs(settings.server.session_sweep_secs.max(1)),
    );

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "intake server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("intake server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
