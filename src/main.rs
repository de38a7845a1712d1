mod ads;
mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod state;
#[cfg(test)]
mod testing;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "marketplace=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting marketplace");

    let app_state = AppState::init().await?;
    let server = app_state.config.server.clone();

    let app = app::build_app(app_state);
    app::serve(app, &server).await
}
