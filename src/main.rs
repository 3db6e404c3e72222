mod app;
mod auth;
mod builder;
mod catalog;
mod config;
mod dates;
mod meals;
mod state;
mod store;
mod summary;
mod timer;
mod workout_log;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fitlog=debug,axum=info,tower_http=info".to_string());
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

    let app_state = state::AppState::init().await?;
    let addr: std::net::SocketAddr = app_state.config.bind_addr().parse()?;
    if let Some(user) = app_state.session.current().await {
        tracing::info!(user_id = %user.id, email = %user.email, "restored session");
    }
    tracing::info!(
        latency_ms = app_state.config.store.latency_ms,
        session_dir = %app_state.config.session.dir.display(),
        "store ready"
    );

    let app = app::build_app(app_state);
    app::serve(app, addr).await
}
