use catalog_api::{app, state::AppState};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "catalog_api=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init().await?;

    // Migrations are best-effort at startup; the pool connects lazily, so an
    // unreachable database here only delays things until the first request.
    match app_state.conn.pool().await {
        Ok(pool) => {
            if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
                warn!(error = %e, "migration failed; continuing");
            }
        }
        Err(e) => {
            warn!(error = %e, "database not reachable at startup; retrying on first request");
        }
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}
