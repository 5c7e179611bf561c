//! claimlit web server.
//!
//! Run with: cargo run -p claimlit-web

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use claimlit_web::config::Config;
use claimlit_web::router::build_router;
use claimlit_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Optional .env for local development
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = config.addr().to_string();
    info!("claimlit listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
