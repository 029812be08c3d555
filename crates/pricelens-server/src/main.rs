mod api;
mod middleware;

use std::sync::Arc;

use pricelens_scraper::PricePipeline;
use pricelens_vision::VisionClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pricelens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = Arc::new(config.retailer_catalog()?);
    let pipeline = PricePipeline::from_config(&config, catalog)?;

    let vision = match config.vision_api_key.as_deref() {
        Some(key) => Some(Arc::new(VisionClient::with_endpoint(
            key,
            config.vision_timeout_secs,
            &config.vision_url,
        )?)),
        None => {
            tracing::warn!("GOOGLE_VISION_API_KEY not set; /api/v1/lookup will be unavailable");
            None
        }
    };

    let state = AppState {
        pipeline: Arc::new(pipeline),
        vision,
    };
    let app = build_app(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "pricelens server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
