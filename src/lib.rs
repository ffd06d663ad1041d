pub mod advisory; // Keyword-rule chat answers
pub mod api; // Local API for the browser view
pub mod chat; // Chat session with delayed replies
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod models;
pub mod pipeline;
pub mod session_history; // Newest-first analysis history

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::CoreState;
use crate::pipeline::classifier::HttpClassifier;

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::log_filter_from_env())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(config)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn serve(config: AppConfig) -> Result<(), String> {
    let classifier = HttpClassifier::new(
        &config.classifier_base_url,
        config.classifier_timeout_secs,
    )
    .map_err(|e| format!("Failed to build classifier client: {e}"))?;

    tracing::info!(
        classifier = %config.classifier_base_url,
        timeout_secs = config.classifier_timeout_secs,
        history_capacity = config.history_capacity,
        busy_policy = %config.chat_busy_policy,
        "Configuration loaded"
    );

    let bind_addr = config.bind_addr;
    let core = Arc::new(CoreState::new(config, Arc::new(classifier)));
    let mut server = api::start_api_server(core, bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.stopped().await;
    Ok(())
}
