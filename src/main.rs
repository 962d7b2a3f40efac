use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use http::HeaderValue;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use casedesk_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Startup precondition: without the dataset there is nothing to serve.
    let dataset = Arc::new(api::dataset::Dataset::load(&cfg.dataset_path).map_err(|e| {
        error!("Failed to load inventory dataset: {}", e);
        e
    })?);

    // Build services
    let adjudicator = Arc::new(api::services::adjudication::OpenAiChatClient::new(
        cfg.openai_base_url.clone(),
        cfg.openai_api_key.clone(),
        cfg.openai_model.clone(),
    ));
    let cases = api::services::cases::CaseService::new(dataset.clone(), adjudicator);

    // Compose shared app state
    let app_state = api::AppState {
        dataset,
        config: cfg.clone(),
        cases,
    };

    api::handlers::health::init_start_time();

    // Build CORS layer from config
    let cors_layer = match configured_origins(&cfg) {
        Some(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        None => {
            if cfg.is_development() {
                info!("Using permissive CORS because explicit origins were not configured");
            }
            CorsLayer::permissive()
        }
    };

    // Build router: status banner + case resolution + health probes
    let app = Router::<api::AppState>::new()
        .route("/", get(|| async { "casedesk-api up" }))
        .merge(api::app_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(api::tracing::configure_http_tracing())
        // Apply CORS
        .layer(cors_layer)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            api::tracing::request_id_middleware,
        ))
        .with_state(app_state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!("casedesk-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn configured_origins(cfg: &api::config::AppConfig) -> Option<Vec<HeaderValue>> {
    cfg.cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
