mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;
mod validation;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🛂 Protocol Management - Visit Requests API");
    info!("===========================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };
    let pool = db_connection.pool().clone();

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/requests", routes::request_routes::create_request_router())
        .nest("/api/protocol", routes::protocol_routes::create_protocol_router())
        .nest("/api/directory", routes::directory_routes::create_directory_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📋 Requests:");
    info!("   POST /api/requests - Enviar request de visita");
    info!("   GET  /api/requests/mine - Requests del requestee");
    info!("   GET  /api/requests/pending - Cola de triage (paginada)");
    info!("   POST /api/requests/:id/vehicle-requests - Adjuntar vehículo");
    info!("   POST /api/requests/:id/guesthouse-requests - Adjuntar guesthouse");
    info!("   POST /api/requests/:id/other-requests - Adjuntar otros");
    info!("🧑‍✈️ Protocol:");
    info!("   POST /api/protocol/assign - Asignación single");
    info!("   POST /api/protocol/assign-legs - Asignación multi-leg");
    info!("   GET  /api/protocol/requests/:id/candidate-officers - Candidatos por leg");
    info!("📖 Directory:");
    info!("   GET  /api/directory/officers - Buscar oficiales");
    info!("   GET  /api/directory/locations - Sedes por destino");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "protocol-management",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
