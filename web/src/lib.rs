use axum::http::{HeaderValue, Method};
use log::*;

mod controller;
pub mod error;
pub mod router;

pub use error::{Error, Result};
pub use service::AppState;

use tower_http::cors::{AllowOrigin, CorsLayer};

/// Bind the configured interface/port and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let port = app_state.config.port;

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;

    info!("Server starting... listening for connections on http://{host}:{port}");

    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(origins));

    let app = router::define_routes(app_state).layer(cors);

    axum::serve(listener, app).await
}
