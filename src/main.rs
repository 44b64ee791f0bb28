use log::error;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let app_state = AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Failed to serve HubSpot Connect API: {e}");
        std::process::exit(1);
    }
}
