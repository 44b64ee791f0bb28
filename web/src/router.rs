use crate::controller::{health_check_controller, home_controller, oauth_controller};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "HubSpot Connect API"
        ),
        paths(
            health_check_controller::health_check,
            home_controller::root,
            home_controller::hubspot,
            oauth_controller::authorize,
            oauth_controller::callback,
            oauth_controller::refresh,
        ),
        tags(
            (name = "hubspot_connect", description = "HubSpot CRM OAuth integration API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(home_routes())
        .merge(oauth_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn home_routes() -> Router {
    Router::new()
        .route("/", get(home_controller::root))
        .route("/hubspot", get(home_controller::hubspot))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/oauth/hubspot/authorize", get(oauth_controller::authorize))
        .route("/auth/callback", get(oauth_controller::callback))
        .route("/oauth/hubspot/refresh", post(oauth_controller::refresh))
        .with_state(app_state)
}
