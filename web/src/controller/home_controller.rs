//! Controller for the root greeting and the HubSpot connect page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::json;

/// GET the root greeting
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting message", body = String)
    )
)]
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "Hello World" })))
}

/// GET the HubSpot connect page
///
/// A static page with a single link into the consent redirect.
#[utoipa::path(
    get,
    path = "/hubspot",
    responses(
        (status = 200, description = "HubSpot connect page", body = String)
    )
)]
pub async fn hubspot() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Connect HubSpot</title>
  </head>
  <body>
    <h1>Connect your HubSpot account</h1>
    <p><a href="/oauth/hubspot/authorize">Authorize with HubSpot</a></p>
  </body>
</html>
"#,
    )
}
