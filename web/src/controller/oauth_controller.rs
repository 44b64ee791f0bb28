//! Controller for the HubSpot OAuth flow.
//!
//! Handles the consent redirect, the provider callback and token refresh.
//!
//! Note: OAuth endpoints work via browser redirects which cannot set custom
//! headers, so they carry no authentication extractors.

use crate::controller::ApiResponse;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};

use domain::gateway::hubspot_oauth::TokenResult;
use domain::oauth;
use log::*;
use serde::Deserialize;
use serde_json::json;

/// Query parameters for the OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: String,
}

/// Form parameters for a token refresh
#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: String,
}

/// GET /oauth/hubspot/authorize
///
/// Initiates the OAuth flow by redirecting to HubSpot's authorization endpoint.
#[utoipa::path(
    get,
    path = "/oauth/hubspot/authorize",
    responses(
        (status = 307, description = "Redirect to HubSpot OAuth"),
        (status = 500, description = "Server error (OAuth not configured)"),
    )
)]
pub async fn authorize(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let url = oauth::authorize_url(&app_state.config)?;
    Ok(Redirect::temporary(&url))
}

/// GET /auth/callback
///
/// Handles the OAuth callback from HubSpot. This endpoint receives the
/// authorization code and exchanges it for access tokens.
#[utoipa::path(
    get,
    path = "/auth/callback",
    params(
        ("code" = String, Query, description = "Authorization code from HubSpot"),
    ),
    responses(
        (status = 200, description = "Token payload from a successful exchange"),
        (status = 400, description = "HubSpot rejected the exchange"),
        (status = 502, description = "No response received from HubSpot"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> impl IntoResponse {
    debug!("Received authorization code on OAuth callback");

    let result = oauth::exchange_code(&app_state.config, &params.code).await;
    render_token_result(result)
}

/// POST /oauth/hubspot/refresh
///
/// Obtains a new access token from a previously issued refresh token.
#[utoipa::path(
    post,
    path = "/oauth/hubspot/refresh",
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token payload from a successful refresh"),
        (status = 400, description = "HubSpot rejected the refresh"),
        (status = 502, description = "No response received from HubSpot"),
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    Form(params): Form<RefreshParams>,
) -> impl IntoResponse {
    let result = oauth::refresh_access_token(&app_state.config, &params.refresh_token).await;
    render_token_result(result)
}

/// Render a token result as JSON. A success carries the decoded payload; a
/// failure echoes HubSpot's status when one was received and maps the
/// no-response sentinel to 502.
fn render_token_result(result: TokenResult) -> Response {
    match result {
        TokenResult::Success(payload) => {
            Json(ApiResponse::new(StatusCode::OK.into(), payload)).into_response()
        }
        TokenResult::Failure {
            reason,
            upstream_status,
        } => {
            let status =
                StatusCode::from_u16(upstream_status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(json!({
                    "status_code": status.as_u16(),
                    "error": reason,
                })),
            )
                .into_response()
        }
    }
}
