//! HubSpot OAuth client.
//!
//! This module provides an HTTP client for HubSpot's OAuth2 authorization-code
//! flow: building the consent redirect URL, exchanging an authorization code
//! for tokens and refreshing an expired access token.

use crate::error::Error;
use log::*;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel `upstream_status` meaning no HTTP response was received from HubSpot.
pub const NO_UPSTREAM_STATUS: u16 = 0;

/// OAuth client settings for a single exchange attempt.
///
/// All four fields must be non-empty for HubSpot to accept an exchange;
/// emptiness is not validated here and is left for the provider to reject.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// Configuration for HubSpot OAuth URLs
#[derive(Debug, Clone)]
pub struct OAuthUrls {
    pub authorize_url: String,
    pub token_url: String,
}

/// Decoded token payload from a successful exchange or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    /// The response body as returned by HubSpot, including any fields the
    /// provider adds that are not modeled above.
    pub raw: Value,
}

/// Outcome of a single token exchange or refresh attempt.
///
/// Every attempt produces exactly one of these variants; the gateway never
/// propagates an error to its caller.
#[derive(Debug, Clone, Serialize)]
pub enum TokenResult {
    Success(TokenPayload),
    Failure { reason: String, upstream_status: u16 },
}

impl TokenResult {
    /// A failure for which no HTTP response was received (network fault,
    /// unreadable body, missing configuration).
    pub fn transport_failure(reason: impl Into<String>) -> Self {
        TokenResult::Failure {
            reason: reason.into(),
            upstream_status: NO_UPSTREAM_STATUS,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TokenResult::Success(_))
    }
}

/// The required fields of a successful token response.
#[derive(Debug, Deserialize)]
struct TokenFields {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    token_type: String,
}

/// The grant being exercised against the token endpoint. Both grants share
/// one request shape and one set of response handling rules.
enum GrantRequest<'a> {
    AuthorizationCode { code: &'a str },
    RefreshToken { refresh_token: &'a str },
}

impl GrantRequest<'_> {
    fn grant_type(&self) -> &'static str {
        match self {
            GrantRequest::AuthorizationCode { .. } => "authorization_code",
            GrantRequest::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Form parameters for the token endpoint. Only the authorization_code
    /// grant carries `redirect_uri` and `code`; the refresh grant carries
    /// `refresh_token` instead.
    fn form_params<'b>(&'b self, config: &'b OAuthConfig) -> Vec<(&'static str, &'b str)> {
        let mut params = vec![
            ("grant_type", self.grant_type()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ];

        match self {
            GrantRequest::AuthorizationCode { code } => {
                params.push(("redirect_uri", config.redirect_uri.as_str()));
                params.push(("code", *code));
            }
            GrantRequest::RefreshToken { refresh_token } => {
                params.push(("refresh_token", *refresh_token));
            }
        }

        params
    }
}

/// Build the OAuth authorization URL for user consent.
///
/// Pure transformation: identical input always yields a byte-identical URL
/// with a fixed query parameter order.
pub fn build_authorize_url(urls: &OAuthUrls, config: &OAuthConfig) -> String {
    format!(
        "{}?\
        client_id={}&\
        redirect_uri={}&\
        scope={}&\
        response_type=code",
        urls.authorize_url,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&config.scope),
    )
}

/// HubSpot OAuth client for the code-for-token exchange and token refresh
pub struct HubSpotOAuthClient {
    client: reqwest::Client,
    config: OAuthConfig,
    urls: OAuthUrls,
}

impl HubSpotOAuthClient {
    /// Create a new HubSpot OAuth client with configurable URLs
    pub fn new(config: OAuthConfig, urls: OAuthUrls) -> Result<Self, Error> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            config,
            urls,
        })
    }

    /// Exchange an authorization code for access and refresh tokens
    pub async fn exchange_code(&self, code: &str) -> TokenResult {
        self.request_token(GrantRequest::AuthorizationCode { code })
            .await
    }

    /// Obtain a new access token using the refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> TokenResult {
        self.request_token(GrantRequest::RefreshToken { refresh_token })
            .await
    }

    /// Issue one form-encoded POST to the token endpoint and normalize the
    /// outcome. HubSpot returns a JSON body on success and error alike, so
    /// the body is decoded regardless of status before branching.
    async fn request_token(&self, grant: GrantRequest<'_>) -> TokenResult {
        let params = grant.form_params(&self.config);

        debug!("Requesting HubSpot tokens via {} grant", grant.grant_type());

        let response = match self
            .client
            .post(&self.urls.token_url)
            .form(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("HubSpot token request produced no response: {:?}", e);
                return TokenResult::transport_failure(e.to_string());
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to decode HubSpot token response as JSON: {:?}", e);
                return TokenResult::transport_failure(e.to_string());
            }
        };

        if status == StatusCode::OK {
            match serde_json::from_value::<TokenFields>(body.clone()) {
                Ok(fields) => {
                    info!(
                        "Successfully obtained HubSpot tokens via {} grant",
                        grant.grant_type()
                    );
                    TokenResult::Success(TokenPayload {
                        access_token: fields.access_token,
                        refresh_token: fields.refresh_token,
                        expires_in: fields.expires_in,
                        token_type: fields.token_type,
                        raw: body,
                    })
                }
                Err(e) => {
                    warn!("HubSpot token response is missing required fields: {:?}", e);
                    TokenResult::transport_failure(e.to_string())
                }
            }
        } else {
            let reason = body
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            warn!(
                "HubSpot rejected {} grant with status {}: {}",
                grant.grant_type(),
                status,
                reason
            );
            TokenResult::Failure {
                reason,
                upstream_status: status.as_u16(),
            }
        }
    }
}
