//! Domain operations for the HubSpot OAuth flow.
//!
//! Resolves process configuration into gateway calls. Token exchange and
//! refresh never error out of this module: configuration problems surface as
//! a `Failure` at first use so the web layer always receives a `TokenResult`.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::hubspot_oauth::{
    self, HubSpotOAuthClient, OAuthConfig, OAuthUrls, TokenResult,
};
use log::*;
use service::config::Config;

/// Build the HubSpot OAuth authorization URL for the consent redirect.
pub fn authorize_url(config: &Config) -> Result<String, Error> {
    let client_id = config.client_id().ok_or_else(|| Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    })?;

    let redirect_uri = config.redirect_uri().ok_or_else(|| Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    })?;

    // The consent redirect never uses the client secret
    let oauth_config = OAuthConfig {
        client_id,
        client_secret: String::new(),
        redirect_uri,
        scope: config.scope().to_string(),
    };

    info!("Redirecting user to HubSpot consent page");
    Ok(hubspot_oauth::build_authorize_url(
        &provider_urls(config),
        &oauth_config,
    ))
}

/// Exchange the authorization code received on the OAuth callback for tokens.
pub async fn exchange_code(config: &Config, code: &str) -> TokenResult {
    info!("Processing HubSpot OAuth callback");

    let client = match create_client(config) {
        Ok(client) => client,
        Err(reason) => {
            warn!("Cannot exchange HubSpot authorization code: {}", reason);
            return TokenResult::transport_failure(reason);
        }
    };

    client.exchange_code(code).await
}

/// Obtain a new access token from a previously issued refresh token.
pub async fn refresh_access_token(config: &Config, refresh_token: &str) -> TokenResult {
    info!("Refreshing HubSpot access token");

    let client = match create_client(config) {
        Ok(client) => client,
        Err(reason) => {
            warn!("Cannot refresh HubSpot access token: {}", reason);
            return TokenResult::transport_failure(reason);
        }
    };

    client.refresh_token(refresh_token).await
}

fn provider_urls(config: &Config) -> OAuthUrls {
    OAuthUrls {
        authorize_url: config.hubspot_authorize_url().to_string(),
        token_url: config.hubspot_token_url().to_string(),
    }
}

/// Create a HubSpot OAuth client from config. The error is a plain reason
/// string, folded by callers into `TokenResult::Failure`.
fn create_client(config: &Config) -> Result<HubSpotOAuthClient, String> {
    let client_id = config
        .client_id()
        .ok_or("CLIENT_ID is not configured")?;

    let client_secret = config
        .client_secret()
        .ok_or("CLIENT_SECRET is not configured")?;

    let redirect_uri = config
        .redirect_uri()
        .ok_or("REDIRECT_URI is not configured")?;

    let oauth_config = OAuthConfig {
        client_id,
        client_secret,
        redirect_uri,
        scope: config.scope().to_string(),
    };

    HubSpotOAuthClient::new(oauth_config, provider_urls(config)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::hubspot_oauth::NO_UPSTREAM_STATUS;
    use serial_test::serial;
    use std::env;

    /// Helper struct to manage environment variables in tests
    struct EnvGuard {
        saved_vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(vars: &[&str]) -> Self {
            let saved_vars = vars
                .iter()
                .map(|var| (var.to_string(), env::var(var).ok()))
                .collect();
            EnvGuard { saved_vars }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // Restore all saved environment variables
            for (key, value) in &self.saved_vars {
                match value {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }

    const OAUTH_ENV_VARS: &[&str] = &[
        "CLIENT_ID",
        "CLIENT_SECRET",
        "REDIRECT_URI",
        "SCOPE",
        "HUBSPOT_AUTHORIZE_URL",
        "HUBSPOT_TOKEN_URL",
    ];

    fn set_oauth_env() {
        env::set_var("CLIENT_ID", "test-client-id");
        env::set_var("CLIENT_SECRET", "test-client-secret");
        env::set_var("REDIRECT_URI", "http://localhost:8000/auth/callback");
    }

    #[tokio::test]
    #[serial]
    async fn test_exchange_code_missing_client_id_fails_at_first_use() {
        let _guard = EnvGuard::new(OAUTH_ENV_VARS);
        for var in OAUTH_ENV_VARS {
            env::remove_var(var);
        }

        let config = Config::default();
        let result = exchange_code(&config, "auth-code-123").await;

        match result {
            TokenResult::Failure {
                reason,
                upstream_status,
            } => {
                assert_eq!(upstream_status, NO_UPSTREAM_STATUS);
                assert!(
                    reason.contains("CLIENT_ID"),
                    "reason should name the missing variable, got: {reason}"
                );
            }
            TokenResult::Success(_) => panic!("Expected Failure, got Success"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_refresh_missing_secret_fails_at_first_use() {
        let _guard = EnvGuard::new(OAUTH_ENV_VARS);
        for var in OAUTH_ENV_VARS {
            env::remove_var(var);
        }
        env::set_var("CLIENT_ID", "test-client-id");

        let config = Config::default();
        let result = refresh_access_token(&config, "refresh-token-123").await;

        match result {
            TokenResult::Failure {
                reason,
                upstream_status,
            } => {
                assert_eq!(upstream_status, NO_UPSTREAM_STATUS);
                assert!(
                    reason.contains("CLIENT_SECRET"),
                    "reason should name the missing variable, got: {reason}"
                );
            }
            TokenResult::Success(_) => panic!("Expected Failure, got Success"),
        }
    }

    #[test]
    #[serial]
    fn test_authorize_url_missing_config_is_a_config_error() {
        let _guard = EnvGuard::new(OAUTH_ENV_VARS);
        for var in OAUTH_ENV_VARS {
            env::remove_var(var);
        }

        let config = Config::default();
        let result = authorize_url(&config);

        match result {
            Err(e) => assert_eq!(
                e.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Config)
            ),
            Ok(url) => panic!("Expected Err, got URL: {url}"),
        }
    }

    #[test]
    #[serial]
    fn test_authorize_url_uses_configured_values_and_default_scope() {
        let _guard = EnvGuard::new(OAUTH_ENV_VARS);
        for var in OAUTH_ENV_VARS {
            env::remove_var(var);
        }
        set_oauth_env();

        let config = Config::default();
        let url = authorize_url(&config).expect("authorize URL should build");

        assert!(url.starts_with("https://app.hubspot.com/oauth/authorize?"));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fauth%2Fcallback"));
        assert!(url.contains("scope=contacts"));
        assert!(url.contains("response_type=code"));
    }

    #[tokio::test]
    #[serial]
    async fn test_exchange_code_through_configured_token_url() {
        let _guard = EnvGuard::new(OAUTH_ENV_VARS);
        for var in OAUTH_ENV_VARS {
            env::remove_var(var);
        }

        let mut server = mockito::Server::new_async().await;
        set_oauth_env();
        env::set_var(
            "HUBSPOT_TOKEN_URL",
            format!("{}/oauth/v1/token", server.url()),
        );

        let _mock = server
            .mock("POST", "/oauth/v1/token")
            .with_status(200)
            .with_body(
                r#"{"access_token":"a","refresh_token":"r","expires_in":3600,"token_type":"bearer"}"#,
            )
            .create_async()
            .await;

        let config = Config::default();
        let result = exchange_code(&config, "auth-code-123").await;

        assert!(result.is_success(), "expected Success, got {result:?}");
    }
}
