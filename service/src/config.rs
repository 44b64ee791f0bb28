use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default HubSpot authorization endpoint used when `HUBSPOT_AUTHORIZE_URL` is not set.
pub const DEFAULT_HUBSPOT_AUTHORIZE_URL: &str = "https://app.hubspot.com/oauth/authorize";

/// Default HubSpot token endpoint used when `HUBSPOT_TOKEN_URL` is not set.
/// Override in tests to point at a mock server.
pub const DEFAULT_HUBSPOT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The OAuth client ID issued by HubSpot for this application.
    #[arg(long, env)]
    client_id: Option<String>,

    /// The OAuth client secret issued by HubSpot for this application.
    #[arg(long, env)]
    client_secret: Option<String>,

    /// The redirect URI registered with HubSpot for the OAuth callback.
    #[arg(long, env)]
    redirect_uri: Option<String>,

    /// Space-separated OAuth scopes to request during authorization.
    #[arg(long, env, default_value = "contacts")]
    scope: String,

    /// The HubSpot authorization endpoint users are redirected to for consent.
    #[arg(long, env, default_value = DEFAULT_HUBSPOT_AUTHORIZE_URL)]
    hubspot_authorize_url: String,

    /// The HubSpot token endpoint used for code exchange and refresh.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_HUBSPOT_TOKEN_URL)]
    hubspot_token_url: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the HubSpot OAuth client ID, if configured.
    pub fn client_id(&self) -> Option<String> {
        self.client_id.clone()
    }

    /// Returns the HubSpot OAuth client secret, if configured.
    pub fn client_secret(&self) -> Option<String> {
        self.client_secret.clone()
    }

    /// Returns the OAuth callback redirect URI, if configured.
    pub fn redirect_uri(&self) -> Option<String> {
        self.redirect_uri.clone()
    }

    /// Returns the OAuth scopes requested during authorization.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the HubSpot authorization endpoint URL.
    pub fn hubspot_authorize_url(&self) -> &str {
        &self.hubspot_authorize_url
    }

    /// Returns the HubSpot token endpoint URL.
    pub fn hubspot_token_url(&self) -> &str {
        &self.hubspot_token_url
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        // This could check an environment variable, or a config field
        self.runtime_env() == RustEnv::Production
    }
}
