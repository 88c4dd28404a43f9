use anyhow::Result;
use dotenvy::dotenv;
use std::env;

const SANDBOX_ENDPOINT: &str = "https://apitest.authorize.net/xml/v1/request.api";
const PRODUCTION_ENDPOINT: &str = "https://api.authorize.net/xml/v1/request.api";

/// Which gateway target a charge is submitted to. Resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    /// Anything other than "PRODUCTION" falls back to the sandbox.
    pub fn from_flag(flag: &str) -> Self {
        if flag.eq_ignore_ascii_case("production") {
            GatewayEnvironment::Production
        } else {
            GatewayEnvironment::Sandbox
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => SANDBOX_ENDPOINT,
            GatewayEnvironment::Production => PRODUCTION_ENDPOINT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => "sandbox",
            GatewayEnvironment::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub gateway_api_login_id: String,
    pub gateway_transaction_key: String,
    pub gateway_environment: GatewayEnvironment,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            gateway_api_login_id: env::var("AUTHORIZE_NET_API_LOGIN_ID")?,
            gateway_transaction_key: env::var("AUTHORIZE_NET_TRANSACTION_KEY")?,
            gateway_environment: GatewayEnvironment::from_flag(
                &env::var("AUTHORIZE_NET_ENVIRONMENT").unwrap_or_else(|_| "SANDBOX".to_string()),
            ),
        })
    }
}
