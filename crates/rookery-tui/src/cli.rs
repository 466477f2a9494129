//! Command line arguments.
//!
//! Every option can also come from the environment, so a token or password
//! never has to appear in shell history.

use clap::Parser;
use rookery_app::{AppConfig, DEFAULT_SHARE_BASE_URL};
use rookery_client::{ClientConfig, Credentials, DEFAULT_API_URL};

/// Rookery terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "rookery")]
#[command(about = "Browse, like, comment on and share Rookery posts from the terminal")]
#[command(version)]
pub struct Args {
    /// Base URL of the REST API
    #[arg(long, env = "ROOKERY_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token of an existing session
    #[arg(long, env = "ROOKERY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Account email to log in with (password from ROOKERY_PASSWORD)
    #[arg(long, env = "ROOKERY_EMAIL", requires = "password")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "ROOKERY_PASSWORD", hide_env_values = true, requires = "email")]
    pub password: Option<String>,

    /// Origin used when building share links
    #[arg(long, env = "ROOKERY_SHARE_URL", default_value = DEFAULT_SHARE_BASE_URL)]
    pub share_base_url: String,

    /// Run against an in-memory server with sample data
    #[arg(long)]
    pub demo: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// File that receives logs. The terminal is owned by the UI.
    #[arg(long, default_value = "rookery.log")]
    pub log_file: String,
}

impl Args {
    /// Settings for the HTTP client.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.clone());
        match &self.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    /// Settings for the application layer.
    pub fn app_config(&self) -> AppConfig {
        AppConfig::new(self.share_base_url.clone())
    }

    /// Login credentials, when both email and password were given.
    pub fn credentials(&self) -> Option<Credentials> {
        let email = self.email.clone()?;
        let password = self.password.clone()?;
        Some(Credentials { email, password })
    }
}
