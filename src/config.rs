use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use sms_core::{Credentials, OutboundMessage, Secret, TWILIO_API_BASE};
use tracing::{debug, warn};

use crate::cli::Cli;

/// Prefix shared by every environment variable the resolver reads.
pub const ENV_PREFIX: &str = "TWILIO";

/// Raised when required input is missing before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// One or more required values are absent or blank
    #[error("missing required configuration: {}", .fields.join(", "))]
    Missing { fields: Vec<&'static str> },
    /// The environment could not be read
    #[error("could not read configuration: {0}")]
    Source(#[from] ConfigError),
}

/// Values sourced from `TWILIO_*` environment variables.
#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
    account_sid: Option<String>,
    auth_token: Option<String>,
    from: Option<String>,
    api_base_url: Option<String>,
}

impl EnvSettings {
    fn load(env: Option<config::Map<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?
            .try_deserialize()
    }
}

/// Everything one dispatch needs, fully populated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub message: OutboundMessage,
    /// API origin (default: https://api.twilio.com)
    pub api_base_url: String,
}

impl AppConfig {
    /// Resolve from the CLI and the process environment.
    pub fn load(cli: &Cli) -> Result<Self, ConfigurationError> {
        Self::resolve(cli, None)
    }

    /// Resolve from the CLI and an explicit environment map. `None` reads the
    /// process environment.
    pub fn resolve(
        cli: &Cli,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigurationError> {
        let env = EnvSettings::load(env)?;

        let account_sid = pick(&cli.account_sid, env.account_sid);
        let auth_token = pick(&cli.auth_token, env.auth_token);
        let from_number = pick(&cli.from_number, env.from);
        let to = pick(&cli.to, None);
        let body = pick(&cli.body, None);

        let mut missing = Vec::new();
        if account_sid.is_none() {
            missing.push("TWILIO_ACCOUNT_SID (or --account-sid)");
        }
        if auth_token.is_none() {
            missing.push("TWILIO_AUTH_TOKEN (or --auth-token)");
        }
        if from_number.is_none() {
            missing.push("TWILIO_FROM (or --from)");
        }
        if to.is_none() {
            missing.push("--to");
        }
        if body.is_none() {
            missing.push("--body");
        }

        let (Some(account_sid), Some(auth_token), Some(from_number), Some(to), Some(body)) =
            (account_sid, auth_token, from_number, to, body)
        else {
            return Err(ConfigurationError::Missing { fields: missing });
        };

        for (label, number) in [("sender", &from_number), ("recipient", &to)] {
            if !looks_like_e164(number) {
                warn!("{} {:?} is not in E.164 format (+<country><number>)", label, number);
            }
        }

        let api_base_url = env
            .api_base_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| TWILIO_API_BASE.to_string());
        debug!("Resolved configuration for account {}", account_sid);

        Ok(Self {
            credentials: Credentials::new(account_sid, Secret::new(auth_token), from_number),
            message: OutboundMessage::new(to, body),
            api_base_url,
        })
    }
}

/// First non-blank value, CLI before environment.
fn pick(cli: &Option<String>, env: Option<String>) -> Option<String> {
    cli.clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| env.filter(|s| !s.trim().is_empty()))
}

/// `+` followed by 7 to 15 digits.
pub fn looks_like_e164(number: &str) -> bool {
    number
        .strip_prefix('+')
        .is_some_and(|digits| {
            (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        })
}
