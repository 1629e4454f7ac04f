//! # send-sms
//!
//! Send a single SMS through the Twilio REST API.
//!
//! A run is strictly linear: resolve configuration, dispatch one message,
//! report the outcome. Dispatch uses the typed Twilio client when the
//! `twilio-client` feature is compiled in and otherwise falls back to a
//! hand-built form POST; both paths make exactly one network call.
//!
//! ## Configuration
//!
//! Credentials come from `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` and
//! `TWILIO_FROM` (overridable with `--account-sid`, `--auth-token`, `--from`).
//! The recipient and text come from `--to` and `--body`.
//!
//! ```rust,ignore
//! use sms_send::{cli::Cli, report::Reporter};
//!
//! let cli = Cli { to: Some("+15550002222".into()), body: Some("hi".into()), ..Cli::default() };
//! let code = sms_send::run(&cli, None, &mut Reporter::stdio(false)).await;
//! ```

use std::io::Write;

pub mod cli;
pub mod config;
pub mod direct;
pub mod dispatch;
pub mod report;
pub mod telemetry;

#[cfg(test)]
mod test_support;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::report::Reporter;

/// Common imports
pub mod prelude {
    pub use crate::cli::Cli;
    pub use crate::config::{AppConfig, ConfigurationError};
    pub use crate::direct::DirectHttpClient;
    pub use crate::dispatch::{Capability, Dispatcher};
    pub use crate::report::Reporter;
    pub use sms_core::*;
}

/// Resolve, dispatch, report. Returns the process exit status.
///
/// `env` replaces the process environment when given. Configuration errors
/// return before any client is built, so no network call is attempted.
pub async fn run<O: Write, E: Write>(
    cli: &Cli,
    env: Option<::config::Map<String, String>>,
    reporter: &mut Reporter<O, E>,
) -> u8 {
    let config = match AppConfig::resolve(cli, env) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!("Configuration error: {}", e);
            return reporter.configuration_error(&e);
        }
    };

    let dispatcher = Dispatcher::detect(&config.api_base_url);
    let result = dispatcher
        .dispatch(&config.credentials, &config.message)
        .await;
    reporter.report(&result)
}
