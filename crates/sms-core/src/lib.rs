//! # SMS Core
//!
//! Core traits and types shared by the `send-sms` dispatch paths.
//!
//! This crate provides the building blocks for sending one SMS:
//! - [`SmsClient`] capability trait implemented by each dispatch path
//! - [`Credentials`] and [`OutboundMessage`], the two inputs of a dispatch
//! - [`DispatchResult`], the single outcome handed to the reporter
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{Credentials, OutboundMessage, Secret, SmsClient};
//!
//! let creds = Credentials::new("AC123", Secret::new("token"), "+15550001111");
//! let msg = OutboundMessage::new("+15550002222", "hello");
//! let response = client.send(&creds, &msg).await?;
//! ```

use std::fmt;

use async_trait::async_trait;
use time::OffsetDateTime;

/// Errors that can occur while dispatching a message
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Transport failure: DNS, connection refused, TLS, reset...
    #[error("network error: {0}")]
    Network(String),
    /// Provider answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Request could not be built from the given inputs
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl DispatchError {
    /// HTTP status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A string that never shows up in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    /// Access the plaintext. Only call this at the point of use.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

/// Account credentials plus the sending number.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub account_sid: String,
    pub auth_token: Secret,
    pub from_number: String,
}

impl Credentials {
    pub fn new<S: Into<String>>(account_sid: S, auth_token: Secret, from_number: S) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token,
            from_number: from_number.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub body: String,
}

impl OutboundMessage {
    pub fn new<S: Into<String>>(to: S, body: S) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
        }
    }
}

/// What an adapter got back from the provider on a 2xx.
#[derive(Debug, Clone)]
pub struct SendResponse {
    /// Provider message identifier, e.g. `SM...`. `None` if the body carried none.
    pub sid: Option<String>,
    /// Provider-reported message status, e.g. "queued".
    pub status: Option<String>,
    pub created_at: Option<OffsetDateTime>,
    /// Name of the dispatch path that produced the response.
    pub via: &'static str,
    /// Raw provider payload for debugging / audit.
    pub raw: serde_json::Value,
}

/// Outcome of one dispatch, success or failure.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub success: bool,
    pub message_sid: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<OffsetDateTime>,
    pub error: Option<String>,
    pub via: &'static str,
    pub raw: Option<serde_json::Value>,
}

impl DispatchResult {
    pub fn sent(response: SendResponse) -> Self {
        Self {
            success: true,
            message_sid: response.sid,
            status: response.status,
            created_at: response.created_at,
            error: None,
            via: response.via,
            raw: Some(response.raw),
        }
    }

    pub fn failed(via: &'static str, error: &DispatchError) -> Self {
        Self {
            success: false,
            message_sid: None,
            status: None,
            created_at: None,
            error: Some(error.to_string()),
            via,
            raw: None,
        }
    }

    pub fn from_outcome(via: &'static str, outcome: Result<SendResponse, DispatchError>) -> Self {
        match outcome {
            Ok(response) => Self::sent(response),
            Err(e) => Self::failed(via, &e),
        }
    }
}

/// One way of getting a message to the provider.
#[async_trait]
pub trait SmsClient: Send + Sync {
    /// Stable name of the dispatch path, e.g. "twilio-client".
    fn name(&self) -> &'static str;

    /// Submit a single message. Makes exactly one network call.
    async fn send(
        &self,
        credentials: &Credentials,
        message: &OutboundMessage,
    ) -> Result<SendResponse, DispatchError>;
}

/// Default Twilio API origin.
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Path of the Messages resource for `account_sid`, relative to the API origin.
pub fn messages_path(account_sid: &str) -> String {
    format!("/2010-04-01/Accounts/{}/Messages.json", account_sid)
}
