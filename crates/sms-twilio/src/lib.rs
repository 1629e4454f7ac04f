//! # Twilio SMS Provider
//!
//! Typed client for the Twilio Messages API. This is the primary dispatch path
//! of `send-sms`; the binary only falls back to a hand-built HTTP POST when this
//! crate is compiled out.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{Credentials, OutboundMessage, Secret, SmsClient};
//! use sms_twilio::TwilioClient;
//!
//! let client = TwilioClient::new();
//! let creds = Credentials::new("AC...", Secret::new("token"), "+15550001111");
//! let response = client
//!     .send(&creds, &OutboundMessage::new("+15550002222", "Hello from Twilio!"))
//!     .await?;
//! ```

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use sms_core::{Credentials, DispatchError, OutboundMessage, SendResponse, SmsClient};
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;
use tracing::{debug, info};
use url::Url;

pub const PROVIDER: &str = "twilio-client";

const API_VERSION: &str = "2010-04-01";

/// Twilio REST client.
#[derive(Clone, Debug)]
pub struct TwilioClient {
    /// API origin; override for testing/mocking.
    pub base_url: String,
    http: reqwest::Client,
}

impl Default for TwilioClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TwilioClient {
    pub fn new() -> Self {
        Self::with_base_url(sms_core::TWILIO_API_BASE.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Messages resource URL for `account_sid`. The SID is percent-encoded as a
    /// single path segment.
    pub fn messages_url(&self, account_sid: &str) -> Result<Url, DispatchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DispatchError::InvalidRequest(format!("base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                DispatchError::InvalidRequest(format!("base url cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend([API_VERSION, "Accounts", account_sid, "Messages.json"]);
        Ok(url)
    }
}

/// Form parameters of a Create Message request. Field order is wire order.
#[derive(Debug, Serialize)]
pub struct TwilioSendRequest<'a> {
    #[serde(rename = "To")]
    pub to: &'a str,
    #[serde(rename = "From")]
    pub from: &'a str,
    #[serde(rename = "Body")]
    pub body: &'a str,
}

impl<'a> TwilioSendRequest<'a> {
    pub fn new(credentials: &'a Credentials, message: &'a OutboundMessage) -> Self {
        Self {
            to: &message.to,
            from: &credentials.from_number,
            body: &message.body,
        }
    }

    pub fn encode(&self) -> Result<String, DispatchError> {
        serde_urlencoded::to_string(self)
            .map_err(|e| DispatchError::InvalidRequest(format!("form encode: {}", e)))
    }
}

/// Subset of Twilio's Message resource.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwilioMessage {
    pub sid: String,
    pub status: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub body: Option<String>,
    pub num_segments: Option<String>,
    /// RFC 2822, e.g. "Thu, 30 Jul 2015 20:12:31 +0000"
    pub date_created: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

impl TwilioMessage {
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.date_created
            .as_deref()
            .and_then(|s| OffsetDateTime::parse(s, &Rfc2822).ok())
    }
}

/// Error document Twilio returns with 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioApiError {
    pub code: Option<i64>,
    pub message: String,
    pub more_info: Option<String>,
}

impl TwilioApiError {
    fn describe(&self) -> String {
        let mut out = match self.code {
            Some(code) => format!("Twilio error {}: {}", code, self.message),
            None => self.message.clone(),
        };
        if let Some(info) = &self.more_info {
            out.push_str(&format!(" (see {})", info));
        }
        out
    }
}

fn into_response(raw_text: &str) -> SendResponse {
    match serde_json::from_str::<TwilioMessage>(raw_text) {
        Ok(msg) => SendResponse {
            created_at: msg.created_at(),
            raw: serde_json::from_str(raw_text).unwrap_or_default(),
            sid: Some(msg.sid),
            status: msg.status,
            via: PROVIDER,
        },
        Err(e) => {
            debug!("Twilio response is not a Message resource: {}", e);
            let raw = serde_json::from_str(raw_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw": raw_text }));
            let sid = raw.get("sid").and_then(|v| v.as_str()).map(str::to_string);
            SendResponse {
                sid,
                status: None,
                created_at: None,
                via: PROVIDER,
                raw,
            }
        }
    }
}

#[async_trait]
impl SmsClient for TwilioClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(
        &self,
        credentials: &Credentials,
        message: &OutboundMessage,
    ) -> Result<SendResponse, DispatchError> {
        let url = self.messages_url(&credentials.account_sid)?;
        let form = TwilioSendRequest::new(credentials, message).encode()?;

        info!("Sending SMS via Twilio client to {}", message.to);
        debug!("POST {} ({} byte form)", url, form.len());

        let res = self
            .http
            .post(url)
            .basic_auth(&credentials.account_sid, Some(credentials.auth_token.expose()))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| {
                debug!("Twilio request failed: {}", e);
                DispatchError::Network(e.to_string())
            })?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_str::<TwilioApiError>(&text)
                .map(|e| e.describe())
                .unwrap_or(text);
            debug!("Twilio rejected message with HTTP {}", status.as_u16());
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response = into_response(&text);
        info!(
            "SMS accepted by Twilio with sid {}",
            response.sid.as_deref().unwrap_or("<none>")
        );
        Ok(response)
    }
}
