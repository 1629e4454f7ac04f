//! Direct-HTTP dispatch path: a hand-built form POST to the Messages resource.
//! Used when the typed Twilio client is compiled out.

use async_trait::async_trait;
use sms_core::{
    messages_path, Credentials, DispatchError, OutboundMessage, SendResponse, SmsClient,
};
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;
use tracing::{debug, info};

pub const PROVIDER: &str = "direct-http";

#[derive(Clone, Debug)]
pub struct DirectHttpClient {
    /// API origin; override for testing/mocking.
    pub base_url: String,
    http: reqwest::Client,
}

impl DirectHttpClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            messages_path(account_sid)
        )
    }
}

#[async_trait]
impl SmsClient for DirectHttpClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(
        &self,
        credentials: &Credentials,
        message: &OutboundMessage,
    ) -> Result<SendResponse, DispatchError> {
        let url = self.messages_url(&credentials.account_sid);
        info!("Sending SMS via direct HTTP to {}", message.to);
        debug!("POST {}", url);

        let res = self
            .http
            .post(&url)
            .basic_auth(&credentials.account_sid, Some(credentials.auth_token.expose()))
            .form(&[
                ("To", message.to.as_str()),
                ("From", credentials.from_number.as_str()),
                ("Body", message.body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                debug!("HTTP request failed: {}", e);
                DispatchError::Network(e.to_string())
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            debug!("Provider rejected message with HTTP {}", status.as_u16());
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw_text = res
            .text()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        let raw_json: serde_json::Value = serde_json::from_str(&raw_text)
            .unwrap_or_else(|_| serde_json::json!({ "raw": raw_text }));

        let field = |name: &str| {
            raw_json
                .get(name)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        let sid = field("sid");
        let status = field("status");
        let created_at = field("date_created")
            .and_then(|s| OffsetDateTime::parse(&s, &Rfc2822).ok());

        info!(
            "SMS accepted with sid {}",
            sid.as_deref().unwrap_or("<none>")
        );
        Ok(SendResponse {
            sid,
            status,
            created_at,
            via: PROVIDER,
            raw: raw_json,
        })
    }
}
