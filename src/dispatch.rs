use sms_core::{Credentials, DispatchResult, OutboundMessage, SmsClient};
use tracing::info;

use crate::direct::DirectHttpClient;

/// Which dispatch paths this build can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Typed Twilio client (`twilio-client` feature)
    ProviderClient,
    /// Hand-built form POST
    DirectHttp,
}

impl Capability {
    pub fn detect() -> Self {
        if cfg!(feature = "twilio-client") {
            Capability::ProviderClient
        } else {
            Capability::DirectHttp
        }
    }

    /// Build the client for this capability. Falls back to direct HTTP when
    /// the provider client is not compiled in.
    pub fn client(self, base_url: &str) -> Box<dyn SmsClient> {
        match self {
            #[cfg(feature = "twilio-client")]
            Capability::ProviderClient => {
                Box::new(sms_twilio::TwilioClient::with_base_url(base_url.to_string()))
            }
            _ => Box::new(DirectHttpClient::new(base_url.to_string())),
        }
    }
}

/// Owns the selected client for a single dispatch.
pub struct Dispatcher {
    client: Box<dyn SmsClient>,
}

impl Dispatcher {
    pub fn new(client: Box<dyn SmsClient>) -> Self {
        Self { client }
    }

    /// Pick the best available path once, at startup.
    pub fn detect(base_url: &str) -> Self {
        let capability = Capability::detect();
        let dispatcher = Self::new(capability.client(base_url));
        info!("Dispatching via {}", dispatcher.via());
        dispatcher
    }

    pub fn via(&self) -> &'static str {
        self.client.name()
    }

    /// Send the message. Consumes the dispatcher so a run can only send once.
    pub async fn dispatch(
        self,
        credentials: &Credentials,
        message: &OutboundMessage,
    ) -> DispatchResult {
        let outcome = self.client.send(credentials, message).await;
        DispatchResult::from_outcome(self.client.name(), outcome)
    }
}
