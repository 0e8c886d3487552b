//! Rocket.Chat incoming-webhook delivery.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    error::RelayError,
    types::{OutgoingMessage, Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the rocketchat implementation.

impl ChatClient {
    /// Creates a new Rocket.Chat webhook client posting to `webhook_url`.
    pub fn rocketchat(config: &Config, webhook_url: &str) -> Res<Self> {
        let client = RocketChatWebhookClient::new(config, webhook_url)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// Rocket.Chat incoming-webhook client implementation.
#[derive(Clone)]
pub struct RocketChatWebhookClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl RocketChatWebhookClient {
    /// Create a new Rocket.Chat webhook client.
    #[instrument(name = "RocketChatWebhookClient::new", skip_all)]
    pub fn new(config: &Config, webhook_url: &str) -> Res<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs)).build()?;

        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
        })
    }
}

#[async_trait]
impl GenericChatClient for RocketChatWebhookClient {
    #[instrument(skip_all)]
    async fn post_message(&self, message: &OutgoingMessage) -> Void {
        let response = self.client.post(&self.webhook_url).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::ChatDelivery { status: status.as_u16(), body }.into());
        }

        info!("Posted message with {} attachment(s)", message.attachments.len());

        Ok(())
    }
}
