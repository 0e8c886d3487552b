//! Runtime services and shared state for the jira-relay.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        error::RelayError,
        types::{OutgoingMessage, Res, ScriptResponse, Void},
    },
    interaction,
    service::{chat::ChatClient, directory::DirectoryClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the directory client, the optional chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The directory client instance.
    pub directory: DirectoryClient,
    /// The chat client instance, present when a webhook URL is configured.
    pub chat: Option<ChatClient>,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the directory client.
        let directory = DirectoryClient::rocketchat(&config)?;

        // Initialize the chat client.
        let chat = match &config.chat_webhook_url {
            Some(url) => Some(ChatClient::rocketchat(&config, url)?),
            None => None,
        };

        Ok(Self { config, directory, chat })
    }

    /// Transform one raw Jira webhook payload.
    pub async fn process(&self, payload: &str) -> Option<ScriptResponse> {
        interaction::jira_event::handle_jira_event(payload, &self.config, &self.directory).await
    }

    /// Post a produced message to the chat server.
    pub async fn deliver(&self, message: &OutgoingMessage) -> Void {
        let chat = self
            .chat
            .as_ref()
            .ok_or_else(|| RelayError::Config("`chat_webhook_url` must be set to post messages.".to_string()))?;

        chat.post_message(message).await
    }
}
