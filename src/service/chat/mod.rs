pub mod rocketchat;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{OutgoingMessage, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines how a produced message reaches a chat platform. Implementing
/// this trait allows different chat services to receive relayed Jira events.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Post a message into the configured channel.
    async fn post_message(&self, message: &OutgoingMessage) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
