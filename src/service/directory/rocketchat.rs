//! Rocket.Chat user directory lookups.
//!
//! Jira users are matched to Rocket.Chat accounts through the `users.list` REST endpoint,
//! querying on the account email address.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::base::{config::Config, error::RelayError, types::Res};

use super::{DirectoryClient, DirectoryUser, GenericDirectoryClient};

// Extra methods on `DirectoryClient` applied by the rocketchat implementation.

impl DirectoryClient {
    /// Creates a new Rocket.Chat directory client.
    pub fn rocketchat(config: &Config) -> Res<Self> {
        let client = RocketChatDirectoryClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Types.

/// Body of a `users.list` response.
#[derive(Debug, Deserialize)]
struct UsersListResponse {
    #[serde(default)]
    users: Vec<DirectoryUser>,
}

// Specific implementations.

/// Rocket.Chat directory client implementation.
#[derive(Clone)]
pub struct RocketChatDirectoryClient {
    client: reqwest::Client,
    users_list_url: String,
    auth_token: String,
    user_id: String,
}

impl RocketChatDirectoryClient {
    /// Create a new Rocket.Chat directory client.
    #[instrument(name = "RocketChatDirectoryClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs)).build()?;

        Ok(Self {
            client,
            users_list_url: format!("{}/api/v1/users.list", config.chat_base_url()),
            auth_token: config.chat_auth_token.clone(),
            user_id: config.chat_user_id.clone(),
        })
    }
}

#[async_trait]
impl GenericDirectoryClient for RocketChatDirectoryClient {
    #[instrument(skip(self))]
    async fn find_user(&self, identifier: &str) -> Res<Option<DirectoryUser>> {
        let query = json!({ "emails.address": identifier }).to_string();

        let response = self
            .client
            .get(&self.users_list_url)
            .query(&[("query", query)])
            .header("X-Auth-Token", &self.auth_token)
            .header("X-User-Id", &self.user_id)
            .send()
            .await
            .map_err(RelayError::DirectoryRequest)?;

        let status = response.status();
        let body = response.text().await.map_err(RelayError::DirectoryRequest)?;

        if !status.is_success() {
            return Err(RelayError::DirectoryStatus { status: status.as_u16(), body }.into());
        }

        let list: UsersListResponse = serde_json::from_str(&body).map_err(RelayError::DirectoryBody)?;

        debug!("Directory returned {} match(es)", list.users.len());

        Ok(list.users.into_iter().next())
    }
}
