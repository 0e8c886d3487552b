pub mod rocketchat;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::base::types::Res;

// Types.

/// A user account in the chat system's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

// Traits.

/// Generic "directory" trait that clients must implement.
///
/// The directory maps issue-tracker identities onto chat accounts so that relayed
/// messages can carry the author's chat avatar.
#[async_trait]
pub trait GenericDirectoryClient: Send + Sync + 'static {
    /// Find the chat user whose email address matches the given Jira identifying name.
    ///
    /// Returns `Ok(None)` when nobody matches; errors are reserved for lookups that
    /// could not be completed.
    async fn find_user(&self, identifier: &str) -> Res<Option<DirectoryUser>>;
}

// Structs.

/// Directory client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DirectoryClient {
    inner: Arc<dyn GenericDirectoryClient>,
}

impl Deref for DirectoryClient {
    type Target = dyn GenericDirectoryClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl DirectoryClient {
    pub fn new(inner: Arc<dyn GenericDirectoryClient>) -> Self {
        Self { inner }
    }
}
