//! Error kinds that callers may want to tell apart.
//!
//! Most code returns `anyhow`-based [`Res`](super::types::Res); these are the errors
//! raised at the boundaries (configuration, inbound payload, outbound HTTP).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Startup configuration is missing or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The inbound payload is not a well-formed Jira event.
    #[error("Malformed Jira event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    /// The event carries an issue but no acting user.
    #[error("Jira event has no acting user")]
    MissingActor,

    /// The directory lookup could not be performed.
    #[error("Directory lookup failed: {0}")]
    DirectoryRequest(#[from] reqwest::Error),

    /// The directory answered with a non-success status.
    #[error("Directory lookup returned status {status}: {body}")]
    DirectoryStatus { status: u16, body: String },

    /// The directory answered with a body that is not a user list.
    #[error("Directory lookup returned a malformed body: {0}")]
    DirectoryBody(serde_json::Error),

    /// The chat server rejected a posted message.
    #[error("Chat delivery returned status {status}: {body}")]
    ChatDelivery { status: u16, body: String },
}
