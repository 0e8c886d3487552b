//! Library root for `jira-relay`.
//!
//! Jira-relay turns Jira webhook events into Rocket.Chat messages:
//! - Summarizes created, deleted, and updated issues as chat markdown
//! - Lists changed fields and relays new or edited comments
//! - Attributes each message to the acting user's chat avatar
//!
//! The relay integrates with Rocket.Chat for the user directory and message
//! delivery. The architecture is built around extensible traits that allow for
//! different implementations of each service.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use prelude::*;

use base::types::ScriptResponse;

/// Public async entry for the binary crate.
///
/// Transforms one payload and, when `post` is set, delivers any produced message:
/// - Creates the runtime context with directory and chat clients
/// - Runs the payload through the event transformer
/// - Posts the resulting message if asked to
pub async fn start(config: Config, payload: &str, post: bool) -> Res<Option<ScriptResponse>> {
    info!("Starting jira-relay ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Process the payload.
    let response = runtime.process(payload).await;

    // Deliver the message.
    if post && let Some(ScriptResponse::Content(message)) = &response {
        runtime.deliver(message).await?;
    }

    Ok(response)
}
