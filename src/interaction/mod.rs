//! Event handling for jira-relay.
//!
//! This module provides functionality for handling inbound webhook events:
//! - Filtering events that should not be relayed
//! - Summarizing issue and field changes as chat markdown
//! - Attributing messages to the acting user's chat account

pub mod jira_event;
