//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the jira-relay:
//! - Directory services (e.g., Rocket.Chat user lookup)
//! - Chat services (e.g., Rocket.Chat incoming webhooks)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod directory;
