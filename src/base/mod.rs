//! Core components, types, and utilities for the jira-relay.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Jira webhook payload types and outgoing chat message types.
//! - Text rendering helpers.
//! - Common types, errors, and result handling.

pub mod config;
pub mod error;
pub mod format;
pub mod jira;
pub mod types;
