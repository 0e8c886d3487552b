//! Jira webhook payload types.
//!
//! Only the parts of the payload the relay reads are modeled; everything else is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The kind of webhook event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "jira:issue_created")]
    IssueCreated,
    #[serde(rename = "jira:issue_deleted")]
    IssueDeleted,
    #[serde(rename = "jira:issue_updated")]
    IssueUpdated,
    #[default]
    #[serde(other)]
    Other,
}

/// Whether a raw event carries an issue at all.
pub fn has_issue(raw: &Value) -> bool {
    raw.get("issue").is_some_and(|issue| !issue.is_null())
}

/// The acting user's identifying name, read without assuming anything else about the payload.
pub fn actor_name(raw: &Value) -> Option<&str> {
    raw.get("user")?.get("name")?.as_str()
}

/// Reads a string that Jira may send as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A full Jira webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraEvent {
    #[serde(default)]
    pub webhook_event: WebhookEvent,
    #[serde(default)]
    pub issue: Option<Issue>,
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub changelog: Option<Changelog>,
    #[serde(default)]
    pub comment: Option<Comment>,
}

/// A Jira user, usually the one who triggered the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub display_name: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueFields {
    pub issuetype: IssueType,
    #[serde(default)]
    pub assignee: Option<Actor>,
    pub summary: String,
    pub priority: Priority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project: Option<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub icon_url: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_urls: Option<HashMap<String, String>>,
}

impl Project {
    /// The 48x48 avatar, if the project has a non-empty one.
    pub fn avatar_48(&self) -> Option<&str> {
        self.avatar_urls.as_ref()?.get("48x48").map(String::as_str).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub items: Option<Vec<FieldChange>>,
}

/// One field-level change recorded on an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(rename = "fromString", default)]
    pub from_text: Option<String>,
    #[serde(rename = "toString", default)]
    pub to_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

impl Comment {
    /// A comment whose update time differs from its creation time has been edited.
    pub fn is_edited(&self) -> bool {
        self.created != self.updated
    }
}
