//! Turns a Jira webhook event into a chat message.

use serde_json::Value;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        error::RelayError,
        format::{base_url_from_self, render_template, strip_description, strip_priority_ordinal},
        jira::{Actor, FieldChange, Issue, JiraEvent, WebhookEvent, actor_name, has_issue},
        types::{Attachment, ErrorResult, OutgoingMessage, Res, ScriptResponse},
    },
    service::directory::DirectoryClient,
};

/// Handles one raw Jira webhook payload.
///
/// Returns `None` when the event is filtered out or produces no content. Any failure
/// is logged and turned into an error record that embeds the original payload.
#[instrument(skip_all)]
pub async fn handle_jira_event(payload: &str, config: &Config, directory: &DirectoryClient) -> Option<ScriptResponse> {
    // Process the event.
    let result = handle_jira_event_internal(payload, config, directory).in_current_span().await;

    match result {
        Ok(Some(message)) => Some(ScriptResponse::Content(message)),
        Ok(None) => None,
        Err(err) => {
            // Log any errors.
            error!("Error while handling jira event: {}", err);
            Some(ScriptResponse::Error(ErrorResult::new(&err, payload)))
        }
    }
}

#[instrument(skip_all)]
async fn handle_jira_event_internal(payload: &str, config: &Config, directory: &DirectoryClient) -> Res<Option<OutgoingMessage>> {
    let raw: Value = serde_json::from_str(payload).map_err(RelayError::MalformedEvent)?;

    // Decide whether the event is relayed at all, before reading the rest of it.

    if !has_issue(&raw) {
        debug!("Skipping event without an issue.");
        return Ok(None);
    }

    if let Some(name) = actor_name(&raw)
        && config.is_suppressed(name)
    {
        info!("Skipping event from suppressed user `{}`.", name);
        return Ok(None);
    }

    let event: JiraEvent = serde_json::from_value(raw).map_err(RelayError::MalformedEvent)?;
    let Some(issue) = event.issue.as_ref() else {
        return Ok(None);
    };
    let user = event.user.as_ref().ok_or(RelayError::MissingActor)?;

    info!("Handling {:?} for {}", event.webhook_event, issue.key);

    // Build the message.

    let summary = issue_summary(issue, user);
    let texts = attachment_texts(&event, issue, &summary, config.description_max_length);

    let mut message = OutgoingMessage {
        text: None,
        icon_url: issue
            .fields
            .project
            .as_ref()
            .and_then(|p| p.avatar_48())
            .unwrap_or(config.fallback_icon_url.as_str())
            .to_string(),
        attachments: Vec::new(),
    };

    if !texts.is_empty() {
        let author_icon = resolve_author_icon(user, config, directory).await?;

        message.attachments = texts.into_iter().map(|text| prepare_attachment(issue, user, &author_icon, Some(text))).collect();
    }

    if !message.has_content() {
        debug!("Event produced no content.");
        return Ok(None);
    }

    Ok(Some(message))
}

/// Renders `[KEY](url) summary _(priority, assigned to X)_`.
fn issue_summary(issue: &Issue, user: &Actor) -> String {
    let base_url = base_url_from_self(&issue.self_url);
    let priority = strip_priority_ordinal(&issue.fields.priority.name);

    let assigned_to = match &issue.fields.assignee {
        Some(assignee) if assignee.name != user.name => format!(", assigned to {}", assignee.display_name),
        _ => String::new(),
    };

    format!(
        "[{key}]({base_url}/browse/{key}) {summary} _({priority}{assigned_to})_",
        key = issue.key,
        summary = issue.fields.summary
    )
}

/// Produces the text of every attachment the event warrants, in order.
fn attachment_texts(event: &JiraEvent, issue: &Issue, summary: &str, max_length: usize) -> Vec<String> {
    let strip = |text: Option<&str>| strip_description(text, max_length).unwrap_or_default();
    let mut texts = Vec::new();

    match event.webhook_event {
        WebhookEvent::IssueCreated => {
            texts.push(format!("*Created* {summary}:\n{}", strip(issue.fields.description.as_deref())));
        }
        WebhookEvent::IssueDeleted => {
            texts.push(format!("*Deleted* {summary}"));
        }
        WebhookEvent::IssueUpdated => {
            // Field updates.
            if let Some(items) = event.changelog.as_ref().and_then(|c| c.items.as_ref()) {
                let logs: Vec<String> = items.iter().map(|change| change_log_line(change, max_length)).collect();

                if !logs.is_empty() {
                    texts.push(format!("*Updated* {summary}:\n  - {}", logs.join("\n  - ")));
                }
            }

            // Comment updates.
            if let Some(comment) = &event.comment {
                let action = if comment.is_edited() { "Updated comment" } else { "Commented" };
                texts.push(format!("*{action}* on {summary}:\n{}", strip(Some(comment.body.as_str()))));
            }
        }
        WebhookEvent::Other => {
            debug!("No message for this event type.");
        }
    }

    texts
}

/// Renders one changelog item.
fn change_log_line(change: &FieldChange, max_length: usize) -> String {
    if change.field == "description" {
        let to = strip_description(change.to_text.as_deref(), max_length).unwrap_or_default();
        return format!("Changed *description* to:\n{to}");
    }

    format!(
        "*{}* changed from {} to *{}*",
        change.field,
        change.from_text.as_deref().unwrap_or_default(),
        change.to_text.as_deref().unwrap_or_default()
    )
}

/// Finds the chat avatar of the acting user, falling back to the default bot.
#[instrument(skip_all)]
async fn resolve_author_icon(user: &Actor, config: &Config, directory: &DirectoryClient) -> Res<String> {
    let mut username = None;

    if let Some(identifier) = user.name.as_deref() {
        match directory.find_user(identifier).await {
            Ok(found) => username = found.map(|u| u.username),
            Err(err) if config.directory_fallback_on_error => {
                warn!("Directory lookup failed, using the default bot: {}", err);
            }
            Err(err) => return Err(err),
        }
    }

    let username = username.unwrap_or_else(|| {
        debug!("No chat user found, using the default bot.");
        config.default_bot_username.clone()
    });

    Ok(config.avatar_url(&username))
}

/// Builds an attachment carrying the author metadata and templated text.
fn prepare_attachment(issue: &Issue, user: &Actor, author_icon: &str, text: Option<String>) -> Attachment {
    Attachment {
        thumb_url: issue.fields.issuetype.icon_url.clone(),
        author_name: user.display_name.clone(),
        author_icon: author_icon.to_string(),
        text: text.map(|t| render_template(&t, user, issue)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(assignee: Option<Value>) -> Issue {
        serde_json::from_value(json!({
            "key": "PROJ-7",
            "self": "https://jira.example.com/rest/api/2/issue/10007",
            "fields": {
                "issuetype": { "iconUrl": "https://jira.example.com/task.png" },
                "summary": "Fix login",
                "priority": { "name": "1. High" },
                "assignee": assignee
            }
        }))
        .unwrap()
    }

    fn user() -> Actor {
        Actor {
            name: Some("jane".to_string()),
            display_name: "Jane Doe".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_issue_summary_unassigned() {
        let summary = issue_summary(&issue(None), &user());

        assert_eq!(summary, "[PROJ-7](https://jira.example.com/browse/PROJ-7) Fix login _(High)_");
    }

    #[test]
    fn test_issue_summary_assigned_to_someone_else() {
        let summary = issue_summary(&issue(Some(json!({ "name": "bob", "displayName": "Bob Smith" }))), &user());

        assert!(summary.ends_with("_(High, assigned to Bob Smith)_"));
    }

    #[test]
    fn test_issue_summary_assigned_to_actor() {
        let summary = issue_summary(&issue(Some(json!({ "name": "jane", "displayName": "Jane Doe" }))), &user());

        assert!(!summary.contains("assigned to"));
    }

    #[test]
    fn test_change_log_lines() {
        let status = FieldChange {
            field: "status".to_string(),
            from_text: Some("Open".to_string()),
            to_text: Some("Done".to_string()),
        };
        assert_eq!(change_log_line(&status, 140), "*status* changed from Open to *Done*");

        let cleared = FieldChange {
            field: "assignee".to_string(),
            from_text: Some("Bob".to_string()),
            to_text: None,
        };
        assert_eq!(change_log_line(&cleared, 140), "*assignee* changed from Bob to **");

        let description = FieldChange {
            field: "description".to_string(),
            from_text: None,
            to_text: Some("x".repeat(200)),
        };
        let line = change_log_line(&description, 140);
        assert!(line.starts_with("Changed *description* to:\n"));
        assert!(line.ends_with("..."));
    }

    #[test]
    fn test_prepare_attachment() {
        let attachment = prepare_attachment(&issue(None), &user(), "https://chat/avatar/jane", Some("{{user.displayName}} on {{issue.key}}".to_string()));

        assert_eq!(attachment.thumb_url, "https://jira.example.com/task.png");
        assert_eq!(attachment.author_name, "Jane Doe");
        assert_eq!(attachment.author_icon, "https://chat/avatar/jane");
        assert_eq!(attachment.text.as_deref(), Some("Jane Doe on PROJ-7"));

        let attachment = prepare_attachment(&issue(None), &user(), "icon", None);
        assert!(attachment.text.is_none());
    }
}
