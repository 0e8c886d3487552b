//! Text helpers used to render Jira events as chat markdown.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::jira::{Actor, Issue};

static PRIORITY_ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[0-9]*\.\s*").expect("valid priority regex"));
static TEMPLATE_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(user|issue)\.([A-Za-z_0-9]+)\}\}").expect("valid template regex"));

const ELLIPSIS: &str = "...";

/// Truncates free text to `max_length` characters, ending in an ellipsis when cut.
///
/// Absent text stays absent.
pub fn strip_description(text: Option<&str>, max_length: usize) -> Option<String> {
    let text = text?;

    if text.chars().count() <= max_length {
        return Some(text.to_string());
    }

    let mut truncated: String = text.chars().take(max_length.saturating_sub(ELLIPSIS.len())).collect();
    truncated.push_str(ELLIPSIS);

    Some(truncated)
}

/// Removes a leading ordinal such as `1. ` from a priority name.
pub fn strip_priority_ordinal(name: &str) -> String {
    PRIORITY_ORDINAL.replace(name, "").into_owned()
}

/// Derives the browsable Jira base URL from an API `self` URL.
pub fn base_url_from_self(self_url: &str) -> &str {
    match self_url.find("/rest/") {
        Some(index) => &self_url[..index],
        None => self_url,
    }
}

fn user_field<'a>(user: &'a Actor, key: &str) -> Option<&'a str> {
    match key {
        "name" => user.name.as_deref(),
        "displayName" => Some(user.display_name.as_str()),
        "key" => user.key.as_deref(),
        "accountId" => user.account_id.as_deref(),
        "emailAddress" => user.email_address.as_deref(),
        _ => None,
    }
}

fn issue_field<'a>(issue: &'a Issue, key: &str) -> Option<&'a str> {
    match key {
        "id" => issue.id.as_deref(),
        "key" => Some(issue.key.as_str()),
        "self" => Some(issue.self_url.as_str()),
        "summary" => Some(issue.fields.summary.as_str()),
        "description" => issue.fields.description.as_deref(),
        "priority" => Some(issue.fields.priority.name.as_str()),
        "type" => issue.fields.issuetype.name.as_deref(),
        _ => None,
    }
}

/// Substitutes `{{user.<key>}}` and `{{issue.<key>}}` placeholders.
///
/// Keys outside the known set, or with no value, are left as written.
pub fn render_template(text: &str, user: &Actor, issue: &Issue) -> String {
    TEMPLATE_FIELD
        .replace_all(text, |caps: &Captures| {
            let value = match &caps[1] {
                "user" => user_field(user, &caps[2]),
                _ => issue_field(issue, &caps[2]),
            };

            value.unwrap_or(&caps[0]).to_string()
        })
        .into_owned()
}
