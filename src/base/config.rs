//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use reqwest::Url;
use serde::{Deserialize, Deserializer};

use super::{error::RelayError, types::Res};

/// Jira logo shown when the project has no avatar.
pub const JIRA_LOGO: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAACAAAAAgCAYAAABzenr0AAACRElEQVRYhbWXsUscQRTGf4iIyHHIISIWIsHisMgfkNIiBJFwiKQIkipVqpA/wEZEggSxEkmZwiKI5A84REKKkIMQrINYBQmHBDmEHJdNMW+42dk3d3O76wcDu2/e973vZvfN7EF+PAfaMjYL6AzFJFBRYh0gkdEBpryciuQVwjPgFugCu068CvQcAz1g2pnfEc6taOTGL6dIAjxw5nad+FsnvuhxrosYuPbElrz5Rc8Ucu9yfhcxsAncYZZ4fwTeO+HcUcILWgFqOXg1si9vFBrAXB7iEMySfYQZzGCeWxdoAq+Bh8BYjoJjwn0jWrYrqsOIbdIvUQLseTmPgHXgiYx1ibnYU3RuYpyfKMQ/mNWx+KzkfHHmZ4Tj55zGGNhQiAlw5OQ8VeYbzvxRQCNqUxoHLgMCa07eRyd+4sTXAtwrYCLGAJje1URugLrkVIHvMuyLVZccjfsitrhFMyD0k36bTtA/cOZkTuOckaOTFtA7IgEuSG9ONeBHILctWrnwGNO/mvA3zAk4LddaThfTpoXwKiBuVyL0yxPhloLtAUVCY7us4hb7IxQ/KLu4xWFE8cP7Kg6mld4PKH5BvoNrZBMfBphohKnFMAusyvU48ClgoA3M34eBUynwUu6ngK8BE1Gn3ihYccR79Jd5nuyXsx0rZRo498Q7mK8dMDudZuC8rOLLgQI7Ts5xIGe5DANbinCP9AfmEul/SnZslWHgTBFuKnna8a3lpRCzadSVWMiAj6GPIMbAX+/+H9BS8loyN4ibwX9j/jIXDkk+pgAAAABJRU5ErkJggg==";

/// Default identities whose events are never relayed.
fn default_suppressed_users() -> Vec<String> {
    vec!["gitlab".to_string()]
}

/// Accepts either a list or a comma-separated string, as environment variables only carry strings.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        List(Vec<String>),
        Csv(String),
    }

    let users = match StringOrList::deserialize(deserializer)? {
        StringOrList::List(users) => users,
        StringOrList::Csv(users) => users.split(',').map(str::to_string).collect(),
    };

    Ok(users.into_iter().map(|user| user.trim().to_string()).filter(|user| !user.is_empty()).collect())
}

/// Default maximum length of free text in a message.
fn default_description_max_length() -> usize {
    140
}

/// Default icon for projects without an avatar.
fn default_fallback_icon_url() -> String {
    JIRA_LOGO.to_string()
}

/// Default timeout for outbound HTTP requests, in seconds.
fn default_request_timeout_secs() -> u64 {
    30
}

/// Configuration for the jira-relay application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Rocket.Chat server base URL, e.g. `https://chat.example.com` (`CHAT_BASE_URL`).
    #[serde(default)]
    pub chat_base_url: String,
    /// Auth token of the account used for directory lookups (`CHAT_AUTH_TOKEN`).
    #[serde(default)]
    pub chat_auth_token: String,
    /// User ID of the account used for directory lookups (`CHAT_USER_ID`).
    #[serde(default)]
    pub chat_user_id: String,
    /// Chat username whose avatar is used when the Jira user has no chat account (`DEFAULT_BOT_USERNAME`).
    #[serde(default)]
    pub default_bot_username: String,
    /// Jira identities whose events are dropped, e.g. bridge accounts (`SUPPRESSED_USERS`).
    #[serde(default = "default_suppressed_users", deserialize_with = "string_or_list")]
    pub suppressed_users: Vec<String>,
    /// Free text longer than this is truncated (`DESCRIPTION_MAX_LENGTH`).
    #[serde(default = "default_description_max_length")]
    pub description_max_length: usize,
    /// Message icon used when the project has no avatar (`FALLBACK_ICON_URL`).
    #[serde(default = "default_fallback_icon_url")]
    pub fallback_icon_url: String,
    /// Use the default bot identity when the directory lookup fails, instead of failing the event
    /// (`DIRECTORY_FALLBACK_ON_ERROR`).
    #[serde(default)]
    pub directory_fallback_on_error: bool,
    /// Incoming webhook URL that produced messages can be posted to (`CHAT_WEBHOOK_URL`).
    #[serde(default)]
    pub chat_webhook_url: Option<String>,
    /// Timeout for outbound HTTP requests, in seconds (`REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            chat_base_url: String::new(),
            chat_auth_token: String::new(),
            chat_user_id: String::new(),
            default_bot_username: String::new(),
            suppressed_users: default_suppressed_users(),
            description_max_length: default_description_max_length(),
            fallback_icon_url: default_fallback_icon_url(),
            directory_fallback_on_error: false,
            chat_webhook_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ConfigInner {
    /// The chat base URL without a trailing slash.
    pub fn chat_base_url(&self) -> &str {
        self.chat_base_url.trim_end_matches('/')
    }

    /// The avatar URL of a chat user.
    pub fn avatar_url(&self, username: &str) -> String {
        format!("{}/avatar/{}", self.chat_base_url(), username)
    }

    /// Whether events from this Jira identity are dropped.
    pub fn is_suppressed(&self, name: &str) -> bool {
        self.suppressed_users.iter().any(|user| user == name)
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(
            config::Environment::default()
                .prefix("JIRA_RELAY")
                .prefix_separator("_")
                .list_separator(",")
                .with_list_parse_key("suppressed_users"),
        );

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        Self::new(cfg.build()?.try_deserialize()?)
    }

    /// Wraps and validates an already-built configuration.
    pub fn new(inner: ConfigInner) -> Res<Self> {
        let result = Config { inner: Arc::new(inner) };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Result<(), RelayError> {
        let required = [
            ("chat_base_url", &self.chat_base_url),
            ("chat_auth_token", &self.chat_auth_token),
            ("chat_user_id", &self.chat_user_id),
            ("default_bot_username", &self.default_bot_username),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(RelayError::Config(format!("`{name}` must be set.")));
            }
        }

        let url = Url::parse(self.chat_base_url()).map_err(|e| RelayError::Config(format!("`chat_base_url` is not a valid URL: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RelayError::Config("`chat_base_url` must be an http(s) URL.".to_string()));
        }

        if let Some(webhook) = &self.chat_webhook_url {
            Url::parse(webhook).map_err(|e| RelayError::Config(format!("`chat_webhook_url` is not a valid URL: {e}")))?;
        }

        if self.description_max_length < 4 {
            return Err(RelayError::Config("`description_max_length` must be at least 4.".to_string()));
        }

        if self.request_timeout_secs < 1 {
            return Err(RelayError::Config("`request_timeout_secs` must be at least 1.".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_inner() -> ConfigInner {
        ConfigInner {
            chat_base_url: "https://chat.example.com/".to_string(),
            chat_auth_token: "token".to_string(),
            chat_user_id: "uid".to_string(),
            default_bot_username: "jira-bot".to_string(),
            ..Default::default()
        }
    }

    fn config_error(inner: ConfigInner) -> String {
        let err = Config::new(inner).unwrap_err();
        assert!(matches!(err.downcast_ref::<RelayError>(), Some(RelayError::Config(_))));
        err.to_string()
    }

    #[test]
    fn test_valid_config() {
        let config = Config::new(valid_inner()).unwrap();

        assert_eq!(config.chat_base_url(), "https://chat.example.com");
        assert_eq!(config.avatar_url("jane"), "https://chat.example.com/avatar/jane");
        assert_eq!(config.description_max_length, 140);
        assert_eq!(config.fallback_icon_url, JIRA_LOGO);
        assert!(config.is_suppressed("gitlab"));
        assert!(!config.is_suppressed("jane"));
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(config_error(ConfigInner { chat_base_url: String::new(), ..valid_inner() }).contains("chat_base_url"));
        assert!(config_error(ConfigInner { chat_auth_token: " ".to_string(), ..valid_inner() }).contains("chat_auth_token"));
        assert!(config_error(ConfigInner { chat_user_id: String::new(), ..valid_inner() }).contains("chat_user_id"));
        assert!(config_error(ConfigInner { default_bot_username: String::new(), ..valid_inner() }).contains("default_bot_username"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_error(ConfigInner { chat_base_url: "not a url".to_string(), ..valid_inner() }).contains("chat_base_url"));
        assert!(config_error(ConfigInner { chat_base_url: "ftp://chat.example.com".to_string(), ..valid_inner() }).contains("http(s)"));
        assert!(config_error(ConfigInner { description_max_length: 3, ..valid_inner() }).contains("description_max_length"));
        assert!(config_error(ConfigInner { request_timeout_secs: 0, ..valid_inner() }).contains("request_timeout_secs"));
        assert!(config_error(ConfigInner { chat_webhook_url: Some("nope".to_string()), ..valid_inner() }).contains("chat_webhook_url"));
    }

    #[test]
    fn test_suppressed_users_from_text() {
        let inner: ConfigInner = serde_json::from_value(serde_json::json!({ "suppressed_users": " gitlab, github ,," })).unwrap();
        assert_eq!(inner.suppressed_users, ["gitlab", "github"]);

        let inner: ConfigInner = serde_json::from_value(serde_json::json!({ "suppressed_users": ["gitlab"] })).unwrap();
        assert_eq!(inner.suppressed_users, ["gitlab"]);

        let inner: ConfigInner = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(inner.suppressed_users, ["gitlab"]);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("jira-relay-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
chat_base_url = "https://chat.example.com"
chat_auth_token = "token"
chat_user_id = "uid"
default_bot_username = "jira-bot"
suppressed_users = ["gitlab", "github"]
description_max_length = 80
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(config.is_suppressed("github"));
        assert_eq!(config.description_max_length, 80);
        assert!(!config.directory_fallback_on_error);
    }
}
