#![cfg(test)]

// Kept in its own test binary: it mutates the process environment.

use jira_relay::base::config::Config;

#[test]
fn test_load_from_env() {
    let vars = [
        ("JIRA_RELAY_CHAT_BASE_URL", "https://chat.example.com"),
        ("JIRA_RELAY_CHAT_AUTH_TOKEN", "0123"),
        ("JIRA_RELAY_CHAT_USER_ID", "007"),
        ("JIRA_RELAY_DEFAULT_BOT_USERNAME", "jira-bot"),
        ("JIRA_RELAY_SUPPRESSED_USERS", "gitlab,github"),
        ("JIRA_RELAY_DESCRIPTION_MAX_LENGTH", "80"),
        ("JIRA_RELAY_DIRECTORY_FALLBACK_ON_ERROR", "true"),
        ("JIRA_RELAY_REQUEST_TIMEOUT_SECS", "5"),
    ];

    for (key, value) in vars {
        // SAFETY: this is the only test in this binary, so nothing reads the environment concurrently.
        unsafe { std::env::set_var(key, value) };
    }

    let config = Config::load(None).unwrap();

    assert_eq!(config.chat_base_url(), "https://chat.example.com");
    assert_eq!(config.chat_auth_token, "0123");
    assert_eq!(config.chat_user_id, "007");
    assert_eq!(config.default_bot_username, "jira-bot");
    assert_eq!(config.suppressed_users, ["gitlab", "github"]);
    assert_eq!(config.description_max_length, 80);
    assert!(config.directory_fallback_on_error);
    assert_eq!(config.request_timeout_secs, 5);
    assert!(config.chat_webhook_url.is_none());
}
