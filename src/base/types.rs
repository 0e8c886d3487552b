use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A single block within an outgoing chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub thumb_url: String,
    pub author_name: String,
    pub author_icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The message posted into the chat channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub icon_url: String,
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    /// Whether there is anything worth posting.
    pub fn has_content(&self) -> bool {
        self.text.is_some() || !self.attachments.is_empty()
    }
}

/// Error record returned in place of a message when processing fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub success: bool,
    pub message: String,
}

impl ErrorResult {
    /// Builds the record from an error and the input that caused it.
    ///
    /// Valid JSON input is embedded in compact form with its key order kept; anything else is embedded as-is.
    pub fn new(err: &Err, payload: &str) -> Self {
        let input = serde_json::from_str::<Value>(payload).map(|v| v.to_string()).unwrap_or_else(|_| payload.trim().to_string());

        Self {
            success: false,
            message: format!("{err} {input}"),
        }
    }
}

/// The result of processing one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptResponse {
    Content(OutgoingMessage),
    Error(ErrorResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_response_shape() {
        let response = ScriptResponse::Content(OutgoingMessage {
            text: None,
            icon_url: "icon".to_string(),
            attachments: vec![Attachment {
                thumb_url: "thumb".to_string(),
                author_name: "Jane".to_string(),
                author_icon: "avatar".to_string(),
                text: None,
            }],
        });

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "content": {
                    "icon_url": "icon",
                    "attachments": [{ "thumb_url": "thumb", "author_name": "Jane", "author_icon": "avatar" }]
                }
            })
        );
    }

    #[test]
    fn test_error_result_embeds_compact_input() {
        let err = anyhow::anyhow!("boom");
        let result = ErrorResult::new(&err, "{ \"b\" : 1, \"a\": { \"z\": 2, \"y\": 3 } }");

        assert!(!result.success);
        assert_eq!(result.message, r#"boom {"b":1,"a":{"z":2,"y":3}}"#);

        let json = serde_json::to_value(ScriptResponse::Error(result)).unwrap();
        assert_eq!(json["error"]["success"], false);
    }

    #[test]
    fn test_error_result_embeds_raw_text() {
        let err = anyhow::anyhow!("bad");
        let result = ErrorResult::new(&err, "not json\n");

        assert_eq!(result.message, "bad not json");
    }
}
