//! Wire shapes exchanged with the bot backend.
//!
//! Responses are parsed permissively: every field is optional and unknown
//! fields are kept in `extra` rather than rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend endpoint paths, relative to the configured base URL.
pub mod endpoint {
    pub const PROCESS_KNOWLEDGE_BASE: &str = "/process_knowledge_base";
    pub const PROCESS_VOICE_CLONE: &str = "/process_voice_clone";
    pub const CREATE_BOT: &str = "/create_bot";
}

/// JSON body sent to `/create_bot`.
///
/// Built once at submit time and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateBotPayload {
    pub bot_token: String,
    pub bot_name: String,
    pub bot_description: String,
    pub start_message: String,
    pub help_message: String,
    pub system_prompt: String,
    /// Knowledge base identifier; serialized as `null` when absent.
    pub vector_store_id: Option<String>,
    pub voice_id: String,
}

impl fmt::Debug for CreateBotPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateBotPayload")
            .field("bot_token", &"[REDACTED]")
            .field("bot_name", &self.bot_name)
            .field("bot_description", &self.bot_description)
            .field("start_message", &self.start_message)
            .field("help_message", &self.help_message)
            .field("system_prompt", &self.system_prompt)
            .field("vector_store_id", &self.vector_store_id)
            .field("voice_id", &self.voice_id)
            .finish()
    }
}

/// Response from `/process_knowledge_base`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_store_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnowledgeBaseResponse {
    /// The vector store identifier. Blank or non-string values read as absent.
    pub fn vector_store_id(&self) -> Option<&str> {
        id_text(self.vector_store_id.as_ref())
    }
}

/// Response from `/process_voice_clone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceCloneResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VoiceCloneResponse {
    pub fn voice_id(&self) -> Option<&str> {
        id_text(self.voice_id.as_ref())
    }

    /// The whole response as JSON, for showing the user what came back.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Response from `/create_bot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBotResponse {
    #[serde(default)]
    pub success: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateBotResponse {
    pub fn is_success(&self) -> bool {
        is_truthy(&self.success)
    }

    /// The backend's error text, or "Unknown error" when it sent none.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .filter(|v| !v.is_null())
            .map(value_text)
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    pub fn warning_message(&self) -> Option<String> {
        self.warning.as_ref().filter(|v| !v.is_null()).map(value_text)
    }
}

/// JSON truthiness: `false`, `null`, `0`, and empty strings, arrays and
/// objects are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn id_text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|id| !id.is_empty())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!([])));
    }

    #[test]
    fn test_create_response_ignores_unknown_fields() {
        let resp: CreateBotResponse =
            serde_json::from_value(json!({"success": true, "bot_id": 42})).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.extra.get("bot_id"), Some(&json!(42)));
        assert!(resp.warning_message().is_none());
    }

    #[test]
    fn test_create_response_missing_success_is_failure() {
        let resp: CreateBotResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), "Unknown error");
    }

    #[test]
    fn test_create_response_error_and_warning_text() {
        let resp: CreateBotResponse = serde_json::from_value(json!({
            "success": false,
            "error": "token rejected",
            "warning": {"code": 7},
        }))
        .unwrap();
        assert_eq!(resp.error_message(), "token rejected");
        assert_eq!(resp.warning_message().as_deref(), Some("{\"code\":7}"));
    }

    #[test]
    fn test_voice_clone_response_round_trips_whole_body() {
        let body = json!({"detail": "no audio found"});
        let resp: VoiceCloneResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(resp.voice_id().is_none());
        assert_eq!(resp.to_value(), body);
    }

    #[test]
    fn test_empty_ids_read_as_absent() {
        let voice: VoiceCloneResponse = serde_json::from_value(json!({"voice_id": ""})).unwrap();
        assert!(voice.voice_id().is_none());
        let kb: KnowledgeBaseResponse =
            serde_json::from_value(json!({"vector_store_id": ""})).unwrap();
        assert!(kb.vector_store_id().is_none());
    }

    #[test]
    fn test_non_string_ids_read_as_absent() {
        let body = json!({"voice_id": 123, "status": "queued"});
        let voice: VoiceCloneResponse = serde_json::from_value(body.clone()).unwrap();
        assert!(voice.voice_id().is_none());
        assert_eq!(voice.to_value(), body);

        let kb: KnowledgeBaseResponse =
            serde_json::from_value(json!({"vector_store_id": 7})).unwrap();
        assert!(kb.vector_store_id().is_none());
    }

    #[test]
    fn test_payload_debug_redacts_token() {
        let payload = CreateBotPayload {
            bot_token: "123:secret".to_string(),
            bot_name: "Rex".to_string(),
            bot_description: String::new(),
            start_message: String::new(),
            help_message: String::new(),
            system_prompt: "Be nice".to_string(),
            vector_store_id: None,
            voice_id: "v123".to_string(),
        };
        let rendered = format!("{payload:?}");
        assert!(!rendered.contains("123:secret"));
        assert!(rendered.contains("[REDACTED]"));

        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["vector_store_id"], Value::Null);
        assert_eq!(wire["bot_token"], "123:secret");
    }
}
