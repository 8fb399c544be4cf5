//! Bot form fields and uploaded files.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Extensions accepted for voice samples.
pub const VOICE_SAMPLE_EXTENSIONS: &[&str] = &["mp3", "ogg"];

/// Media type every voice sample is tagged with on upload.
pub const VOICE_SAMPLE_MEDIA_TYPE: &str = "audio/mpeg";

/// The values a user enters into the bot creation form.
///
/// `bot_token`, `bot_name` and `system_prompt` are required at submit time;
/// the remaining text fields default to empty strings.
#[derive(Debug)]
pub struct BotForm {
    /// Messenger bot token. Never logged.
    pub bot_token: SecretString,
    pub bot_name: String,
    pub bot_description: String,
    pub start_message: String,
    pub help_message: String,
    pub system_prompt: String,
}

impl BotForm {
    /// The required fields that are currently blank, in form order.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bot_token.expose_secret().trim().is_empty() {
            missing.push("bot token");
        }
        if self.bot_name.trim().is_empty() {
            missing.push("bot name");
        }
        if self.system_prompt.trim().is_empty() {
            missing.push("system prompt");
        }
        missing
    }

    /// Whether a non-blank bot name has been entered.
    pub fn has_bot_name(&self) -> bool {
        !self.bot_name.trim().is_empty()
    }
}

impl Default for BotForm {
    fn default() -> Self {
        Self {
            bot_token: SecretString::from(String::new()),
            bot_name: String::new(),
            bot_description: String::new(),
            start_message: String::new(),
            help_message: String::new(),
            system_prompt: String::new(),
        }
    }
}

/// One file attached to the form, held in memory until the session ends.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent as the multipart part's file name.
    pub name: String,
    pub bytes: Vec<u8>,
    /// Explicit media type; `None` lets the backend sniff it.
    pub media_type: Option<String>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Whether this file may be attached as a voice sample.
    pub fn is_voice_sample(&self) -> bool {
        self.extension()
            .is_some_and(|ext| VOICE_SAMPLE_EXTENSIONS.contains(&ext.as_str()))
    }
}

// Bytes are elided so a Debug print of a session doesn't dump whole files.
impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("media_type", &self.media_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> BotForm {
        BotForm {
            bot_token: SecretString::from("123:abc".to_string()),
            bot_name: "Rex".to_string(),
            system_prompt: "You are Rex.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filled_form_has_no_missing_fields() {
        assert!(filled_form().missing_required_fields().is_empty());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let form = BotForm {
            bot_name: "   ".to_string(),
            ..filled_form()
        };
        assert_eq!(form.missing_required_fields(), vec!["bot name"]);
        assert!(!form.has_bot_name());
    }

    #[test]
    fn test_default_form_misses_all_required() {
        assert_eq!(
            BotForm::default().missing_required_fields(),
            vec!["bot token", "bot name", "system prompt"]
        );
    }

    #[test]
    fn test_form_debug_redacts_token() {
        let rendered = format!("{:?}", filled_form());
        assert!(!rendered.contains("123:abc"));
    }

    #[test]
    fn test_voice_sample_extensions() {
        assert!(UploadFile::new("sample.mp3", vec![]).is_voice_sample());
        assert!(UploadFile::new("Sample.OGG", vec![]).is_voice_sample());
        assert!(!UploadFile::new("sample.wav", vec![]).is_voice_sample());
        assert!(!UploadFile::new("mp3", vec![]).is_voice_sample());
    }

    #[test]
    fn test_upload_debug_elides_bytes() {
        let file = UploadFile::new("notes.txt", vec![1, 2, 3]);
        assert_eq!(
            format!("{file:?}"),
            "UploadFile { name: \"notes.txt\", len: 3, media_type: None }"
        );
    }
}
