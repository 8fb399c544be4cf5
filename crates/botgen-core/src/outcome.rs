//! Results of the three form actions and the notices they render to.
//!
//! Backend failures are outcomes, not errors: they are reported to the user
//! and the action can be triggered again. Only client-side validation stops
//! an action before it reaches the backend.

use serde_json::Value;

use botgen_types::error::BackendError;
use botgen_types::notice::Notice;

/// Result of processing the knowledge base files.
#[derive(Debug, Clone)]
pub enum KnowledgeBaseOutcome {
    /// The backend built a vector store.
    Indexed { vector_store_id: String },
    /// The backend answered but returned no identifier.
    Empty,
    /// The request never produced a usable response.
    Failed(BackendError),
}

impl KnowledgeBaseOutcome {
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            KnowledgeBaseOutcome::Indexed { .. } => {
                vec![Notice::success("Knowledge base processed successfully!")]
            }
            KnowledgeBaseOutcome::Empty => vec![Notice::warning(
                "No files processed. Vector store will be empty.",
            )],
            KnowledgeBaseOutcome::Failed(err) => vec![Notice::error(format!(
                "Error processing knowledge base: {err}"
            ))],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, KnowledgeBaseOutcome::Failed(_))
    }
}

/// Result of processing the voice samples.
#[derive(Debug, Clone)]
pub enum VoiceCloneOutcome {
    Cloned { voice_id: String },
    /// The backend answered without a voice id; `response` is the full body.
    MissingVoiceId { response: Value },
    Failed(BackendError),
}

impl VoiceCloneOutcome {
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            VoiceCloneOutcome::Cloned { voice_id } => vec![Notice::success(format!(
                "Voice cloned successfully! Voice ID: {voice_id}"
            ))],
            VoiceCloneOutcome::MissingVoiceId { response } => vec![
                Notice::error("Voice ID not found in response.").with_detail(response.clone()),
                Notice::error("Failed to process voice clone."),
            ],
            VoiceCloneOutcome::Failed(err) => vec![
                Notice::error(format!("Error communicating with backend: {err}")),
                Notice::error("Failed to process voice clone."),
            ],
        }
    }

    pub fn voice_id(&self) -> Option<&str> {
        match self {
            VoiceCloneOutcome::Cloned { voice_id } => Some(voice_id),
            _ => None,
        }
    }
}

/// Result of submitting the bot creation request.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The backend created the bot. A warning does not change the outcome.
    Created { warning: Option<String> },
    /// The backend answered with a falsy `success`.
    Rejected { error: String },
    /// The request timed out; the backend may still have created the bot.
    Indeterminate,
    Failed(BackendError),
}

impl SubmitOutcome {
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            SubmitOutcome::Created { warning } => {
                let mut notices = vec![Notice::success("Bot created successfully!")];
                if let Some(warning) = warning {
                    notices.push(Notice::warning(format!("Webhook setup warning: {warning}")));
                }
                notices
            }
            SubmitOutcome::Rejected { error } => {
                vec![Notice::error(format!("Failed to create bot: {error}"))]
            }
            SubmitOutcome::Indeterminate => vec![Notice::warning(
                "Request timed out, but your bot might still have been created.",
            )],
            SubmitOutcome::Failed(err) => {
                vec![Notice::error(format!("Error creating bot: {err}"))]
            }
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botgen_types::notice::NoticeLevel;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_missing_voice_id_carries_body() {
        let outcome = VoiceCloneOutcome::MissingVoiceId {
            response: json!({"detail": "too short"}),
        };
        let notices = outcome.notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].detail, Some(json!({"detail": "too short"})));
        assert!(outcome.voice_id().is_none());
    }

    #[test]
    fn test_created_with_warning_is_still_success() {
        let outcome = SubmitOutcome::Created {
            warning: Some("webhook failed".to_string()),
        };
        let notices = outcome.notices();
        assert!(outcome.is_created());
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[1].level, NoticeLevel::Warning);
        assert!(notices[1].message.contains("webhook failed"));
    }

    #[test]
    fn test_indeterminate_is_a_warning() {
        let notices = SubmitOutcome::Indeterminate.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].message.contains("might still have been created"));
    }

    #[test]
    fn test_knowledge_base_failure_notice() {
        let outcome =
            KnowledgeBaseOutcome::Failed(BackendError::Timeout(Duration::from_secs(30)));
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.notices()[0].message,
            "Error processing knowledge base: request timed out after 30s"
        );
    }
}
