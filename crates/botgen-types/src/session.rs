//! Per-session step state.

use serde::{Deserialize, Serialize};

/// Flags and identifiers produced by the optional processing steps.
///
/// Starts empty for every form session. Only the knowledge base and voice
/// clone steps write to it, plus the reset that runs when the knowledge base
/// upload set is emptied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub knowledge_base_processed: bool,
    pub knowledge_base_id: Option<String>,
    pub voice_clone_processed: bool,
    pub voice_id: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed knowledge base step. `id` is `None` when the
    /// backend indexed nothing.
    pub fn record_knowledge_base(&mut self, id: Option<String>) {
        self.knowledge_base_processed = true;
        self.knowledge_base_id = id;
    }

    /// Forget any knowledge base result so the step can run again.
    pub fn reset_knowledge_base(&mut self) {
        self.knowledge_base_processed = false;
        self.knowledge_base_id = None;
    }

    pub fn record_voice_id(&mut self, id: String) {
        self.voice_clone_processed = true;
        self.voice_id = Some(id);
    }

    /// The voice identifier, if one was stored and is non-blank.
    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn knowledge_base_id(&self) -> Option<&str> {
        self.knowledge_base_id.as_deref()
    }
}
