//! The form session: fields, attached files, step state, and the three
//! actions that talk to the backend.
//!
//! Each action performs at most one backend call and returns once that call
//! has finished. Validation failures return `Err` without touching the
//! backend; backend failures come back as outcome variants so the caller can
//! report them and let the user try again.

use secrecy::ExposeSecret;
use tracing::{error, info, warn};

use botgen_types::backend::CreateBotPayload;
use botgen_types::error::ValidationError;
use botgen_types::form::{BotForm, UploadFile, VOICE_SAMPLE_EXTENSIONS, VOICE_SAMPLE_MEDIA_TYPE};
use botgen_types::session::SessionState;

use crate::backend::BotBackend;
use crate::outcome::{KnowledgeBaseOutcome, SubmitOutcome, VoiceCloneOutcome};

/// One user's bot creation form and everything it has produced so far.
///
/// Generic over [`BotBackend`] so core never depends on the HTTP client.
pub struct FormOrchestrator<B: BotBackend> {
    backend: B,
    form: BotForm,
    knowledge_base_files: Vec<UploadFile>,
    voice_samples: Vec<UploadFile>,
    session: SessionState,
}

impl<B: BotBackend> FormOrchestrator<B> {
    /// Start a fresh session with an empty form.
    pub fn new(backend: B) -> Self {
        Self::with_form(backend, BotForm::default())
    }

    /// Start a fresh session with pre-filled form values.
    pub fn with_form(backend: B, form: BotForm) -> Self {
        Self {
            backend,
            form,
            knowledge_base_files: Vec::new(),
            voice_samples: Vec::new(),
            session: SessionState::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn form(&self) -> &BotForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BotForm {
        &mut self.form
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn knowledge_base_files(&self) -> &[UploadFile] {
        &self.knowledge_base_files
    }

    pub fn voice_samples(&self) -> &[UploadFile] {
        &self.voice_samples
    }

    /// Replace the knowledge base upload set.
    ///
    /// An empty set drops any stored knowledge base id, even one from a
    /// successful run, and makes the step available again.
    pub fn set_knowledge_base_files(&mut self, files: Vec<UploadFile>) {
        self.knowledge_base_files = files;
        if self.knowledge_base_files.is_empty() {
            self.session.reset_knowledge_base();
        }
    }

    pub fn clear_knowledge_base_files(&mut self) {
        self.set_knowledge_base_files(Vec::new());
    }

    /// Replace the voice sample set. Every file must be an mp3 or ogg.
    pub fn set_voice_samples(&mut self, files: Vec<UploadFile>) -> Result<(), ValidationError> {
        if let Some(bad) = files.iter().find(|f| !f.is_voice_sample()) {
            return Err(ValidationError::UnsupportedVoiceSample {
                name: bad.name.clone(),
                allowed: VOICE_SAMPLE_EXTENSIONS.join(", "),
            });
        }
        self.voice_samples = files;
        Ok(())
    }

    pub fn clear_voice_samples(&mut self) {
        self.voice_samples.clear();
    }

    /// Files attached, bot name entered, and not already processed.
    pub fn can_process_knowledge_base(&self) -> bool {
        !self.knowledge_base_files.is_empty()
            && self.form.has_bot_name()
            && !self.session.knowledge_base_processed
    }

    pub fn can_process_voice_clone(&self) -> bool {
        !self.voice_samples.is_empty()
    }

    /// Send the knowledge base files to the backend for indexing.
    ///
    /// A response without an identifier still completes the step; the bot
    /// just gets an empty knowledge base. A failed request leaves the step
    /// unprocessed.
    pub async fn process_knowledge_base(
        &mut self,
    ) -> Result<KnowledgeBaseOutcome, ValidationError> {
        if self.knowledge_base_files.is_empty() {
            return Err(ValidationError::NoFiles("knowledge base"));
        }
        if !self.form.has_bot_name() {
            return Err(ValidationError::MissingBotName);
        }
        if self.session.knowledge_base_processed {
            return Err(ValidationError::KnowledgeBaseAlreadyProcessed);
        }

        let bot_name = self.form.bot_name.trim();
        info!(
            bot_name,
            files = self.knowledge_base_files.len(),
            "Processing knowledge base files"
        );

        match self
            .backend
            .process_knowledge_base(bot_name, &self.knowledge_base_files)
            .await
        {
            Ok(response) => {
                let id = response.vector_store_id().map(str::to_string);
                self.session.record_knowledge_base(id.clone());
                match id {
                    Some(vector_store_id) => {
                        info!(%vector_store_id, "Knowledge base processed successfully");
                        Ok(KnowledgeBaseOutcome::Indexed { vector_store_id })
                    }
                    None => {
                        warn!(bot_name, "Knowledge base response had no vector_store_id");
                        Ok(KnowledgeBaseOutcome::Empty)
                    }
                }
            }
            Err(err) => {
                error!(bot_name, error = %err, "Error processing knowledge base");
                Ok(KnowledgeBaseOutcome::Failed(err))
            }
        }
    }

    /// Send the voice samples to the backend for cloning.
    ///
    /// Only a non-empty `voice_id` counts as success. Failures leave any
    /// previously stored voice id in place and can be retried.
    pub async fn process_voice_clone(&mut self) -> Result<VoiceCloneOutcome, ValidationError> {
        if self.voice_samples.is_empty() {
            return Err(ValidationError::NoFiles("voice sample"));
        }
        if !self.form.has_bot_name() {
            warn!("Bot name is missing for voice cloning");
            return Err(ValidationError::MissingBotName);
        }

        let bot_name = self.form.bot_name.trim();
        let files: Vec<UploadFile> = self
            .voice_samples
            .iter()
            .cloned()
            .map(|f| f.with_media_type(VOICE_SAMPLE_MEDIA_TYPE))
            .collect();

        info!(bot_name, files = files.len(), "Processing voice clone");

        match self.backend.process_voice_clone(bot_name, &files).await {
            Ok(response) => match response.voice_id() {
                Some(voice_id) => {
                    let voice_id = voice_id.to_string();
                    info!(%voice_id, "Voice cloned successfully");
                    self.session.record_voice_id(voice_id.clone());
                    Ok(VoiceCloneOutcome::Cloned { voice_id })
                }
                None => {
                    let body = response.to_value();
                    error!(bot_name, response = %body, "Voice cloning response had no voice_id");
                    Ok(VoiceCloneOutcome::MissingVoiceId { response: body })
                }
            },
            Err(err) => {
                error!(bot_name, error = %err, "Error during voice cloning");
                Ok(VoiceCloneOutcome::Failed(err))
            }
        }
    }

    /// Validate the form and build the creation payload from the current
    /// field values and session state.
    pub fn build_payload(&self) -> Result<CreateBotPayload, ValidationError> {
        let missing = self.form.missing_required_fields();
        if !missing.is_empty() {
            warn!(?missing, "Missing required fields");
            return Err(ValidationError::MissingRequiredFields(missing));
        }

        let Some(voice_id) = self.session.voice_id() else {
            warn!("Voice ID missing, user needs to upload voice samples");
            return Err(ValidationError::MissingVoiceId);
        };

        Ok(CreateBotPayload {
            bot_token: self.form.bot_token.expose_secret().to_string(),
            bot_name: self.form.bot_name.trim().to_string(),
            bot_description: self.form.bot_description.clone(),
            start_message: self.form.start_message.clone(),
            help_message: self.form.help_message.clone(),
            system_prompt: self.form.system_prompt.clone(),
            vector_store_id: self.session.knowledge_base_id().map(str::to_string),
            voice_id: voice_id.to_string(),
        })
    }

    /// Validate the form and ask the backend to create the bot.
    ///
    /// A timeout is reported as [`SubmitOutcome::Indeterminate`] rather than
    /// a failure: the backend may have finished before the client gave up.
    pub async fn submit(&self) -> Result<SubmitOutcome, ValidationError> {
        let payload = self.build_payload()?;

        info!(bot_name = %payload.bot_name, "Sending bot creation request");

        match self.backend.create_bot(&payload).await {
            Ok(response) if response.is_success() => {
                info!(bot_name = %payload.bot_name, "Bot created successfully");
                let warning = response.warning_message();
                if let Some(warning) = &warning {
                    warn!(%warning, "Webhook setup warning");
                }
                Ok(SubmitOutcome::Created { warning })
            }
            Ok(response) => {
                let error = response.error_message();
                error!(bot_name = %payload.bot_name, %error, "Failed to create bot");
                Ok(SubmitOutcome::Rejected { error })
            }
            Err(err) if err.is_timeout() => {
                warn!(bot_name = %payload.bot_name, "Bot creation request timed out");
                Ok(SubmitOutcome::Indeterminate)
            }
            Err(err) => {
                error!(bot_name = %payload.bot_name, error = %err, "Error creating bot");
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }
}
