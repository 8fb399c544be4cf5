//! BotBackend trait definition.
//!
//! The remote service that indexes knowledge bases, clones voices, and
//! creates bots. Implementations live in botgen-infra (e.g. `HttpBotBackend`).

use botgen_types::backend::{
    CreateBotPayload, CreateBotResponse, KnowledgeBaseResponse, VoiceCloneResponse,
};
use botgen_types::error::BackendError;
use botgen_types::form::UploadFile;

/// Port to the bot backend.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Each call is a
/// single attempt; retrying is left to the user.
pub trait BotBackend: Send + Sync {
    /// Upload knowledge base documents for `bot_name` and build a vector store.
    fn process_knowledge_base(
        &self,
        bot_name: &str,
        files: &[UploadFile],
    ) -> impl std::future::Future<Output = Result<KnowledgeBaseResponse, BackendError>> + Send;

    /// Upload voice samples for `bot_name` and clone a voice from them.
    fn process_voice_clone(
        &self,
        bot_name: &str,
        files: &[UploadFile],
    ) -> impl std::future::Future<Output = Result<VoiceCloneResponse, BackendError>> + Send;

    /// Create the bot from a fully built payload.
    fn create_bot(
        &self,
        payload: &CreateBotPayload,
    ) -> impl std::future::Future<Output = Result<CreateBotResponse, BackendError>> + Send;
}
