//! One-shot bot creation: knowledge base (if any), voice clone, submit.

use anyhow::{Result, bail};
use dialoguer::Password;
use secrecy::SecretString;

use botgen_core::backend::BotBackend;
use botgen_core::orchestrator::FormOrchestrator;
use botgen_core::outcome::{KnowledgeBaseOutcome, SubmitOutcome};
use botgen_infra::upload::{load_knowledge_base_files, load_voice_samples};
use botgen_types::form::BotForm;

use crate::cli::CreateArgs;
use crate::cli::output::{Reporter, spinner};
use crate::state::AppState;

/// Run every step of the form from command-line flags.
///
/// # Examples
///
/// ```bash
/// botgen create --name Rex --system-prompt "You are Rex." \
///     --voice-sample bark.mp3 --knowledge-base faq.md
/// ```
pub async fn create_bot(state: &AppState, args: CreateArgs, json: bool) -> Result<()> {
    let token = match args.token {
        Some(token) => token,
        None if json => String::new(),
        None => Password::new()
            .with_prompt("Bot token")
            .allow_empty_password(true)
            .interact()?,
    };

    let system_prompt = match (&args.system_prompt, &args.system_prompt_file) {
        (_, Some(path)) => tokio::fs::read_to_string(path).await?,
        (Some(prompt), None) => prompt.clone(),
        (None, None) => String::new(),
    };

    let form = BotForm {
        bot_token: SecretString::from(token),
        bot_name: args.name.unwrap_or_default(),
        bot_description: args.description,
        start_message: args.start_message,
        help_message: args.help_message,
        system_prompt,
    };

    let knowledge_base = load_knowledge_base_files(&args.knowledge_base).await?;
    let voice_samples = load_voice_samples(&args.voice_samples).await?;

    let mut orchestrator = FormOrchestrator::with_form(state.backend()?, form);
    orchestrator.set_knowledge_base_files(knowledge_base);
    orchestrator.set_voice_samples(voice_samples)?;

    let mut reporter = Reporter::new(json);
    let created = run_steps(&mut orchestrator, &mut reporter).await;
    let report = reporter.finish(orchestrator.session(), created)?;

    if !report.created {
        bail!("bot was not created");
    }
    Ok(())
}

/// Drive the three steps in order, stopping at the first one that fails.
/// Returns whether the bot was created.
async fn run_steps<B: BotBackend>(
    orchestrator: &mut FormOrchestrator<B>,
    reporter: &mut Reporter,
) -> bool {
    if orchestrator.can_process_knowledge_base() {
        let progress = spinner("Processing knowledge base files...", reporter.is_json());
        let outcome = orchestrator.process_knowledge_base().await;
        progress.finish_and_clear();

        match outcome {
            Ok(outcome) => {
                reporter.notices(outcome.notices());
                // The documents were asked for explicitly; don't create the
                // bot without them.
                if let KnowledgeBaseOutcome::Failed(_) = outcome {
                    return false;
                }
            }
            Err(err) => {
                reporter.validation(&err);
                return false;
            }
        }
    }

    if orchestrator.can_process_voice_clone() {
        let progress = spinner("Cloning voice...", reporter.is_json());
        let outcome = orchestrator.process_voice_clone().await;
        progress.finish_and_clear();

        match outcome {
            Ok(outcome) => {
                reporter.notices(outcome.notices());
                if outcome.voice_id().is_none() {
                    return false;
                }
            }
            Err(err) => {
                reporter.validation(&err);
                return false;
            }
        }
    }

    let progress = spinner(
        "Creating your bot... This may take a moment...",
        reporter.is_json(),
    );
    let outcome = orchestrator.submit().await;
    progress.finish_and_clear();

    match outcome {
        Ok(outcome) => {
            reporter.notices(outcome.notices());
            matches!(outcome, SubmitOutcome::Created { .. })
        }
        Err(err) => {
            reporter.validation(&err);
            false
        }
    }
}
