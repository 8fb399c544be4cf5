//! Interactive bot creation form.
//!
//! Prompts for the form fields, then loops over a menu whose entries follow
//! the session: processing steps only show up once they can run. Session
//! state lives until the user submits successfully or quits.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password, Select};
use secrecy::{ExposeSecret, SecretString};

use botgen_core::backend::BotBackend;
use botgen_core::orchestrator::FormOrchestrator;
use botgen_infra::upload::{load_knowledge_base_files, load_voice_samples};
use botgen_types::form::BotForm;
use botgen_types::notice::Notice;

use crate::cli::output::{Reporter, session_table, spinner};
use crate::state::AppState;

/// One entry of the form menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    EditFields,
    AttachKnowledgeBase,
    ClearKnowledgeBase,
    ProcessKnowledgeBase,
    AttachVoiceSamples,
    ClearVoiceSamples,
    ProcessVoiceClone,
    ShowStatus,
    Submit,
    Quit,
}

/// Form fields selectable for editing, in display order.
const FIELDS: &[&str] = &[
    "Bot Token *",
    "Bot Name *",
    "Bot Description",
    "Start Message",
    "Help Message",
    "System Prompt *",
];

/// Run the interactive form until the bot is created or the user quits.
pub async fn run_form(state: &AppState) -> Result<()> {
    let backend = state.backend()?;

    println!();
    println!("  {}", style("Bot Generator").bold().cyan());
    println!("  {}", style("Fill in the form to create a new bot").dim());
    println!();

    let form = prompt_form()?;
    let mut orchestrator = FormOrchestrator::with_form(backend, form);
    let mut reporter = Reporter::new(false);
    let mut created = false;

    loop {
        let actions = menu_actions(&orchestrator);
        let labels: Vec<&str> = actions.iter().map(|(_, label)| label.as_str()).collect();
        let default = default_index(&actions);

        println!();
        let selection = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(default)
            .interact()?;

        match actions[selection].0 {
            MenuAction::EditFields => edit_field(orchestrator.form_mut())?,
            MenuAction::AttachKnowledgeBase => {
                let paths = prompt_paths("Knowledge base files (comma separated)")?;
                match load_knowledge_base_files(&paths).await {
                    Ok(files) => orchestrator.set_knowledge_base_files(files),
                    Err(err) => reporter.notice(Notice::error(err.to_string())),
                }
            }
            MenuAction::ClearKnowledgeBase => orchestrator.clear_knowledge_base_files(),
            MenuAction::ProcessKnowledgeBase => {
                let progress = spinner("Processing knowledge base files...", false);
                let outcome = orchestrator.process_knowledge_base().await;
                progress.finish_and_clear();
                match outcome {
                    Ok(outcome) => reporter.notices(outcome.notices()),
                    Err(err) => reporter.validation(&err),
                }
            }
            MenuAction::AttachVoiceSamples => {
                let paths = prompt_paths("Voice samples, MP3 or OGG (comma separated)")?;
                let loaded = load_voice_samples(&paths).await;
                match loaded {
                    Ok(files) => {
                        if let Err(err) = orchestrator.set_voice_samples(files) {
                            reporter.validation(&err);
                        }
                    }
                    Err(err) => reporter.notice(Notice::error(err.to_string())),
                }
            }
            MenuAction::ClearVoiceSamples => orchestrator.clear_voice_samples(),
            MenuAction::ProcessVoiceClone => {
                let progress = spinner("Cloning voice...", false);
                let outcome = orchestrator.process_voice_clone().await;
                progress.finish_and_clear();
                match outcome {
                    Ok(outcome) => reporter.notices(outcome.notices()),
                    Err(err) => reporter.validation(&err),
                }
            }
            MenuAction::ShowStatus => {
                println!();
                println!("{}", session_table(&orchestrator));
            }
            MenuAction::Submit => {
                let progress = spinner("Creating your bot... This may take a moment...", false);
                let outcome = orchestrator.submit().await;
                progress.finish_and_clear();
                match outcome {
                    Ok(outcome) => {
                        reporter.notices(outcome.notices());
                        if outcome.is_created() {
                            created = true;
                            break;
                        }
                    }
                    Err(err) => reporter.validation(&err),
                }
            }
            MenuAction::Quit => break,
        }
    }

    reporter.finish(orchestrator.session(), created)?;
    Ok(())
}

/// Menu entries available for the current session.
fn menu_actions<B: BotBackend>(orchestrator: &FormOrchestrator<B>) -> Vec<(MenuAction, String)> {
    let mut actions = vec![(MenuAction::EditFields, "Edit form fields".to_string())];

    let kb_files = orchestrator.knowledge_base_files().len();
    actions.push((
        MenuAction::AttachKnowledgeBase,
        "Upload knowledge base files (optional)".to_string(),
    ));
    if kb_files > 0 {
        actions.push((
            MenuAction::ClearKnowledgeBase,
            format!("Clear knowledge base files ({kb_files} attached)"),
        ));
    }
    if orchestrator.can_process_knowledge_base() {
        actions.push((
            MenuAction::ProcessKnowledgeBase,
            "Process knowledge base files".to_string(),
        ));
    }

    let samples = orchestrator.voice_samples().len();
    actions.push((
        MenuAction::AttachVoiceSamples,
        "Upload voice samples (MP3 or OGG)".to_string(),
    ));
    if samples > 0 {
        actions.push((
            MenuAction::ClearVoiceSamples,
            format!("Clear voice samples ({samples} attached)"),
        ));
    }
    if orchestrator.can_process_voice_clone() {
        actions.push((MenuAction::ProcessVoiceClone, "Process voice clone".to_string()));
    }

    actions.push((MenuAction::ShowStatus, "Show session status".to_string()));
    actions.push((MenuAction::Submit, "Submit".to_string()));
    actions.push((MenuAction::Quit, "Quit".to_string()));
    actions
}

/// Preselect the first pending processing step, otherwise Submit.
fn default_index(actions: &[(MenuAction, String)]) -> usize {
    actions
        .iter()
        .position(|(a, _)| {
            matches!(
                a,
                MenuAction::ProcessKnowledgeBase | MenuAction::ProcessVoiceClone
            )
        })
        .or_else(|| actions.iter().position(|(a, _)| *a == MenuAction::Submit))
        .unwrap_or(0)
}

fn prompt_form() -> Result<BotForm> {
    let bot_token = Password::new()
        .with_prompt(FIELDS[0])
        .allow_empty_password(true)
        .interact()?;

    Ok(BotForm {
        bot_token: SecretString::from(bot_token),
        bot_name: prompt_text(FIELDS[1], "")?,
        bot_description: prompt_text(FIELDS[2], "")?,
        start_message: prompt_text(FIELDS[3], "")?,
        help_message: prompt_text(FIELDS[4], "")?,
        system_prompt: prompt_text(FIELDS[5], "")?,
    })
}

fn edit_field(form: &mut BotForm) -> Result<()> {
    let selection = Select::new()
        .with_prompt("Field to edit")
        .items(FIELDS)
        .default(0)
        .interact()?;

    match selection {
        0 => {
            let token = Password::new()
                .with_prompt(FIELDS[0])
                .allow_empty_password(true)
                .interact()?;
            // An empty entry keeps the current token.
            if !token.is_empty() || form.bot_token.expose_secret().is_empty() {
                form.bot_token = SecretString::from(token);
            }
        }
        1 => form.bot_name = prompt_text(FIELDS[1], &form.bot_name)?,
        2 => form.bot_description = prompt_text(FIELDS[2], &form.bot_description)?,
        3 => form.start_message = prompt_text(FIELDS[3], &form.start_message)?,
        4 => form.help_message = prompt_text(FIELDS[4], &form.help_message)?,
        _ => form.system_prompt = prompt_text(FIELDS[5], &form.system_prompt)?,
    }
    Ok(())
}

fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if !current.is_empty() {
        input = input.with_initial_text(current);
    }
    Ok(input.interact_text()?)
}

fn prompt_paths(prompt: &str) -> Result<Vec<PathBuf>> {
    let raw = prompt_text(prompt, "")?;
    Ok(parse_paths(&raw))
}

/// Split a comma separated list of paths, dropping blanks.
fn parse_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}
