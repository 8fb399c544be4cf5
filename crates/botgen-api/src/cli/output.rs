//! Styled terminal output shared by the form and create commands.

use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use botgen_core::backend::BotBackend;
use botgen_core::orchestrator::FormOrchestrator;
use botgen_types::error::ValidationError;
use botgen_types::notice::{Notice, NoticeLevel};
use botgen_types::session::SessionState;

/// Everything a command reports, for `--json` output.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub notices: Vec<Notice>,
    pub session: SessionState,
    pub created: bool,
}

/// Print notices as they happen, or collect them for a final JSON report.
pub struct Reporter {
    json: bool,
    report: Report,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            report: Report::default(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn notices(&mut self, notices: Vec<Notice>) {
        for notice in notices {
            self.notice(notice);
        }
    }

    pub fn notice(&mut self, notice: Notice) {
        if !self.json {
            print_notice(&notice);
        }
        self.report.notices.push(notice);
    }

    pub fn validation(&mut self, err: &ValidationError) {
        self.notice(Notice::error(err.to_string()));
    }

    /// Print the JSON report (in JSON mode) and hand it back.
    pub fn finish(mut self, session: &SessionState, created: bool) -> anyhow::Result<Report> {
        self.report.session = session.clone();
        self.report.created = created;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&self.report)?);
        }
        Ok(self.report)
    }
}

pub fn print_notice(notice: &Notice) {
    let icon = match notice.level {
        NoticeLevel::Success => style("✓").green().bold(),
        NoticeLevel::Warning => style("⚠").yellow().bold(),
        NoticeLevel::Error => style("✗").red().bold(),
    };
    println!("  {} {}", icon, notice.message);

    if let Some(detail) = &notice.detail {
        let rendered =
            serde_json::to_string_pretty(detail).unwrap_or_else(|_| detail.to_string());
        for line in rendered.lines() {
            println!("      {}", style(line).dim());
        }
    }
}

/// Spinner shown while a backend call is in flight.
pub fn spinner(message: &'static str, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Session status as a table: form completeness, attachments, step results.
pub fn session_table<B: BotBackend>(form: &FormOrchestrator<B>) -> Table {
    let session = form.session();
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Step").fg(Color::White),
        Cell::new("State").fg(Color::White),
        Cell::new("Detail").fg(Color::White),
    ]);

    let missing = form.form().missing_required_fields();
    table.add_row(vec![
        Cell::new("Required fields"),
        if missing.is_empty() {
            Cell::new("● complete").fg(Color::Green)
        } else {
            Cell::new("○ incomplete").fg(Color::Yellow)
        },
        Cell::new(missing.join(", ")),
    ]);

    let kb_state = if session.knowledge_base_processed {
        match session.knowledge_base_id() {
            Some(_) => Cell::new("● processed").fg(Color::Green),
            None => Cell::new("◌ empty").fg(Color::Yellow),
        }
    } else {
        Cell::new("○ pending").fg(Color::DarkGrey)
    };
    table.add_row(vec![
        Cell::new("Knowledge base (optional)"),
        kb_state,
        Cell::new(attachment_detail(
            form.knowledge_base_files().len(),
            session.knowledge_base_id(),
        )),
    ]);

    let voice_state = match session.voice_id() {
        Some(_) => Cell::new("● cloned").fg(Color::Green),
        None => Cell::new("○ pending").fg(Color::Yellow),
    };
    table.add_row(vec![
        Cell::new("Voice clone *"),
        voice_state,
        Cell::new(attachment_detail(form.voice_samples().len(), session.voice_id())),
    ]);

    table
}

fn attachment_detail(files: usize, id: Option<&str>) -> String {
    let files = format!("{files} file{}", if files == 1 { "" } else { "s" });
    match id {
        Some(id) => format!("{files}, id {id}"),
        None => files,
    }
}
