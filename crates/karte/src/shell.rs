// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `karte shell` command implementation.
//!
//! Launches an interactive console with readline history: browse and search
//! the summary history, start a streaming generation, and save, edit, or
//! delete records. Generated text is printed to stdout as it arrives.

use chrono::Utc;
use colored::Colorize;
use karte_api::BackendClient;
use karte_config::KarteConfig;
use karte_core::{
    DirectSaveRequest, GenerationResult, KarteError, SummaryQuery, SummaryUpdate,
};
use karte_session::{GenerationSession, SessionPhase, SummaryDraft};
use karte_store::{sync, HistoryView, SummaryStore};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};

/// Runs the `karte shell` interactive console.
pub async fn run_shell(config: KarteConfig) -> Result<(), KarteError> {
    let backend = BackendClient::new(&config.backend)?;
    let view = HistoryView::new(config.console.page_size);
    let mut shell = Shell {
        config,
        store: SummaryStore::new(),
        view,
        session: GenerationSession::new(),
        last_result: None,
    };

    // Best-effort initial listing. The console still works offline for
    // drafting; commands that need the backend report their own errors.
    if let Err(e) = sync::refresh(&mut shell.store, &backend, &SummaryQuery::default()).await {
        warn!(error = %e, "initial listing failed");
        eprintln!("{}: backend not reachable, history is empty", "warning".yellow());
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| KarteError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "karte shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "karte".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Err(e) = shell.handle_command(&backend, &mut rl, trimmed).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

struct Shell {
    config: KarteConfig,
    store: SummaryStore,
    view: HistoryView,
    session: GenerationSession,
    last_result: Option<GenerationResult>,
}

impl Shell {
    async fn handle_command(
        &mut self,
        backend: &BackendClient,
        rl: &mut DefaultEditor,
        input: &str,
    ) -> Result<(), KarteError> {
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        match command {
            "/help" => {
                print_help();
                Ok(())
            }
            "/list" => {
                sync::refresh(&mut self.store, backend, &SummaryQuery::default()).await?;
                self.print_page();
                Ok(())
            }
            "/search" => {
                self.view.set_query(rest);
                self.print_page();
                Ok(())
            }
            "/page" => {
                let page: usize = rest
                    .parse()
                    .map_err(|_| KarteError::Validation(format!("`{rest}` is not a page number")))?;
                self.view.set_page(page);
                self.print_page();
                Ok(())
            }
            "/show" => {
                let id = parse_id(rest)?;
                let record = backend.get_summary(id).await?;
                self.store.upsert(record.clone());
                self.store.select(id);
                print_record(&record);
                Ok(())
            }
            "/generate" => self.run_generation(backend, rl).await,
            "/save" => self.save_last_result(backend).await,
            "/update" => {
                let (id_text, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| KarteError::Validation("usage: /update <id> <text>".into()))?;
                let id = parse_id(id_text)?;
                let update = SummaryUpdate {
                    summary_text: text.trim().to_string(),
                    procedures_discussed: None,
                };
                sync::update_summary(&mut self.store, backend, id, &update).await?;
                println!("{}", format!("summary {id} updated").dimmed());
                Ok(())
            }
            "/delete" => {
                let id = parse_id(rest)?;
                sync::delete_summary(&mut self.store, backend, id).await?;
                println!("{}", format!("summary {id} deleted").dimmed());
                Ok(())
            }
            _ => Err(KarteError::Validation(format!(
                "unknown command `{command}`, try /help"
            ))),
        }
    }

    /// Collects a draft from the operator and streams the generation.
    async fn run_generation(
        &mut self,
        backend: &BackendClient,
        rl: &mut DefaultEditor,
    ) -> Result<(), KarteError> {
        let consultant_name = read_field(rl, "consultant name")?;
        let customer_name = read_field(rl, "customer name")?;
        let consultation_title = read_field(rl, "consultation title")?;
        println!("consultation content (finish with an empty line):");
        let original_text = read_multiline(rl)?;

        let draft = SummaryDraft {
            original_text,
            consultant_name,
            customer_name,
            consultation_title,
            consultation_date: Some(Utc::now().date_naive()),
            prompt_template_id: self.config.console.prompt_template_id,
        };

        // Print fragments as the stream publishes them.
        let mut rx = self.session.subscribe();
        let printer = tokio::spawn(async move {
            let mut printed = String::new();
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if snapshot.phase == SessionPhase::Error {
                    break;
                }
                let (rewritten, output) = stream_output(&printed, &snapshot.accumulated);
                if rewritten {
                    println!();
                }
                if !output.is_empty() {
                    print!("{output}");
                    std::io::Write::flush(&mut std::io::stdout()).ok();
                }
                printed = snapshot.accumulated;
                if snapshot.phase == SessionPhase::Complete {
                    break;
                }
            }
        });

        let outcome = self.session.generate(backend, &draft).await;
        let _ = printer.await;
        println!();

        match outcome {
            Ok(result) => {
                info!(template = %result.template_used, "generation finished");
                println!(
                    "{}",
                    format!(
                        "done (template: {}). /save persists it.",
                        result.template_used
                    )
                    .dimmed()
                );
                self.last_result = Some(result);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Persists the most recent generation result.
    async fn save_last_result(&mut self, backend: &BackendClient) -> Result<(), KarteError> {
        let result = self
            .last_result
            .as_ref()
            .ok_or_else(|| KarteError::Validation("nothing to save, run /generate first".into()))?;
        let mut request = DirectSaveRequest::from_result(result, result.summary.clone(), None);
        request.created_by = self.config.console.operator.clone();

        let saved = sync::save_generated(&mut self.store, backend, &request).await?;
        println!("{}", format!("saved as summary {}", saved.id).dimmed());
        self.last_result = None;
        Ok(())
    }

    fn print_page(&self) {
        let page = self.view.visible(self.store.records());
        if page.items.is_empty() {
            println!("{}", "no summaries".dimmed());
            return;
        }
        for record in &page.items {
            let title = record.consultation_title.as_deref().unwrap_or("-");
            let customer = record.customer_name.as_deref().unwrap_or("-");
            let marker = if self.store.selected_id() == Some(record.id) {
                "*"
            } else {
                " "
            };
            println!(
                "{marker} {:>5}  {}  {:<24}  {:<12}  {}",
                record.id,
                record.consultation_date,
                truncate(title, 24),
                truncate(customer, 12),
                truncate(&record.summary_text, 40),
            );
        }
        println!(
            "{}",
            format!(
                "page {}/{} ({} total)",
                page.page, page.total_pages, page.total_items
            )
            .dimmed()
        );
    }
}

fn print_help() {
    println!("  /list                refresh and show the history");
    println!("  /search <text>       filter the history");
    println!("  /page <n>            jump to a page");
    println!("  /show <id>           show one summary in full");
    println!("  /generate            generate a summary from a transcript");
    println!("  /save                persist the last generated summary");
    println!("  /update <id> <text>  replace a summary's text");
    println!("  /delete <id>         delete a summary");
    println!("  /quit                exit");
}

fn print_record(record: &karte_core::ConsultationSummary) {
    println!();
    println!("  id:          {}", record.id);
    println!("  date:        {}", record.consultation_date);
    if let Some(title) = &record.consultation_title {
        println!("  title:       {title}");
    }
    if let Some(consultant) = &record.consultant_name {
        println!("  consultant:  {consultant}");
    }
    if let Some(customer) = &record.customer_name {
        println!("  customer:    {customer}");
    }
    if let Some(author) = &record.created_by {
        println!("  created by:  {author}");
    }
    println!("  created at:  {}", record.created_at);
    println!();
    println!("{}", record.summary_text);
    println!();
}

fn parse_id(text: &str) -> Result<i64, KarteError> {
    text.parse()
        .map_err(|_| KarteError::Validation(format!("`{text}` is not a summary id")))
}

fn read_field(rl: &mut DefaultEditor, label: &str) -> Result<String, KarteError> {
    rl.readline(&format!("{label}: "))
        .map(|line| line.trim().to_string())
        .map_err(|e| KarteError::Internal(format!("input aborted: {e}")))
}

fn read_multiline(rl: &mut DefaultEditor) -> Result<String, KarteError> {
    let mut lines = Vec::new();
    loop {
        match rl.readline("| ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    break;
                }
                lines.push(line);
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(KarteError::Internal(format!("input aborted: {e}"))),
        }
    }
    Ok(lines.join("\n"))
}

/// What to print for a new snapshot of the streamed text.
///
/// While the text grows by concatenation only the new suffix is emitted.
/// The completed summary goes through server-side markdown cleanup and need
/// not extend the streamed text; in that case the whole text is reprinted
/// on a fresh line (the `true` flag).
fn stream_output<'a>(printed: &str, current: &'a str) -> (bool, &'a str) {
    match current.strip_prefix(printed) {
        Some(delta) => (false, delta),
        None => (true, current),
    }
}

/// Truncates on a character boundary, appending an ellipsis when cut.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_character_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789A", 10), "012345678…");
        // Multi-byte characters never split mid-codepoint.
        assert_eq!(truncate("相談内容の要約テキスト", 5), "相談内容…");
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("12").is_ok());
        assert!(parse_id("twelve").is_err());
    }

    #[test]
    fn stream_output_emits_growing_suffix() {
        assert_eq!(stream_output("", "要約"), (false, "要約"));
        assert_eq!(stream_output("要約", "要約テキスト"), (false, "テキスト"));
        assert_eq!(stream_output("same", "same"), (false, ""));
    }

    #[test]
    fn stream_output_reprints_rewritten_summary() {
        // A cleaned-up final summary does not extend the streamed text and
        // must never be sliced at a byte offset of the old text.
        assert_eq!(stream_output("stream", "ab語語語"), (true, "ab語語語"));
        assert_eq!(stream_output("# md", "md"), (true, "md"));
    }
}
