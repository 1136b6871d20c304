//! Operator boundary.
//!
//! The resolver never touches stdin/stdout directly. It emits
//! severity-tagged messages and asks for lines of input through
//! [`Operator`], so tests can script the whole workflow.

use crate::models::TransferProgress;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, BufRead, IsTerminal};

const PROGRESS_TEMPLATE: &str = "Transferring... [{bar:40}] {pos}/{len} files ({percent}%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    fn tag(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
            Severity::Success => "OK",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Operator {
    /// Show a message to the operator.
    fn emit(&mut self, severity: Severity, message: &str);

    /// Ask for one line of input. `None` means input is closed.
    fn prompt_line(&mut self, prompt: &str) -> Option<String>;

    /// Advisory progress during a transfer.
    fn report_progress(&mut self, _progress: TransferProgress) {}
}

/// Terminal-backed operator.
///
/// Prompts go through `dialoguer` when stdin is a terminal and fall back to
/// plain line reads when input is piped. Transfer progress is drawn with an
/// `indicatif` bar on stderr.
pub struct StdConsole {
    interactive: bool,
    theme: ColorfulTheme,
    progress: Option<ProgressBar>,
    draw_target: fn() -> ProgressDrawTarget,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            theme: ColorfulTheme::default(),
            progress: None,
            draw_target: ProgressDrawTarget::stderr,
        }
    }

    fn progress_bar(&mut self, total: u64) -> &ProgressBar {
        let draw_target = self.draw_target;
        self.progress.get_or_insert_with(|| {
            let bar = ProgressBar::with_draw_target(Some(total), draw_target());
            let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .map(|style| style.progress_chars("=> "))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        })
    }

    fn clear_progress(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
    }

    fn read_piped_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::error!("Failed to read operator input: {}", e);
                None
            }
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// One operator-facing line, e.g. `[INIT] WARN  careful`.
fn format_message(severity: Severity, message: &str) -> String {
    format!("[INIT] {:<5} {}", severity.tag(), message)
}

impl Operator for StdConsole {
    fn emit(&mut self, severity: Severity, message: &str) {
        let line = format_message(severity, message);
        match &self.progress {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Option<String> {
        self.clear_progress();

        if !self.interactive {
            println!("{}", prompt);
            return self.read_piped_line();
        }

        match Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::error!("Failed to read operator input: {}", e);
                None
            }
        }
    }

    fn report_progress(&mut self, progress: TransferProgress) {
        let total = progress.total as u64;
        let bar = self.progress_bar(total);
        if bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_position(progress.completed as u64);

        if progress.is_complete() {
            self.clear_progress();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_console() -> StdConsole {
        StdConsole {
            interactive: false,
            theme: ColorfulTheme::default(),
            progress: None,
            draw_target: ProgressDrawTarget::hidden,
        }
    }

    #[test]
    fn test_message_tags_severity() {
        assert_eq!(
            format_message(Severity::Warning, "careful"),
            "[INIT] WARN  careful"
        );
        assert_eq!(format_message(Severity::Success, "done"), "[INIT] OK    done");
        assert_eq!(format_message(Severity::Error, "bad"), "[INIT] ERROR bad");
    }

    #[test]
    fn test_progress_bar_tracks_transfer() {
        let mut console = hidden_console();

        console.report_progress(TransferProgress { completed: 1, total: 4 });
        let bar = console.progress.as_ref().unwrap();
        assert_eq!(bar.length(), Some(4));
        assert_eq!(bar.position(), 1);

        console.report_progress(TransferProgress { completed: 3, total: 4 });
        assert_eq!(console.progress.as_ref().unwrap().position(), 3);

        console.report_progress(TransferProgress { completed: 4, total: 4 });
        assert!(console.progress.is_none());
    }

    #[test]
    fn test_messages_during_transfer_keep_bar() {
        let mut console = hidden_console();

        console.report_progress(TransferProgress { completed: 1, total: 2 });
        console.emit(Severity::Info, "halfway");
        assert!(console.progress.is_some());

        console.clear_progress();
        assert!(console.progress.is_none());
    }

    #[test]
    fn test_empty_transfer_leaves_no_bar() {
        let mut console = hidden_console();
        console.report_progress(TransferProgress { completed: 0, total: 0 });
        assert!(console.progress.is_none());
    }
}
