//! Everything penpace shows or asks the user goes through [EditorUi], so the
//! same command logic works on an interactive terminal, behind the JSON pipe
//! of track mode, and against a mock in tests.

pub mod console;
pub mod pipe;

use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Contract any host surface must implement. Prompts report dismissal as
/// `None`/`false`, never as an error; a cancelled prompt is a no-op.
#[cfg_attr(test, automock)]
pub trait EditorUi {
    /// One-line transient notification.
    fn notify(&mut self, level: NoticeLevel, message: &str);

    /// Pushes a fresh status line to whatever renders it.
    fn show_status(&mut self, line: &str);

    /// Renders a block of text in a dismissible surface.
    fn show_lines(&mut self, lines: &[String]);

    /// Asks the user to pick one of `options`; returns its index.
    fn select(&mut self, title: &str, options: &[String]) -> Result<Option<usize>>;

    /// Asks for a line of text.
    fn input(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Asks a yes/no question; dismissal counts as no.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}
