use std::io::{Stdout, Write};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, error};

use super::{EditorUi, NoticeLevel};

/// One line of the track-mode stdout protocol.
#[derive(Serialize)]
#[serde(tag = "update", rename_all = "snake_case")]
enum UpdateLine<'a> {
    Status { line: &'a str },
    Notice { level: NoticeLevel, message: &'a str },
}

/// Host surface for `penpace track`: status pushes and notices go to the
/// editor plugin as JSON lines. Track mode never prompts, so the prompt
/// methods always report dismissal.
pub struct PipeUi<W> {
    out: W,
}

impl PipeUi<Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> PipeUi<W> {
    fn emit(&mut self, update: UpdateLine<'_>) {
        let line = match serde_json::to_string(&update) {
            Ok(line) => line,
            Err(e) => {
                error!("Couldn't encode update line: {e}");
                return;
            }
        };
        // A broken pipe means the editor hung up; the feed will hit EOF and
        // wind the tracker down, so there is nothing to recover here.
        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            error!("Couldn't write update line: {e}");
        }
    }
}

impl<W: Write> EditorUi for PipeUi<W> {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.emit(UpdateLine::Notice { level, message });
    }

    fn show_status(&mut self, line: &str) {
        self.emit(UpdateLine::Status { line });
    }

    fn show_lines(&mut self, lines: &[String]) {
        // No dismissible surface on this side of the pipe.
        debug!("Dropping {} line(s) aimed at a dismissible surface", lines.len());
    }

    fn select(&mut self, _title: &str, _options: &[String]) -> Result<Option<usize>> {
        Ok(None)
    }

    fn input(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(false)
    }
}
