use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

use anyhow::Result;

use super::{EditorUi, NoticeLevel};

/// Interactive terminal surface used by the one-shot commands.
pub struct ConsoleUi<R, W> {
    input: R,
    out: W,
}

impl ConsoleUi<BufReader<Stdin>, Stdout> {
    pub fn terminal() -> Self {
        Self {
            input: BufReader::new(std::io::stdin()),
            out: std::io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsoleUi<R, W> {
    fn read_reply(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut reply = String::new();
        self.input.read_line(&mut reply)?;
        Ok(reply.trim().to_string())
    }
}

impl<R: BufRead, W: Write> EditorUi for ConsoleUi<R, W> {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let _ = match level {
            NoticeLevel::Info => writeln!(self.out, "{message}"),
            NoticeLevel::Warn => writeln!(self.out, "Warning: {message}"),
            NoticeLevel::Error => writeln!(self.out, "Error: {message}"),
        };
    }

    fn show_status(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
    }

    fn show_lines(&mut self, lines: &[String]) {
        for line in lines {
            let _ = writeln!(self.out, "{line}");
        }
    }

    fn select(&mut self, title: &str, options: &[String]) -> Result<Option<usize>> {
        writeln!(self.out, "{title}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.out, "  {}) {option}", index + 1)?;
        }

        let reply = self.read_reply(&format!("Choice (1-{}, empty cancels): ", options.len()))?;
        // Anything that isn't a listed number counts as a dismissal.
        let choice = match reply.parse::<usize>() {
            Ok(v) if (1..=options.len()).contains(&v) => Some(v - 1),
            _ => None,
        };
        Ok(choice)
    }

    fn input(&mut self, prompt: &str) -> Result<Option<String>> {
        let reply = self.read_reply(&format!("{prompt}: "))?;
        if reply.is_empty() {
            return Ok(None);
        }
        Ok(Some(reply))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let reply = self.read_reply(&format!("{question} [y/N]: "))?;
        Ok(matches!(reply.as_str(), "y" | "Y" | "yes" | "Yes"))
    }
}
