//! Per-project writing-progress tracker that sits behind a text editor.
//! Typed characters start out as pending entries, survive an undo grace
//! period, then get committed into a daily challenge count. The same binary
//! serves the one-shot commands and the long-running `track` mode an editor
//! plugin talks to over stdin/stdout.

pub mod cli;
pub mod config;
pub mod editor;
pub mod store;
pub mod tracker;
pub mod utils;
