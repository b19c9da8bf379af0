//! Durable progress state. The basic idea is:
//!  - Every project keeps one JSON document under `.penpace/`.
//!  - The document is the source of truth, re-read whenever a tracked
//!    buffer is entered and overwritten after every mutation.
//!  - A missing or broken document degrades to a fresh default instead of
//!    surfacing an error.

pub mod progress_store;
pub mod state;
