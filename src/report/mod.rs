//! Structured report document model
//!
//! A [`ReportDocument`] is an append-only list of [`Block`]s that renders
//! to Markdown deterministically.

mod block;
mod document;
mod outline;
mod render;

pub use block::{Block, ReportTable};
pub use document::{ReportDocument, SECTION_LEVEL};
pub use outline::{outline, question_ids, Heading};
pub use render::{escape_cell, render_markdown, EMPTY_TABLE};
