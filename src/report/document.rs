//! Append-only report document

use super::block::{Block, ReportTable};
use super::render;
use serde::{Deserialize, Serialize};

/// Default heading level of [`ReportDocument::add_section`] callers
pub const SECTION_LEVEL: u8 = 2;

/// An ordered sequence of blocks under a title and introduction.
///
/// Blocks are only ever appended; serialization is a pure function of the
/// title, introduction and block sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    title: String,
    introduction: String,
    blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>, introduction: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            introduction: introduction.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn introduction(&self) -> &str {
        &self.introduction
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Heading level is clamped to 1..=6
    pub fn add_section(&mut self, title: impl Into<String>, level: u8) -> &mut Self {
        self.push(Block::Section {
            title: title.into(),
            level: level.clamp(1, 6),
        })
    }

    pub fn add_question(&mut self, id: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.push(Block::QuestionHeader {
            id: id.into(),
            text: text.into(),
        })
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Block::Paragraph { text: text.into() })
    }

    pub fn add_code_block(&mut self, code: impl Into<String>, language: impl Into<String>) -> &mut Self {
        self.push(Block::CodeBlock {
            code: code.into(),
            language: language.into(),
        })
    }

    pub fn add_table(&mut self, table: ReportTable, title: Option<&str>) -> &mut Self {
        self.push(Block::Table {
            table,
            title: title.map(str::to_string),
        })
    }

    pub fn add_image(&mut self, title: impl Into<String>, path: impl Into<String>) -> &mut Self {
        self.push(Block::Image {
            title: title.into(),
            path: path.into(),
        })
    }

    fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Render as Markdown
    pub fn serialize(&self) -> String {
        render::render_markdown(self)
    }
}
