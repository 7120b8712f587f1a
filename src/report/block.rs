//! Report blocks and tables

use serde::{Deserialize, Serialize};

/// A rectangular table of display strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells and long rows
    /// truncated so the table stays rectangular.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    /// A table with no data rows renders as "No data to display."
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One element of a report, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { title: String, level: u8 },
    QuestionHeader { id: String, text: String },
    Paragraph { text: String },
    CodeBlock { code: String, language: String },
    Table { table: ReportTable, title: Option<String> },
    /// Reference to an externally produced chart
    Image { title: String, path: String },
}
