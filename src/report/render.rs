//! Markdown serialization

use super::block::{Block, ReportTable};
use super::document::ReportDocument;
use std::fmt::Write;

/// Placeholder for a table without data rows
pub const EMPTY_TABLE: &str = "No data to display.";

/// Render a document. Every block is followed by one blank line.
pub fn render_markdown(doc: &ReportDocument) -> String {
    let mut out = String::new();
    let _ = write!(out, "# {}\n\n{}\n\n", doc.title(), doc.introduction());
    for block in doc.blocks() {
        render_block(&mut out, block);
    }
    out
}

fn render_block(out: &mut String, block: &Block) {
    // Writing to a String cannot fail
    let _ = match block {
        Block::Section { title, level } => {
            write!(out, "{} {}\n\n", "#".repeat(*level as usize), title)
        }
        Block::QuestionHeader { id, text } => write!(out, "### Question {}: {}\n\n", id, text),
        Block::Paragraph { text } => write!(out, "{}\n\n", text),
        Block::CodeBlock { code, language } => write!(out, "```{}\n{}\n```\n\n", language, code),
        Block::Table { table, title } => {
            if let Some(title) = title {
                let _ = write!(out, "**{}**\n\n", title);
            }
            if table.is_empty() {
                write!(out, "{}\n\n", EMPTY_TABLE)
            } else {
                render_table(out, table);
                out.push('\n');
                Ok(())
            }
        }
        Block::Image { title, path } => write!(out, "**{}**\n\n![{}]({})\n\n", title, title, path),
    };
}

fn render_table(out: &mut String, table: &ReportTable) {
    push_line(out, table.headers.iter().map(|h| escape_cell(h)));
    push_line(out, table.headers.iter().map(|_| "---".to_string()));
    for row in &table.rows {
        push_line(out, row.iter().map(|c| escape_cell(c)));
    }
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>) {
    let cells: Vec<String> = cells.collect();
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

/// Keep a cell on one line and out of the column separators
pub fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_text_blocks() {
        let mut doc = ReportDocument::new("EDA Report", "Intro text.");
        doc.add_section("Data Loading", 2)
            .add_question("a", "Load the dataset.")
            .add_text("Loaded.");
        assert_eq!(
            doc.serialize(),
            "# EDA Report\n\nIntro text.\n\n## Data Loading\n\n### Question a: Load the dataset.\n\nLoaded.\n\n"
        );
    }

    #[test]
    fn test_table_rendering() {
        let mut doc = ReportDocument::new("T", "I");
        let table = ReportTable::new(["User ID", "Count"]).with_row(["u|1", "3"]);
        doc.add_table(table, Some("Top Users"));
        assert_eq!(
            doc.serialize(),
            "# T\n\nI\n\n**Top Users**\n\n| User ID | Count |\n| --- | --- |\n| u\\|1 | 3 |\n\n"
        );
    }

    #[test]
    fn test_empty_table_placeholder() {
        let mut doc = ReportDocument::new("T", "I");
        doc.add_table(ReportTable::new(["x"]), None);
        assert_eq!(doc.serialize(), "# T\n\nI\n\nNo data to display.\n\n");
    }

    #[test]
    fn test_code_and_image_blocks() {
        let mut doc = ReportDocument::new("T", "I");
        doc.add_code_block("SELECT 1;", "sql")
            .add_image("Histogram of length", "./images/hist_length.png");
        assert_eq!(
            doc.serialize(),
            "# T\n\nI\n\n```sql\nSELECT 1;\n```\n\n**Histogram of length**\n\n![Histogram of length](./images/hist_length.png)\n\n"
        );
    }

    #[test]
    fn test_multiline_cells_stay_on_one_row() {
        assert_eq!(escape_cell("a\nb\r\nc"), "a<br>b<br>c");
    }

    #[test]
    fn test_identical_documents_serialize_identically() {
        let build = || {
            let mut doc = ReportDocument::new("T", "I");
            doc.add_section("S", 3)
                .add_table(ReportTable::new(["k", "v"]).with_row(["a", "1"]), None);
            doc
        };
        assert_eq!(build().serialize(), build().serialize());
    }
}
