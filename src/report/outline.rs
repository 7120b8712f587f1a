//! Heading outline of a rendered report
//!
//! Parses Markdown with `pulldown-cmark` and collects headings in order.
//! Used to summarize a written report and to check that rendering produced
//! the intended structure.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// A heading found in Markdown text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Every heading of `markdown`, in document order
pub fn outline(markdown: &str) -> Vec<Heading> {
    let parser = Parser::new_ext(markdown, Options::all());
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u8, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    headings.push(Heading {
                        level,
                        text: text.trim().to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    headings
}

/// Question ids (`### Question {id}: ...`) in document order
pub fn question_ids(markdown: &str) -> Vec<String> {
    outline(markdown)
        .into_iter()
        .filter(|h| h.level == 3)
        .filter_map(|h| {
            let rest = h.text.strip_prefix("Question ")?;
            let (id, _) = rest.split_once(':')?;
            Some(id.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportDocument, ReportTable};

    #[test]
    fn test_outline_of_rendered_document() {
        let mut doc = ReportDocument::new("EDA", "intro");
        doc.add_section("h: Visualizations", 2)
            .add_question("h.1", "Quantities")
            .add_table(ReportTable::new(["Category", "Count"]).with_row(["Groups", "3"]), Some("Totals"))
            .add_question("h.2", "Text vs media")
            .add_section("Analysis of 'length'", 3);

        let headings = outline(&doc.serialize());
        let pairs: Vec<(u8, &str)> = headings.iter().map(|h| (h.level, h.text.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (1, "EDA"),
                (2, "h: Visualizations"),
                (3, "Question h.1: Quantities"),
                (3, "Question h.2: Text vs media"),
                (3, "Analysis of 'length'"),
            ]
        );
        assert_eq!(question_ids(&doc.serialize()), vec!["h.1", "h.2"]);
    }

    #[test]
    fn test_heading_with_inline_code() {
        let headings = outline("## Load `data.csv`\n\ntext\n");
        assert_eq!(headings[0].text, "Load data.csv");
    }
}
