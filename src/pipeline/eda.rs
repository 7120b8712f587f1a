//! The exploratory report
//!
//! Sections follow a fixed order: cleaning summary, consistency audit,
//! per-column statistics (e), numeric pairs (f), categorical pairs (g) and
//! the message questions (h.1 to h.40). Each question is answered from one
//! or more independent queries; a failing query is rendered as a
//! `skipped: <reason>` paragraph and the report carries on.

use super::render::{
    central_tendency_table, format_stat, grouped_table, leaderboard_table, matrix_table,
    proportions_table, variability_table, CellFormat,
};
use super::PreparedData;
use crate::config::PipelineConfig;
use crate::filter::ConsistencyFinding;
use crate::query::{
    self, FrequencyTable, Granularity, Leaderboard, NormalityOutcome, QueryError, QueryResult, RepeatRanking,
    RepeatedMessage, TextMatch,
};
use crate::report::{ReportDocument, ReportTable, SECTION_LEVEL};
use crate::table::{columns, CleanedTable, SentimentClass};
use std::fmt::Display;
use tracing::warn;

const PREVIEW_ROWS: usize = 5;
const TOP_MEDIA_TYPES: usize = 10;
const ACTIVE_USERS_SHOWN: usize = 10;

const MEDIA_LABELS: [(&str, &str); 2] = [("false", "Text Only"), ("true", "With Media")];
const URL_LABELS: [(&str, &str); 2] = [("false", "Without URL"), ("true", "With URL")];
const VIRAL_LABELS: [(&str, &str); 2] = [("false", "Non-Viral"), ("true", "Viral")];
const SENTIMENT_LABELS: [(&str, &str); 3] = [("1", "Positive"), ("0", "Neutral"), ("-1", "Negative")];

/// Build the full exploratory report from prepared data
pub fn build_report(prepared: &PreparedData, config: &PipelineConfig) -> ReportDocument {
    let mut doc = ReportDocument::new(config.title.as_str(), config.introduction.as_str());
    let table = &prepared.cleaned;

    cleaning_section(&mut doc, prepared, config);
    consistency_section(&mut doc, prepared);
    numeric_section(&mut doc, table, config);
    categorical_section(&mut doc, table, config);
    message_section(&mut doc, table, config);
    doc
}

fn skipped(doc: &mut ReportDocument, reason: &dyn Display) {
    warn!(reason = %reason, "aggregation skipped");
    doc.add_text(format!("skipped: {}", reason));
}

/// Render `result` with `render`, or a skipped paragraph on failure
fn answer<T>(doc: &mut ReportDocument, result: QueryResult<T>, render: impl FnOnce(&mut ReportDocument, T)) {
    match result {
        Ok(value) => render(doc, value),
        Err(err) => skipped(doc, &err),
    }
}

/// A leaderboard table, or `empty_note` when it has no entries
fn board_or_note(doc: &mut ReportDocument, board: &Leaderboard, headers: (&str, &str), title: &str, empty_note: &str) {
    if board.is_empty() {
        doc.add_text(empty_note);
    } else {
        doc.add_table(leaderboard_table(board, headers.0, headers.1), Some(title));
    }
}

fn preview_table(table: &CleanedTable, n: usize) -> ReportTable {
    let headers = table.columns();
    let mut preview = ReportTable::new(headers.iter().cloned());
    for row in table.rows().iter().take(n) {
        preview.push_row(headers.iter().map(|c| row.value(c).to_string()));
    }
    preview
}

fn removal_note(removed: Option<usize>, what: &str) -> String {
    match removed {
        Some(n) => format!("Removed {} rows {}.", n, what),
        None => "Filter disabled.".to_string(),
    }
}

fn cleaning_section(doc: &mut ReportDocument, prepared: &PreparedData, config: &PipelineConfig) {
    let report = &prepared.filter_report;
    let table = &prepared.cleaned;

    doc.add_section("Data Loading and Initial Cleaning", SECTION_LEVEL);
    doc.add_question("a", "Load the dataset.")
        .add_text(format!("Loaded {} rows.", prepared.input_rows));

    let marker = config.banned_marker.as_deref().unwrap_or_default();
    doc.add_question("b", format!("Remove '{}'.", marker))
        .add_text(removal_note(report.banned_removed, &format!("containing '{}'", marker)));

    doc.add_question("c", "Remove duplicate rows.")
        .add_text(removal_note(report.duplicates_removed, "duplicating an earlier row"));

    let min_words = config.min_words.unwrap_or_default();
    doc.add_question("d", format!("Remove texts with less than {} words.", min_words))
        .add_text(removal_note(
            report.short_removed,
            &format!("with less than {} words", min_words),
        ));

    doc.add_text(format!(
        "Data cleaned. Final shape: **({}, {})**",
        table.len(),
        table.columns().len()
    ));
    doc.add_table(preview_table(table, PREVIEW_ROWS), Some("Preview"));
}

fn findings_rows(out: &mut ReportTable, findings: &[ConsistencyFinding]) {
    for finding in findings {
        let sample: Vec<String> = finding.sample.iter().map(|id| id.to_string()).collect();
        out.push_row([
            finding.check.name().to_string(),
            finding.observed_at.to_string(),
            finding.row_count.to_string(),
            sample.join(", "),
        ]);
    }
}

fn consistency_section(doc: &mut ReportDocument, prepared: &PreparedData) {
    doc.add_section("Data Consistency Checks", SECTION_LEVEL);
    let mut table = ReportTable::new(["Check", "Observed At", "Rows", "Sample Row Ids"]);
    findings_rows(&mut table, &prepared.audit);
    findings_rows(&mut table, &prepared.findings);
    doc.add_table(table, Some("Flag/Value Contradictions"));
}

fn numeric_section(doc: &mut ReportDocument, table: &CleanedTable, config: &PipelineConfig) {
    doc.add_section("e: Numerical Attribute Analysis", SECTION_LEVEL);
    let numeric: Vec<String> = config
        .numeric_columns
        .clone()
        .unwrap_or_else(|| query::numeric_columns(table));
    if numeric.is_empty() {
        doc.add_text("No numeric columns to analyse.");
    }

    for col in &numeric {
        doc.add_section(format!("Analysis of '{}'", col), 3);
        let summary = query::numeric_summary(table, col);

        doc.add_question("e.1", "Measures of Central Tendency");
        answer(doc, summary.clone(), |doc, s| {
            doc.add_table(central_tendency_table(&s), Some("Central Tendency"));
        });

        doc.add_question("e.2", "Measures of Variability");
        answer(doc, summary, |doc, s| {
            doc.add_table(variability_table(&s), Some("Variability"));
        });

        doc.add_question("e.3", "Frequency Table and Histogram");
        answer(
            doc,
            query::frequency_table(table, col, config.cardinality_threshold),
            |doc, outcome| match outcome {
                FrequencyTable::Counts(counts) => {
                    doc.add_table(grouped_table(&counts, col), Some("Frequency Table"));
                }
                FrequencyTable::SkippedHighCardinality { distinct } => {
                    doc.add_text(format!("skipped: high cardinality ({} distinct values)", distinct));
                }
            },
        );
        doc.add_image(
            format!("Histogram of {}", col),
            config.image_path(&format!("hist_{}.png", col)),
        );

        doc.add_question("e.4", "Boxplot").add_image(
            format!("Boxplot of {}", col),
            config.image_path(&format!("box_{}.png", col)),
        );

        doc.add_question("e.5", "QQ-Plot").add_image(
            format!("QQ-Plot of {}", col),
            config.image_path(&format!("qq_{}.png", col)),
        );

        doc.add_question("e.6", "Test of Normality (Shapiro-Wilk)");
        answer(
            doc,
            query::normality_test(table, col, config.normality_ceiling),
            |doc, outcome| match outcome {
                NormalityOutcome::Tested(result) => {
                    doc.add_text(format!(
                        "Shapiro-Wilk Test: Statistic={:.3}, p={:.3}",
                        result.w, result.p_value
                    ));
                    doc.add_text(if result.looks_gaussian() {
                        "Sample looks Gaussian (fail to reject H0)."
                    } else {
                        "Sample does not look Gaussian (reject H0)."
                    });
                }
                NormalityOutcome::Skipped(reason) => {
                    doc.add_text(format!("Shapiro-Wilk test not run: {}.", reason));
                }
            },
        );

        doc.add_question("e.7", "Best Fit Distribution");
        doc.add_text("No distribution is fitted. Use the histogram and QQ-plot above for a visual reading of the shape.");
    }

    doc.add_section("f: Numerical Pair Analysis", SECTION_LEVEL);
    doc.add_question("f.1", "Appropriate Correlation Coefficient");
    let cols: Vec<&str> = numeric.iter().map(String::as_str).collect();
    answer(doc, query::pearson_matrix(table, &cols), |doc, matrix| {
        doc.add_text("Pearson correlation over pairwise-complete rows. Cells with a constant side are undefined.");
        doc.add_table(
            matrix_table(&matrix, "", CellFormat::Coefficients),
            Some("Pearson Correlation Matrix"),
        );
    });
    doc.add_question("f.2", "Scatter Plot (Heatmap for overview)")
        .add_image("Pearson Correlation Heatmap", config.image_path("correlation_heatmap.png"));
}

fn categorical_section(doc: &mut ReportDocument, table: &CleanedTable, config: &PipelineConfig) {
    doc.add_section("g: Categorical Pair Analysis", SECTION_LEVEL);
    doc.add_question("g.1", "Cramér's V Method Result");

    let present: Vec<&str> = config
        .categorical_columns
        .iter()
        .map(String::as_str)
        .filter(|c| table.has_column(c) && table.rows().iter().any(|r| !r.value(c).is_null()))
        .collect();

    if present.len() < 2 {
        doc.add_text("Not enough categorical columns with data for Cramér's V analysis.");
        return;
    }

    answer(
        doc,
        query::cramers_v_matrix(table, &present, config.association_sample_size, config.seed),
        |doc, matrix| {
            doc.add_table(
                matrix_table(&matrix, "", CellFormat::Coefficients),
                Some("Cramér's V Matrix for Categorical Attributes"),
            );
            doc.add_image("Cramér's V Heatmap", config.image_path("cramers_v_heatmap.png"));
        },
    );
}

/// Authors ranked by messages with (or without) media
fn sharers(table: &CleanedTable, n: usize, with_media: bool) -> QueryResult<Leaderboard> {
    if !table.has_column(columns::HAS_MEDIA) {
        return Err(QueryError::ColumnNotFound(columns::HAS_MEDIA.to_string()));
    }
    query::leaderboard_where(table, columns::AUTHOR, n, |r| {
        r.row.flag(columns::HAS_MEDIA) == Some(with_media)
    })
}

fn repeated_table(messages: &[RepeatedMessage], value_header: &str, by_groups: bool) -> ReportTable {
    let mut table = ReportTable::new(["User ID", "Message Text", value_header]);
    for m in messages {
        let value = if by_groups { m.groups } else { m.posts };
        table.push_row([m.author.clone(), m.text.clone(), value.to_string()]);
    }
    table
}

fn text_table(texts: impl IntoIterator<Item = String>) -> ReportTable {
    let mut table = ReportTable::new(["Message Text"]);
    for text in texts {
        table.push_row([text]);
    }
    table
}

fn length_table(matches: &[TextMatch]) -> ReportTable {
    let mut table = ReportTable::new(["Message Text", "Length"]);
    for m in matches {
        table.push_row([m.text.clone(), m.length.to_string()]);
    }
    table
}

fn message_section(doc: &mut ReportDocument, table: &CleanedTable, config: &PipelineConfig) {
    let n = config.leaderboard_size;
    doc.add_section("h: Message Analysis", SECTION_LEVEL);

    doc.add_question("h.1", "Quantities of groups, users, and messages");
    let quantities = (|| -> QueryResult<ReportTable> {
        Ok(ReportTable::new(["Category", "Count"])
            .with_row(["Groups".to_string(), query::distinct_count(table, columns::GROUP)?.to_string()])
            .with_row(["Users".to_string(), query::distinct_count(table, columns::AUTHOR)?.to_string()])
            .with_row(["Messages".to_string(), query::total_rows(table).to_string()]))
    })();
    answer(doc, quantities, |doc, t| {
        doc.add_table(t, Some("Total Quantities"));
        doc.add_image("Total Quantities", config.image_path("h1_summary_quantities.png"));
    });

    doc.add_question("h.2", "Quantity of messages with only text vs. with media");
    answer(doc, query::group_counts(table, columns::HAS_MEDIA), |doc, counts| {
        doc.add_table(proportions_table(&counts, "Type", &MEDIA_LABELS), Some("Text vs. Media"));
        doc.add_image("Text vs. Media Proportion", config.image_path("h2_text_vs_media_pie.png"));
    });

    doc.add_question("h.3", "Quantity of messages by media type");
    answer(doc, query::leaderboard(table, columns::MEDIA_TYPE, TOP_MEDIA_TYPES), |doc, board| {
        if board.is_empty() {
            doc.add_text("No media types found to plot.");
        } else {
            doc.add_table(leaderboard_table(&board, "Media Type", "Count"), Some("Top 10 Media Types"));
            doc.add_image("Top 10 Media Types", config.image_path("h3_media_type_counts.png"));
        }
    });

    doc.add_question("h.4", "Relationship between message count and word count");
    answer(
        doc,
        query::pearson_matrix(table, &[columns::WORD_COUNT, columns::LENGTH]),
        |doc, matrix| {
            doc.add_text(format!(
                "Pearson correlation between word count and length: {}",
                format_stat(matrix.get(columns::WORD_COUNT, columns::LENGTH))
            ));
            doc.add_image(
                "Message Length (Characters vs. Words)",
                config.image_path("h4_word_char_scatter.png"),
            );
        },
    );

    doc.add_question("h.5-h.9", "Location-based analysis (State, Country, Brazil vs. Foreign)")
        .add_text("These questions require location data (state, country), which the export does not carry.");

    doc.add_question("h.10", format!("Top {} most repeated URLs", n));
    answer(doc, query::leaderboard(table, columns::MEDIA_URL, n), |doc, board| {
        board_or_note(doc, &board, ("URL", "Count"), "Top URLs", "No URLs found to list.");
    });

    doc.add_question("h.11", format!("Top {} most repeated domains", n));
    answer(doc, query::domain_leaderboard(table, n), |doc, board| {
        board_or_note(doc, &board, ("Domain", "Count"), "Top Domains", "No domains found to list.");
    });

    doc.add_question("h.12", format!("Top {} most active users", n));
    answer(doc, query::leaderboard(table, columns::AUTHOR, n), |doc, board| {
        board_or_note(doc, &board, ("User ID", "Message Count"), "Top Active Users", "No active users found.");
    });

    doc.add_question("h.13", "Text vs. media messages for most active users");
    let active = (|| -> QueryResult<ReportTable> {
        let top = query::leaderboard(table, columns::AUTHOR, ACTIVE_USERS_SHOWN)?;
        let media = query::crosstab(table, columns::AUTHOR, columns::HAS_MEDIA)?;
        let mut out = ReportTable::new(["User ID", "Text Only", "With Media", "Total"]);
        for entry in &top.entries {
            let count = |flag: &str| media.get(&entry.key, flag).unwrap_or(0.0) as u64;
            out.push_row([
                entry.key.clone(),
                count("false").to_string(),
                count("true").to_string(),
                entry.value.to_string(),
            ]);
        }
        Ok(out)
    })();
    answer(doc, active, |doc, t| {
        doc.add_table(t, Some("Text vs. Media Messages for Top Active Users"));
        doc.add_image(
            "Text vs. Media Messages for Top Active Users",
            config.image_path("h13_active_users_media.png"),
        );
    });

    doc.add_question("h.14", format!("Top {} users who shared most text messages", n));
    answer(doc, sharers(table, n, false), |doc, board| {
        board_or_note(doc, &board, ("User ID", "Text Message Count"), "Top Text Sharers", "No text sharers found.");
    });

    doc.add_question("h.15", format!("Top {} users who shared most media messages", n));
    answer(doc, sharers(table, n, true), |doc, board| {
        board_or_note(doc, &board, ("User ID", "Media Message Count"), "Top Media Sharers", "No media sharers found.");
    });

    doc.add_question("h.16", format!("Top {} most shared messages", n));
    answer(doc, query::top_texts(table, n), |doc, board| {
        board_or_note(doc, &board, ("Message Text", "Share Count"), "Top Shared Messages", "No shared messages found.");
    });

    doc.add_question("h.17", format!("Top {} messages shared in different groups", n));
    answer(doc, query::spread_across_groups(table, n), |doc, board| {
        board_or_note(
            doc,
            &board,
            ("Message Text", "Unique Group Count"),
            "Top Messages in Different Groups",
            "No messages shared in different groups found.",
        );
    });

    doc.add_question("h.18", "Identical messages shared by the same user (and their quantities)");
    answer(doc, query::repeated_by_author(table, RepeatRanking::ByPosts, n), |doc, repeated| {
        if repeated.is_empty() {
            doc.add_text("No identical messages shared by the same user found.");
        } else {
            doc.add_table(
                repeated_table(&repeated, "Count", false),
                Some("Identical Messages by Same User"),
            );
        }
    });

    doc.add_question(
        "h.19",
        "Identical messages shared by the same user in distinct groups (and their quantities)",
    );
    answer(doc, query::repeated_by_author(table, RepeatRanking::ByGroups, n), |doc, repeated| {
        if repeated.is_empty() {
            doc.add_text("No identical messages shared by the same user in distinct groups found.");
        } else {
            doc.add_table(
                repeated_table(&repeated, "Unique Group Count", true),
                Some("Identical Messages by Same User in Different Groups"),
            );
        }
    });

    doc.add_question("h.20", "Top unigrams, bigrams, and trigrams (after stop word removal)")
        .add_text("N-gram analysis needs tokenization and stop word removal, which this report does not perform.");

    for (id, class, label) in [
        ("h.21", SentimentClass::Positive, "positive"),
        ("h.22", SentimentClass::Negative, "negative"),
    ] {
        doc.add_question(id, format!("Top {} distinct {} messages", n, label));
        answer(doc, query::distinct_texts_by_sentiment(table, class, n), |doc, texts| {
            if texts.is_empty() {
                doc.add_text(format!("No {} messages found.", label));
            } else {
                let title = format!("Distinct {} Messages", class.as_str());
                doc.add_table(text_table(texts), Some(title.as_str()));
            }
        });
    }

    let extremes = query::author_sentiment_extremes(table);
    doc.add_question("h.23", "Most optimistic user");
    answer(doc, extremes.clone(), |doc, ext| match ext.most_optimistic {
        Some(s) => {
            doc.add_table(
                ReportTable::new(["User ID", "Sentiment Sum"]).with_row([s.author, s.score.to_string()]),
                Some("Most Optimistic User"),
            );
        }
        None => {
            doc.add_text("No data to determine most optimistic user.");
        }
    });
    doc.add_question("h.24", "Most pessimistic user");
    answer(doc, extremes, |doc, ext| match ext.most_pessimistic {
        Some(s) => {
            doc.add_table(
                ReportTable::new(["User ID", "Sentiment Sum"]).with_row([s.author, s.score.to_string()]),
                Some("Most Pessimistic User"),
            );
        }
        None => {
            doc.add_text("No data to determine most pessimistic user.");
        }
    });

    let lengths = query::length_extremes(table, n);
    doc.add_question("h.25", format!("Top {} longest messages", n));
    answer(doc, lengths.clone(), |doc, ext| {
        doc.add_table(length_table(&ext.longest), Some("Longest Messages"));
    });
    doc.add_question("h.26", format!("Top {} shortest messages", n));
    answer(doc, lengths, |doc, ext| {
        doc.add_table(length_table(&ext.shortest), Some("Shortest Messages"));
    });

    doc.add_question("h.27", "Day with the highest quantity of messages");
    answer(doc, query::bucket_counts(table, Granularity::Day), |doc, days| {
        match &days.peak {
            Some(peak) => {
                doc.add_table(
                    ReportTable::new(["Date", "Message Count"]).with_row([peak.label.clone(), peak.count.to_string()]),
                    Some("Busiest Day"),
                );
            }
            None => {
                doc.add_text("No data to determine busiest day.");
            }
        }
        if !days.malformed.is_empty() {
            doc.add_text(format!(
                "{} rows with malformed timestamps were excluded.",
                days.malformed.len()
            ));
        }
    });

    let terms: Vec<&str> = config.search_terms.iter().map(String::as_str).collect();
    let quoted: Vec<String> = terms.iter().map(|t| format!("'{}'", t)).collect();
    doc.add_question("h.28", format!("Messages containing {}", quoted.join(" and ")));
    answer(doc, query::search_text(table, &terms, n), |doc, hits| {
        if hits.is_empty() {
            doc.add_text(format!("No messages found containing {}.", quoted.join(" and ")));
        } else {
            doc.add_table(
                text_table(hits.into_iter().map(|h| h.text)),
                Some("Matching Messages"),
            );
        }
    });

    doc.add_question("h.29", "Quantity of messages by day and hour");
    answer(doc, query::bucket_counts(table, Granularity::Hour), |doc, hours| {
        if let Some(peak) = &hours.peak {
            doc.add_text(format!("Busiest hour: {} ({} messages).", peak.label, peak.count));
        }
        doc.add_image(
            "Message Count by Day and Hour",
            config.image_path("h29_messages_by_day_hour.png"),
        );
    });

    doc.add_question("h.30", "Quantity of messages by hour (daily pattern)");
    answer(doc, query::hour_of_day_profile(table), |doc, profile| {
        let mut t = ReportTable::new(["Hour", "Message Count"]);
        for (hour, count) in profile.counts.iter().enumerate() {
            t.push_row([hour.to_string(), count.to_string()]);
        }
        doc.add_table(t, Some("Messages by Hour of Day"));
        doc.add_image(
            "Message Count by Hour of Day",
            config.image_path("h30_messages_by_hour.png"),
        );
    });

    doc.add_question("h.31", "Word cloud of text messages (after stop word removal)")
        .add_text("Word clouds need stop word removal and chart rendering, which this report does not perform.");
    doc.add_question("h.32", "Interactive word network of text messages (after stop word removal)")
        .add_text("Word networks need tokenization and graph rendering, which this report does not perform.");

    doc.add_question("h.33", "Proportion of messages with and without URL");
    answer(doc, query::group_counts(table, columns::HAS_MEDIA_URL), |doc, counts| {
        doc.add_table(proportions_table(&counts, "Type", &URL_LABELS), Some("URL Proportion"));
        doc.add_image(
            "Proportion of Messages With and Without URL",
            config.image_path("h33_url_proportion.png"),
        );
    });

    let bands = &config.misinformation;
    doc.add_question("h.34", "Proportion of misinformation");
    answer(doc, query::misinformation_counts(table, bands), |doc, counts| {
        doc.add_text(format!(
            "Scores above {} are misinformation, below {} are not, and scores in between are neutral. Missing scores are unknown.",
            bands.upper, bands.lower
        ));
        doc.add_table(proportions_table(&counts, "Category", &[]), Some("Misinformation Categories"));
        doc.add_image(
            "Proportion of Misinformation Categories",
            config.image_path("h34_misinformation_proportion.png"),
        );
    });

    doc.add_question("h.35", "Proportion of messages containing media and misinformation");
    answer(
        doc,
        query::misinformation_crosstab(table, columns::HAS_MEDIA, bands),
        |doc, matrix| {
            doc.add_table(
                matrix_table(&matrix, columns::HAS_MEDIA, CellFormat::Counts),
                Some("Media vs. Misinformation Counts"),
            );
        },
    );

    doc.add_question("h.36", "Distribution of messages by misinformation score");
    answer(doc, query::numeric_summary(table, columns::SCORE_MISINFORMATION), |doc, summary| {
        doc.add_table(central_tendency_table(&summary), Some("Misinformation Score Summary"));
        doc.add_image(
            "Distribution of Misinformation Score",
            config.image_path("h36_misinfo_score_distribution.png"),
        );
    });

    doc.add_question("h.37", "Proportion of sentiments");
    answer(doc, query::group_counts(table, columns::SENTIMENT), |doc, counts| {
        doc.add_table(proportions_table(&counts, "Sentiment", &SENTIMENT_LABELS), Some("Sentiments"));
        doc.add_image("Proportion of Sentiments", config.image_path("h37_sentiment_proportion.png"));
    });

    doc.add_question("h.38", "Distribution of messages by sentiment score");
    answer(doc, query::numeric_summary(table, columns::SCORE_SENTIMENT), |doc, summary| {
        doc.add_table(central_tendency_table(&summary), Some("Sentiment Score Summary"));
        doc.add_image(
            "Distribution of Sentiment Score",
            config.image_path("h38_sentiment_score_distribution.png"),
        );
    });

    doc.add_question("h.39", "Proportion of viral vs. non-viral messages");
    answer(doc, query::group_counts(table, columns::IS_VIRAL), |doc, counts| {
        doc.add_table(proportions_table(&counts, "Type", &VIRAL_LABELS), Some("Virality"));
        doc.add_image(
            "Proportion of Viral vs. Non-Viral Messages",
            config.image_path("h39_viral_proportion.png"),
        );
    });

    doc.add_question("h.40", "Additional important insights not explicitly requested")
        .add_text("The temporal trend of misinformation scores could reveal campaigns tied to events. Bucketing scores by day with the same temporal queries used above is a natural next analysis.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::report::{question_ids, Block};
    use crate::table::{RawTable, Value};

    fn raw_messages() -> RawTable {
        let mut table = RawTable::new([
            columns::AUTHOR,
            columns::GROUP,
            columns::TEXT,
            columns::HAS_MEDIA,
            columns::TIMESTAMP,
            columns::SCORE_MISINFORMATION,
        ]);
        let rows = [
            ("u1", "g1", "bom dia a todos do grupo", false, "2022-10-01 08:00:00", 0.9),
            ("u1", "g2", "bom dia a todos do grupo", false, "2022-10-01 09:00:00", 0.9),
            ("u2", "g1", "isso é um problema muito sério", true, "2022-10-02 10:00:00", 0.1),
            ("u3", "g1", "trava-zaps trava-zaps trava-zaps trava-zaps trava-zaps", false, "2022-10-02 10:00:00", 0.5),
        ];
        for (author, group, text, media, ts, score) in rows {
            table.push_pairs([
                (columns::AUTHOR, Value::text(author)),
                (columns::GROUP, Value::text(group)),
                (columns::TEXT, Value::text(text)),
                (columns::HAS_MEDIA, Value::Bool(media)),
                (columns::TIMESTAMP, Value::text(ts)),
                (columns::SCORE_MISINFORMATION, Value::Float(score)),
            ]);
        }
        table
    }

    fn report_for(table: &RawTable) -> String {
        Pipeline::new(PipelineConfig::default())
            .unwrap()
            .run(table)
            .unwrap()
            .report
            .serialize()
    }

    #[test]
    fn test_questions_appear_in_fixed_order() {
        let ids = question_ids(&report_for(&raw_messages()));
        let h: Vec<&str> = ids.iter().map(String::as_str).filter(|id| id.starts_with("h.")).collect();
        assert_eq!(h.first(), Some(&"h.1"));
        assert_eq!(h.last(), Some(&"h.40"));
        assert_eq!(&ids[..4], &["a", "b", "c", "d"]);
    }

    #[test]
    fn test_cleaning_counts_reported() {
        let md = report_for(&raw_messages());
        assert!(md.contains("Removed 1 rows containing 'trava-zaps'."));
        assert!(md.contains("Removed 0 rows duplicating an earlier row."));
    }

    #[test]
    fn test_missing_column_becomes_skipped_paragraph() {
        let md = report_for(&raw_messages());
        // no media_url column in the export
        assert!(md.contains("skipped: column 'media_url' not found"));
        assert!(md.contains("### Question h.40"));
    }

    #[test]
    fn test_cross_group_message_ranked_first() {
        let output = Pipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&raw_messages())
            .unwrap();
        let tables: Vec<&ReportTable> = output
            .report
            .blocks()
            .iter()
            .filter_map(|b| match b {
                Block::Table { table, title: Some(t) } if t == "Top Messages in Different Groups" => Some(table),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0], vec!["1", "bom dia a todos do grupo", "2"]);
    }

    #[test]
    fn test_score_distributions_carry_summary_table() {
        let output = Pipeline::new(PipelineConfig::default())
            .unwrap()
            .run(&raw_messages())
            .unwrap();
        let summary = |name: &str| {
            output.report.blocks().iter().find_map(|b| match b {
                Block::Table { table, title: Some(t) } if t == name => Some(table.clone()),
                _ => None,
            })
        };

        // banned row with score 0.5 is gone before aggregation
        let misinfo = summary("Misinformation Score Summary").unwrap();
        assert_eq!(misinfo.headers, vec!["mean", "median", "count"]);
        assert_eq!(misinfo.rows, vec![vec!["0.6333", "0.9000", "3"]]);

        // no sentiment score column in the export
        assert!(summary("Sentiment Score Summary").is_none());
        assert!(report_for(&raw_messages()).contains("skipped: column 'score_sentiment' not found"));
    }

    #[test]
    fn test_report_is_deterministic() {
        assert_eq!(report_for(&raw_messages()), report_for(&raw_messages()));
    }
}
