//! End-to-end pipeline: derive, filter, aggregate, report
//!
//! Stages run strictly in sequence. Derivation and filtering failures abort
//! the run; aggregation failures are isolated inside the report.

mod eda;
mod render;

pub use eda::build_report;
pub use render::{
    central_tendency_table, format_float, format_stat, grouped_table, leaderboard_table,
    matrix_table, proportions_table, variability_table, CellFormat,
};

use crate::config::{ConfigError, PipelineConfig};
use crate::derive::FeatureDeriver;
use crate::filter::{check_consistency, ConsistencyFinding, FilterReport, ObservationPoint};
use crate::report::ReportDocument;
use crate::table::{CleanedTable, RawTable, SchemaError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Output of the derive and filter stages
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Row count of the raw input
    pub input_rows: usize,
    pub cleaned: CleanedTable,
    pub filter_report: FilterReport,
    /// Consistency findings observed before filtering
    pub audit: Vec<ConsistencyFinding>,
    /// Consistency findings observed on the cleaned table
    pub findings: Vec<ConsistencyFinding>,
}

/// Cleaned data plus the rendered report
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub prepared: PreparedData,
    pub report: ReportDocument,
}

/// A configured pipeline
pub struct Pipeline {
    config: PipelineConfig,
    deriver: FeatureDeriver,
}

impl Pipeline {
    /// Fails when the config does not validate
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            deriver: FeatureDeriver::new(),
        })
    }

    /// Replace the feature deriver (e.g. to swap the sentiment strategy)
    pub fn with_deriver(mut self, deriver: FeatureDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Derive features, audit, filter and re-check consistency
    pub fn prepare(&self, raw: &RawTable) -> PipelineResult<PreparedData> {
        info!(rows = raw.len(), columns = raw.columns().len(), "deriving features");
        let derived = self.deriver.derive(raw)?;

        let audit = check_consistency(derived.rows(), ObservationPoint::PreFilter);
        let (cleaned, filter_report) = self.config.filter_policy().apply(derived);
        let findings = check_consistency(cleaned.rows(), ObservationPoint::PostFilter);

        for finding in audit.iter().chain(&findings).filter(|f| f.row_count > 0) {
            debug!(
                check = finding.check.name(),
                observed_at = %finding.observed_at,
                rows = finding.row_count,
                "consistency finding"
            );
        }

        Ok(PreparedData {
            input_rows: raw.len(),
            cleaned,
            filter_report,
            audit,
            findings,
        })
    }

    /// Prepare the data and build the exploratory report
    pub fn run(&self, raw: &RawTable) -> PipelineResult<PipelineOutput> {
        let prepared = self.prepare(raw)?;
        let report = build_report(&prepared, &self.config);
        info!(
            blocks = report.len(),
            rows = prepared.cleaned.len(),
            "report built"
        );
        Ok(PipelineOutput { prepared, report })
    }
}
