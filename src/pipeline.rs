use crate::config::EtlConfig;
use crate::error::Result;
use crate::extract::{extract, PageSource};
use crate::load::{load_to_csv, load_to_db};
use crate::progress::ProgressSink;
use crate::query::{run_query, QueryResult};
use crate::transform::transform;
use crate::types::{BankTable, ExtractedTable};
use std::time::Instant;
use tracing::{info, instrument};

/// The fixed sequence of pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    LoadCsv,
    LoadDb,
    Query,
}

impl Stage {
    /// Wording used in progress log lines (`Start <activity>` / `End <activity>`).
    pub fn activity(&self) -> &'static str {
        match self {
            Stage::Extract => "extracting data",
            Stage::Transform => "transforming data",
            Stage::LoadCsv => "loading data to csv",
            Stage::LoadDb => "loading data to db",
            Stage::Query => "running query",
        }
    }

    pub fn step_name(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Transform => "transform",
            Stage::LoadCsv => "load_csv",
            Stage::LoadDb => "load_db",
            Stage::Query => "query",
        }
    }
}

/// Everything a full run produced, stage by stage.
#[derive(Debug)]
pub struct PipelineResult {
    pub extracted: ExtractedTable,
    pub transformed: BankTable,
    pub query_result: QueryResult,
}

/// Runs the stages once, in order, bracketing each with progress messages.
/// The first failing stage aborts the run; artifacts written by earlier stages stay.
pub struct Pipeline<'a> {
    config: &'a EtlConfig,
    source: &'a dyn PageSource,
    progress: &'a dyn ProgressSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a EtlConfig, source: &'a dyn PageSource, progress: &'a dyn ProgressSink) -> Self {
        Self {
            config,
            source,
            progress,
        }
    }

    #[instrument(skip(self))]
    pub fn run(&self) -> Result<PipelineResult> {
        let started = Instant::now();

        let extracted = self.extract()?;
        let transformed = self.stage(Stage::Transform, || transform(&extracted, &self.config.rates))?;

        let output = &self.config.output;
        self.stage(Stage::LoadCsv, || load_to_csv(&transformed, &output.csv_path))?;
        self.stage(Stage::LoadDb, || {
            load_to_db(&transformed, &output.db_path, &output.table_name)
        })?;
        let query_result = self.query(&self.config.select_all_query())?;

        info!(
            rows = transformed.len(),
            elapsed = ?started.elapsed(),
            "Pipeline finished"
        );
        Ok(PipelineResult {
            extracted,
            transformed,
            query_result,
        })
    }

    pub fn extract(&self) -> Result<ExtractedTable> {
        self.stage(Stage::Extract, || extract(self.source, &self.config.source))
    }

    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        self.stage(Stage::Query, || run_query(&self.config.output.db_path, sql))
    }

    fn stage<T>(&self, stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let span = tracing::info_span!("stage", step = stage.step_name());
        let _enter = span.enter();

        self.progress.record(&format!("Start {}", stage.activity()))?;
        let value = f()?;
        self.progress.record(&format!("End {}", stage.activity()))?;
        Ok(value)
    }
}
