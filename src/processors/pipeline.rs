use crate::error::Result;
use crate::processors::{CoordinatePolicy, NdviTransformer, TransformOutcome};
use crate::readers::NdviReader;
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_TABLE};
use crate::utils::progress::ProgressReporter;
use crate::writers::{batch_count, BatchImporter, ImportSummary, RecordSink};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read → coerce → filter → batch → insert, for one CSV file
#[derive(Debug, Clone)]
pub struct ImportPipeline {
    table: String,
    chunk_size: usize,
    max_workers: usize,
    coordinate_policy: CoordinatePolicy,
    use_mmap: bool,
    silent: bool,
}

impl ImportPipeline {
    pub fn new(max_workers: usize) -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_workers,
            coordinate_policy: CoordinatePolicy::Strict,
            use_mmap: false,
            silent: false,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_coordinate_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.coordinate_policy = policy;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Read and transform the file without touching the network
    pub fn prepare(&self, path: &Path) -> Result<TransformOutcome> {
        let rows = NdviReader::with_mmap(self.use_mmap).read_rows(path)?;

        NdviTransformer::new(self.max_workers)
            .with_coordinate_policy(self.coordinate_policy)
            .transform(&rows)
    }

    /// Prepare on the blocking pool so the runtime stays responsive
    pub async fn prepare_async(&self, path: &Path) -> Result<TransformOutcome> {
        let pipeline = self.clone();
        let path: PathBuf = path.to_path_buf();

        tokio::task::spawn_blocking(move || pipeline.prepare(&path)).await?
    }

    /// Run the whole import.
    ///
    /// Read and transform errors are returned. Insert errors are logged per
    /// batch and show up only in the summary.
    pub async fn run<S: RecordSink>(&self, path: &Path, sink: &S) -> Result<ImportSummary> {
        info!("Starting import for {}", path.display());

        let spinner = ProgressReporter::new_spinner("Reading NDVI data...", self.silent);
        let outcome = self.prepare_async(path).await?;
        spinner.finish_with_message(&format!("Read {} rows", outcome.report.total_rows));

        info!("Prepared {} records for insertion.", outcome.records.len());

        let progress = ProgressReporter::new(
            batch_count(outcome.records.len(), self.chunk_size) as u64,
            &format!("Inserting into {}", self.table),
            self.silent,
        );

        let summary = BatchImporter::new(sink, self.table.clone())
            .with_chunk_size(self.chunk_size)
            .import(&outcome.records, Some(&progress))
            .await;

        progress.finish_with_message(&summary.summary());
        info!("NDVI data import complete.");

        Ok(summary)
    }
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

/// Import one NDVI CSV into the default table with default settings
pub async fn import_ndvi_data<S: RecordSink>(path: &Path, sink: &S) -> Result<ImportSummary> {
    ImportPipeline::default().with_silent(true).run(path, sink).await
}
