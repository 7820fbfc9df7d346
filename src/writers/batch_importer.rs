use crate::models::NdviRecord;
use crate::utils::constants::DEFAULT_CHUNK_SIZE;
use crate::utils::progress::ProgressReporter;
use crate::writers::RecordSink;
use tracing::{error, info};

/// Outcome of submitting every batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub records_prepared: usize,
    pub records_inserted: usize,
    pub batches_attempted: usize,
    /// 1-based numbers of the batches whose insert failed
    pub failed_batches: Vec<usize>,
}

impl ImportSummary {
    pub fn batches_failed(&self) -> usize {
        self.failed_batches.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Inserted {} of {} records in {} batches ({} failed)",
            self.records_inserted,
            self.records_prepared,
            self.batches_attempted,
            self.batches_failed()
        )
    }
}

/// Number of batches `len` records split into
pub fn batch_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size.max(1))
}

/// Submits records to a sink in consecutive fixed-size batches.
///
/// Batches go out one at a time in order. A failed batch is logged and
/// skipped; it never stops the remaining batches.
pub struct BatchImporter<'a, S: RecordSink> {
    sink: &'a S,
    table: String,
    chunk_size: usize,
}

impl<'a, S: RecordSink> BatchImporter<'a, S> {
    pub fn new(sink: &'a S, table: impl Into<String>) -> Self {
        Self {
            sink,
            table: table.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub async fn import(
        &self,
        records: &[NdviRecord],
        progress: Option<&ProgressReporter>,
    ) -> ImportSummary {
        let total_batches = batch_count(records.len(), self.chunk_size);
        let mut summary = ImportSummary {
            records_prepared: records.len(),
            ..ImportSummary::default()
        };

        for (index, batch) in records.chunks(self.chunk_size).enumerate() {
            let batch_number = index + 1;
            info!("Inserting chunk {}/{}...", batch_number, total_batches);
            if let Some(p) = progress {
                p.set_message(&format!("Inserting chunk {}/{}", batch_number, total_batches));
            }

            summary.batches_attempted += 1;
            match self.sink.insert(&self.table, batch).await {
                Ok(inserted) => {
                    info!("Successfully inserted {} records.", inserted);
                    summary.records_inserted += inserted;
                }
                Err(e) => {
                    error!(
                        "An unexpected error occurred during insertion of chunk {}: {}",
                        batch_number, e
                    );
                    summary.failed_batches.push(batch_number);
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProcessingError, Result};
    use crate::models::MeasurementTime;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records batch sizes and first identifiers; fails on chosen batch numbers
    #[derive(Default)]
    struct RecordingSink {
        fail_on: Vec<usize>,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl RecordSink for RecordingSink {
        async fn insert(&self, table: &str, batch: &[NdviRecord]) -> Result<usize> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((
                table.to_string(),
                batch
                    .iter()
                    .map(|r| r.source_index.clone().unwrap_or_default())
                    .collect(),
            ));

            if self.fail_on.contains(&calls.len()) {
                return Err(ProcessingError::RemoteInsert {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(batch.len())
        }
    }

    fn records(count: usize) -> Vec<NdviRecord> {
        let date = MeasurementTime::parse("2025-05-01").unwrap();
        (0..count)
            .map(|i| NdviRecord::new(Some(i.to_string()), 0.0, 0.0, 0.5, date))
            .collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 1000), 0);
        assert_eq!(batch_count(1, 1000), 1);
        assert_eq!(batch_count(1000, 1000), 1);
        assert_eq!(batch_count(2000, 1000), 2);
        assert_eq!(batch_count(2500, 1000), 3);
    }

    #[tokio::test]
    async fn test_2500_records_make_three_ordered_batches() {
        let sink = RecordingSink::default();
        let input = records(2500);

        let summary = BatchImporter::new(&sink, "ndvi_data")
            .import(&input, None)
            .await;

        let calls = sink.calls.lock().unwrap();
        let sizes: Vec<usize> = calls.iter().map(|(_, ids)| ids.len()).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
        assert!(calls.iter().all(|(table, _)| table == "ndvi_data"));

        let concatenated: Vec<String> = calls.iter().flat_map(|(_, ids)| ids.clone()).collect();
        let expected: Vec<String> = (0..2500).map(|i| i.to_string()).collect();
        assert_eq!(concatenated, expected);

        assert_eq!(summary.records_inserted, 2500);
        assert_eq!(summary.batches_attempted, 3);
        assert!(summary.failed_batches.is_empty());
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_the_run() {
        let sink = RecordingSink {
            fail_on: vec![2],
            ..RecordingSink::default()
        };
        let input = records(2500);

        let summary = BatchImporter::new(&sink, "ndvi_data")
            .import(&input, None)
            .await;

        assert_eq!(sink.calls.lock().unwrap().len(), 3);
        assert_eq!(summary.failed_batches, vec![2]);
        assert_eq!(summary.records_inserted, 1500);
        assert_eq!(
            summary.summary(),
            "Inserted 1500 of 2500 records in 3 batches (1 failed)"
        );
    }

    #[tokio::test]
    async fn test_no_records_no_calls() {
        let sink = RecordingSink::default();
        let summary = BatchImporter::new(&sink, "ndvi_data")
            .import(&[], None)
            .await;

        assert!(sink.calls.lock().unwrap().is_empty());
        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn test_custom_chunk_size() {
        let sink = RecordingSink::default();
        let input = records(7);

        BatchImporter::new(&sink, "ndvi_data")
            .with_chunk_size(3)
            .import(&input, None)
            .await;

        let sizes: Vec<usize> = sink
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ids)| ids.len())
            .collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }
}
