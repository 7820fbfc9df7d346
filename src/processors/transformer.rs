use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementTime, NdviRecord, RawNdviRow};
use crate::processors::integrity_checker::{ImportReport, IntegrityChecker};
use crate::utils::constants::{COL_LATITUDE, COL_LONGITUDE, NDVI_SENTINEL};
use crate::utils::coordinates::parse_coordinate;
use rayon::prelude::*;
use tracing::{debug, warn};

/// What to do with a row whose latitude or longitude is not numeric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Abort the run
    #[default]
    Strict,
    /// Drop the row and count it
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
enum RowOutcome {
    Accepted(NdviRecord),
    Sentinel,
    Missing,
    InvalidCoordinate,
}

#[derive(Debug)]
pub struct TransformOutcome {
    pub records: Vec<NdviRecord>,
    pub report: ImportReport,
}

pub struct NdviTransformer {
    coordinate_policy: CoordinatePolicy,
    max_workers: usize,
}

impl NdviTransformer {
    pub fn new(max_workers: usize) -> Self {
        Self {
            coordinate_policy: CoordinatePolicy::Strict,
            max_workers: max_workers.max(1),
        }
    }

    pub fn with_coordinate_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.coordinate_policy = policy;
        self
    }

    /// Coerce, derive and filter rows, keeping file order.
    ///
    /// In strict mode the error returned is the one for the earliest bad row.
    pub fn transform(&self, rows: &[RawNdviRow]) -> Result<TransformOutcome> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let policy = self.coordinate_policy;
        let outcomes: Vec<Result<RowOutcome>> = pool.install(|| {
            rows.par_iter()
                .enumerate()
                .map(|(index, row)| transform_row(index + 1, row, policy))
                .collect()
        });

        let mut report = ImportReport {
            total_rows: rows.len(),
            ..ImportReport::default()
        };
        let mut records = Vec::with_capacity(rows.len());

        for outcome in outcomes {
            match outcome? {
                RowOutcome::Accepted(record) => records.push(record),
                RowOutcome::Sentinel => report.sentinel_excluded += 1,
                RowOutcome::Missing => report.missing_excluded += 1,
                RowOutcome::InvalidCoordinate => report.invalid_coordinates += 1,
            }
        }

        report.accepted = records.len();
        report.out_of_range_coordinates = IntegrityChecker::new().count_out_of_range(&records);

        if report.invalid_coordinates > 0 {
            warn!(
                "Skipped {} rows with invalid coordinates",
                report.invalid_coordinates
            );
        }
        debug!(
            "Transformed {} rows: {} accepted, {} excluded",
            report.total_rows,
            report.accepted,
            report.excluded()
        );

        Ok(TransformOutcome { records, report })
    }
}

impl Default for NdviTransformer {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

/// Coerce an NDVI cell; anything that is not a finite number is missing
pub fn parse_ndvi(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn transform_row(row: usize, raw: &RawNdviRow, policy: CoordinatePolicy) -> Result<RowOutcome> {
    let latitude = match coerce_coordinate(row, COL_LATITUDE, &raw.latitude, policy)? {
        Some(value) => value,
        None => return Ok(RowOutcome::InvalidCoordinate),
    };
    let longitude = match coerce_coordinate(row, COL_LONGITUDE, &raw.longitude, policy)? {
        Some(value) => value,
        None => return Ok(RowOutcome::InvalidCoordinate),
    };

    let measurement_date =
        MeasurementTime::parse(&raw.measurement_date).ok_or_else(|| ProcessingError::DateParse {
            row,
            value: raw.measurement_date.clone(),
        })?;

    let ndvi_value = match parse_ndvi(&raw.ndvi_value) {
        Some(value) if value == NDVI_SENTINEL => return Ok(RowOutcome::Sentinel),
        Some(value) => value,
        None => return Ok(RowOutcome::Missing),
    };

    Ok(RowOutcome::Accepted(NdviRecord::new(
        raw.system_index.clone(),
        latitude,
        longitude,
        ndvi_value,
        measurement_date,
    )))
}

fn coerce_coordinate(
    row: usize,
    column: &'static str,
    value: &str,
    policy: CoordinatePolicy,
) -> Result<Option<f64>> {
    match (parse_coordinate(value), policy) {
        (Some(parsed), _) => Ok(Some(parsed)),
        (None, CoordinatePolicy::Skip) => Ok(None),
        (None, CoordinatePolicy::Strict) => Err(ProcessingError::InvalidCoordinate {
            row,
            column,
            value: value.to_string(),
        }),
    }
}
