use crate::error::{ProcessingError, Result};
use crate::models::NdviRecord;
use chrono::NaiveDateTime;
use std::collections::HashSet;

#[derive(Debug)]
pub struct NdviStatistics {
    pub total_records: usize,
    pub unique_locations: usize,
    pub date_range: (NaiveDateTime, NaiveDateTime),
    pub ndvi_stats: NdviValueStats,
    pub geographic_bounds: GeographicBounds,
}

#[derive(Debug)]
pub struct NdviValueStats {
    pub min_ndvi: f64,
    pub max_ndvi: f64,
    pub mean_ndvi: f64,
    pub min_ndvi_location: String,
    pub max_ndvi_location: String,
    /// Records with NDVI above 0.2, i.e. some vegetation cover
    pub vegetated_records: usize,
}

impl NdviValueStats {
    pub fn vegetated_percentage(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (self.vegetated_records as f64 / total as f64) * 100.0
    }
}

#[derive(Debug)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

const VEGETATION_THRESHOLD: f64 = 0.2;

pub struct NdviAnalyzer;

impl NdviAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_statistics(&self, records: &[NdviRecord]) -> Result<NdviStatistics> {
        let first = records.first().ok_or_else(|| {
            ProcessingError::InvalidFormat("No records to analyze".to_string())
        })?;

        let mut unique_locations = HashSet::new();
        let mut min_date = first.measurement_date.naive();
        let mut max_date = min_date;
        let mut min_ndvi = f64::INFINITY;
        let mut max_ndvi = f64::NEG_INFINITY;
        let mut min_ndvi_location = String::new();
        let mut max_ndvi_location = String::new();
        let mut ndvi_sum = 0.0;
        let mut vegetated_records = 0;

        let mut min_lat = first.latitude;
        let mut max_lat = first.latitude;
        let mut min_lon = first.longitude;
        let mut max_lon = first.longitude;

        for record in records {
            unique_locations.insert(record.geo.as_str());

            let date = record.measurement_date.naive();
            min_date = min_date.min(date);
            max_date = max_date.max(date);

            if record.ndvi_value < min_ndvi {
                min_ndvi = record.ndvi_value;
                min_ndvi_location = format!("{} ({})", record.geo, record.measurement_date);
            }
            if record.ndvi_value > max_ndvi {
                max_ndvi = record.ndvi_value;
                max_ndvi_location = format!("{} ({})", record.geo, record.measurement_date);
            }

            ndvi_sum += record.ndvi_value;
            if record.ndvi_value > VEGETATION_THRESHOLD {
                vegetated_records += 1;
            }

            min_lat = min_lat.min(record.latitude);
            max_lat = max_lat.max(record.latitude);
            min_lon = min_lon.min(record.longitude);
            max_lon = max_lon.max(record.longitude);
        }

        Ok(NdviStatistics {
            total_records: records.len(),
            unique_locations: unique_locations.len(),
            date_range: (min_date, max_date),
            ndvi_stats: NdviValueStats {
                min_ndvi,
                max_ndvi,
                mean_ndvi: ndvi_sum / records.len() as f64,
                min_ndvi_location,
                max_ndvi_location,
                vegetated_records,
            },
            geographic_bounds: GeographicBounds {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            },
        })
    }
}

impl NdviStatistics {
    pub fn summary(&self) -> String {
        format!(
            "Records: {} total\n\
            Locations: {} unique points\n\
            Date Range: {} to {}\n\
            NDVI Range: {:.4} to {:.4} (mean {:.4})\n\
            Coverage: lat {:.3} to {:.3}, lon {:.3} to {:.3}",
            self.total_records,
            self.unique_locations,
            self.date_range.0,
            self.date_range.1,
            self.ndvi_stats.min_ndvi,
            self.ndvi_stats.max_ndvi,
            self.ndvi_stats.mean_ndvi,
            self.geographic_bounds.min_lat,
            self.geographic_bounds.max_lat,
            self.geographic_bounds.min_lon,
            self.geographic_bounds.max_lon
        )
    }

    pub fn detailed_summary(&self) -> String {
        format!(
            "{}\n\n\
            Extremes:\n\
            - Lowest NDVI: {:.4} at {}\n\
            - Highest NDVI: {:.4} at {}\n\n\
            Vegetation (NDVI > {}): {}/{} ({:.1}%)",
            self.summary(),
            self.ndvi_stats.min_ndvi,
            self.ndvi_stats.min_ndvi_location,
            self.ndvi_stats.max_ndvi,
            self.ndvi_stats.max_ndvi_location,
            VEGETATION_THRESHOLD,
            self.ndvi_stats.vegetated_records,
            self.total_records,
            self.ndvi_stats.vegetated_percentage(self.total_records)
        )
    }
}

impl Default for NdviAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementTime;

    fn record(lat: f64, lon: f64, ndvi: f64, date: &str) -> NdviRecord {
        NdviRecord::new(None, lat, lon, ndvi, MeasurementTime::parse(date).unwrap())
    }

    #[test]
    fn test_statistics() {
        let records = vec![
            record(10.0, 20.0, 0.1, "2025-05-01"),
            record(-5.0, 30.0, 0.7, "2025-04-01"),
            record(10.0, 20.0, 0.4, "2025-06-01"),
        ];

        let stats = NdviAnalyzer::new().calculate_statistics(&records).unwrap();

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.unique_locations, 2);
        assert_eq!(stats.date_range.0.to_string(), "2025-04-01 00:00:00");
        assert_eq!(stats.date_range.1.to_string(), "2025-06-01 00:00:00");
        assert_eq!(stats.ndvi_stats.min_ndvi, 0.1);
        assert_eq!(stats.ndvi_stats.max_ndvi, 0.7);
        assert!((stats.ndvi_stats.mean_ndvi - 0.4).abs() < 1e-9);
        assert_eq!(stats.ndvi_stats.vegetated_records, 2);
        assert!(stats
            .ndvi_stats
            .max_ndvi_location
            .starts_with("POINT(30.0 -5.0)"));
        assert_eq!(stats.geographic_bounds.min_lat, -5.0);
        assert_eq!(stats.geographic_bounds.max_lon, 30.0);
        assert!(stats.detailed_summary().contains("Highest NDVI: 0.7000"));
    }

    #[test]
    fn test_empty_records() {
        assert!(NdviAnalyzer::new().calculate_statistics(&[]).is_err());
    }
}
