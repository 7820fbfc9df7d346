use crate::models::NdviRecord;
use validator::Validate;

/// Per-run accounting of what happened to each CSV row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub total_rows: usize,
    pub accepted: usize,
    pub sentinel_excluded: usize,
    pub missing_excluded: usize,
    pub invalid_coordinates: usize,
    pub out_of_range_coordinates: usize,
}

impl ImportReport {
    pub fn excluded(&self) -> usize {
        self.sentinel_excluded + self.missing_excluded + self.invalid_coordinates
    }

    pub fn accepted_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        (self.accepted as f64 / self.total_rows as f64) * 100.0
    }
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Count accepted records whose coordinates fall outside the globe.
    ///
    /// These are reported but still imported.
    pub fn count_out_of_range(&self, records: &[NdviRecord]) -> usize {
        records.iter().filter(|r| r.validate().is_err()).count()
    }

    pub fn generate_summary(&self, report: &ImportReport) -> String {
        let mut summary = String::new();

        summary.push_str("NDVI Import Report\n");
        summary.push_str("==================\n");
        summary.push_str(&format!("Rows read: {}\n", report.total_rows));
        summary.push_str(&format!(
            "Accepted: {} ({:.1}%)\n",
            report.accepted,
            report.accepted_percentage()
        ));
        summary.push_str(&format!(
            "Excluded (fill value 99999.0): {}\n",
            report.sentinel_excluded
        ));
        summary.push_str(&format!(
            "Excluded (missing or non-numeric NDVI): {}\n",
            report.missing_excluded
        ));

        if report.invalid_coordinates > 0 {
            summary.push_str(&format!(
                "Excluded (invalid coordinates): {}\n",
                report.invalid_coordinates
            ));
        }

        if report.out_of_range_coordinates > 0 {
            summary.push_str(&format!(
                "Warning: {} accepted records have coordinates outside [-90, 90] x [-180, 180]\n",
                report.out_of_range_coordinates
            ));
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementTime;

    fn record(latitude: f64, longitude: f64) -> NdviRecord {
        NdviRecord::new(
            None,
            latitude,
            longitude,
            0.5,
            MeasurementTime::parse("2025-05-01").unwrap(),
        )
    }

    #[test]
    fn test_count_out_of_range() {
        let checker = IntegrityChecker::new();
        let records = vec![record(10.0, 20.0), record(95.0, 20.0), record(0.0, 181.0)];

        assert_eq!(checker.count_out_of_range(&records), 2);
    }

    #[test]
    fn test_summary_mentions_exclusions() {
        let report = ImportReport {
            total_rows: 10,
            accepted: 6,
            sentinel_excluded: 3,
            missing_excluded: 1,
            invalid_coordinates: 0,
            out_of_range_coordinates: 0,
        };

        let summary = IntegrityChecker::new().generate_summary(&report);
        assert!(summary.contains("Rows read: 10"));
        assert!(summary.contains("Accepted: 6 (60.0%)"));
        assert!(summary.contains("Excluded (fill value 99999.0): 3"));
        assert!(!summary.contains("invalid coordinates"));
        assert_eq!(report.excluded(), 4);
    }

    #[test]
    fn test_empty_report_percentage() {
        assert_eq!(ImportReport::default().accepted_percentage(), 0.0);
    }
}
